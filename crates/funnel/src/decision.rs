//! Deterministic decision copy.
//!
//! Three yes/no answers are reduced to a tension level by counting the
//! negatives; the level picks one fixed three-line text. No randomness.
//! The level itself is never shown.

/// Scenario whose copy table is known.
pub const DECISION_SCENARIO: &str = "decision";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tension {
    Low,
    Medium,
    High,
}

impl Tension {
    /// 0 negatives is low, 1 medium, 2 or more high.
    pub fn from_answers(answers: &[bool]) -> Self {
        match answers.iter().filter(|a| !**a).count() {
            0 => Tension::Low,
            1 => Tension::Medium,
            _ => Tension::High,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tension::Low => "low",
            Tension::Medium => "medium",
            Tension::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecisionCopy {
    pub line1: &'static str,
    pub line2: &'static str,
    pub line3: &'static str,
}

impl DecisionCopy {
    pub fn lines(&self) -> [&'static str; 3] {
        [self.line1, self.line2, self.line3]
    }
}

const LOW: DecisionCopy = DecisionCopy {
    line1: "Tu decisión descansa sobre variables que hoy podés contrastar.",
    line2: "La exposición se mantiene acotada si las condiciones se sostienen.",
    line3: "El siguiente paso es fijar el punto de revisión.",
};

const MEDIUM: DecisionCopy = DecisionCopy {
    line1: "Tu decisión depende de estabilidad que hoy no está garantizada.",
    line2: "Si las variables se mueven juntas, la fricción aumenta.",
    line3: "La exposición no será visible al inicio.",
};

const HIGH: DecisionCopy = DecisionCopy {
    line1: "La decisión está apoyada en supuestos no verificados.",
    line2: "Cualquier desvío se amplifica en la ejecución.",
    line3: "Conviene contrastar antes de comprometer.",
};

/// Shown for scenarios without a table.
pub const FALLBACK: DecisionCopy = DecisionCopy {
    line1: "Todavía no hay contexto suficiente para leer esta decisión.",
    line2: "Las variables disponibles no alcanzan para ubicar la exposición.",
    line3: "Conviene completar el contexto antes de avanzar.",
};

pub fn copy_for(tension: Tension) -> DecisionCopy {
    match tension {
        Tension::Low => LOW,
        Tension::Medium => MEDIUM,
        Tension::High => HIGH,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub tension: Tension,
    pub copy: DecisionCopy,
}

pub fn evaluate_decision(scenario: &str, answers: [bool; 3]) -> Decision {
    let tension = Tension::from_answers(&answers);
    let copy = if scenario.trim().eq_ignore_ascii_case(DECISION_SCENARIO) {
        copy_for(tension)
    } else {
        FALLBACK
    };
    Decision { tension, copy }
}
