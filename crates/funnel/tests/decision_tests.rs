// Host-side tests for decision copy and answer fingerprints.

use funnel::decision::{copy_for, FALLBACK};
use funnel::{create_fingerprint, evaluate_decision, simple_hash, Tension};

#[test]
fn tension_counts_negative_answers() {
    assert_eq!(Tension::from_answers(&[true, true, true]), Tension::Low);
    assert_eq!(Tension::from_answers(&[true, false, true]), Tension::Medium);
    assert_eq!(Tension::from_answers(&[false, false, true]), Tension::High);
    assert_eq!(Tension::from_answers(&[false, false, false]), Tension::High);
}

#[test]
fn known_scenario_returns_exact_lines() {
    let d = evaluate_decision("decision", [true, true, true]);
    assert_eq!(d.tension, Tension::Low);
    assert_eq!(
        d.copy.lines(),
        [
            "Tu decisión descansa sobre variables que hoy podés contrastar.",
            "La exposición se mantiene acotada si las condiciones se sostienen.",
            "El siguiente paso es fijar el punto de revisión.",
        ]
    );

    let d = evaluate_decision("decision", [false, true, true]);
    assert_eq!(d.copy.line1, "Tu decisión depende de estabilidad que hoy no está garantizada.");
    assert_eq!(d.copy.line3, "La exposición no será visible al inicio.");

    let d = evaluate_decision("decision", [false, false, true]);
    assert_eq!(d.copy.line2, "Cualquier desvío se amplifica en la ejecución.");
}

#[test]
fn same_input_same_output() {
    let a = evaluate_decision("decision", [true, false, false]);
    let b = evaluate_decision("decision", [true, false, false]);
    assert_eq!(a, b);
    assert_eq!(a.copy, copy_for(Tension::High));
}

#[test]
fn unknown_scenario_falls_back() {
    let d = evaluate_decision("pricing", [true, true, true]);
    assert_eq!(d.copy, FALLBACK);
    assert_eq!(d.tension, Tension::Low);
}

#[test]
fn hash_matches_known_values() {
    assert_eq!(simple_hash(""), "0");
    assert_eq!(simple_hash("a"), "2p");
    // 97 * 31 + 98 = 3105
    assert_eq!(simple_hash("ab"), "2e9");
}

#[test]
fn hash_survives_overflow() {
    let long = "industria:101:1760702400000".repeat(40);
    let h = simple_hash(&long);
    assert!(!h.is_empty());
    assert!(h.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(h, simple_hash(&long));
}

#[test]
fn fingerprint_hashes_the_payload() {
    assert_eq!(
        create_fingerprint("retail", [true, false, true], 1_760_702_400_000),
        simple_hash("retail:101:1760702400000")
    );
    assert_ne!(
        create_fingerprint("retail", [true, false, true], 1),
        create_fingerprint("retail", [true, true, true], 1)
    );
}
