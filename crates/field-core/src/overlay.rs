//! Text shown in the small on-screen overlay.

use crate::constants::OVERLAY_PLACEHOLDER;
use crate::metrics::FieldMetrics;
use crate::regime::Regime;

pub const SESSION_KEY: &str = "aurora_demo_session_id";
pub const FINGERPRINT_KEY: &str = "aurora_demo_fingerprint";

/// Best-effort string storage; failures read as absent.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl KeyValueStore for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayContent {
    Hidden,
    Lines(Vec<String>),
}

impl OverlayContent {
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, OverlayContent::Lines(_))
    }
}

/// Session id and fingerprint, with a placeholder for anything missing.
pub fn decision_ids<S: KeyValueStore + ?Sized>(store: &S) -> OverlayContent {
    let read = |key: &str| {
        store
            .get(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| OVERLAY_PLACEHOLDER.to_owned())
    };
    OverlayContent::Lines(vec![
        format!("decision_id: {}", read(SESSION_KEY)),
        format!("decision_hash: {}", read(FINGERPRINT_KEY)),
    ])
}

pub fn metrics_readout(regime: Regime, metrics: &FieldMetrics) -> OverlayContent {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("regime: {}", regime.name()));
    match metrics.dominant {
        Some(d) => lines.push(format!(
            "dominant: #{d} · {:.0}%",
            metrics.dominance_pct
        )),
        None => lines.push(format!("dominant: {OVERLAY_PLACEHOLDER}")),
    }
    lines.push(format!(
        "clusters: {} · convergence: {:.2}",
        metrics.clusters,
        metrics.convergence_magnitude()
    ));
    if !metrics.risk_zones.is_empty() {
        let zones: Vec<String> = metrics
            .risk_zones
            .iter()
            .map(|z| format!("{:.0}%", z.intensity * 100.0))
            .collect();
        lines.push(format!("risk_zones: {}", zones.join(" / ")));
    }
    OverlayContent::Lines(lines)
}
