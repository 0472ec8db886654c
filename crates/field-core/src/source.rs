//! Declarative page state feeding the controller.
//!
//! The host page describes the desired visual state through a handful of
//! string attributes. A [`StateSource`] reads them into a [`FieldSnapshot`];
//! [`Selection::resolve`] turns that into typed values, applying the
//! documented defaults for anything absent or unrecognized.

use crate::constants::SCROLL_VELOCITY_MAX;
use crate::regime::{Algorithm, BinarySide, Regime};

/// Raw attribute values, exactly as read from the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub state: Option<String>,
    pub regime: Option<String>,
    pub algorithm: Option<String>,
    pub focus: Option<String>,
    pub binary_side: Option<String>,
    pub scroll_velocity: Option<String>,
}

impl FieldSnapshot {
    pub fn with_state(state: &str) -> Self {
        Self {
            state: Some(state.to_owned()),
            ..Self::default()
        }
    }

    pub fn with_regime(regime: &str) -> Self {
        Self {
            regime: Some(regime.to_owned()),
            ..Self::default()
        }
    }
}

/// Anything that can report the current declarative state and announce changes.
pub trait StateSource {
    /// Keeps the change subscription alive; dropping it unsubscribes.
    type Subscription;

    fn read(&self) -> FieldSnapshot;
    fn subscribe(&self, on_change: Box<dyn FnMut()>) -> Self::Subscription;
}

/// A fixed snapshot never changes, so its subscription is inert.
impl StateSource for FieldSnapshot {
    type Subscription = ();

    fn read(&self) -> FieldSnapshot {
        self.clone()
    }

    fn subscribe(&self, _on_change: Box<dyn FnMut()>) -> Self::Subscription {}
}

/// Which attribute chose the regime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Page-state attribute (`hero`, `change`, ...).
    State,
    /// Scroll-regime attribute (`unstable`, `compressing`, ...).
    Regime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub regime: Regime,
    pub channel: Channel,
    pub algorithm: Algorithm,
    pub focus: Option<String>,
    pub side: BinarySide,
    /// Host-provided scroll velocity overriding the controller's own estimate.
    pub scroll_velocity: Option<f32>,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::resolve(&FieldSnapshot::default())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Selection {
    pub fn resolve(snapshot: &FieldSnapshot) -> Self {
        let (regime, channel) = match non_empty(&snapshot.regime) {
            Some(name) => (Regime::from_regime_attr(Some(name)), Channel::Regime),
            None => (
                Regime::from_state_attr(non_empty(&snapshot.state)),
                Channel::State,
            ),
        };

        let scroll_velocity = non_empty(&snapshot.scroll_velocity)
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, SCROLL_VELOCITY_MAX));

        Self {
            regime,
            channel,
            algorithm: Algorithm::from_attr(non_empty(&snapshot.algorithm)),
            focus: non_empty(&snapshot.focus).map(str::to_owned),
            side: BinarySide::from_attr(non_empty(&snapshot.binary_side)),
            scroll_velocity,
        }
    }

    #[inline]
    pub fn focus_active(&self) -> bool {
        self.focus.is_some()
    }

    /// True when anything other than the scroll override differs; those
    /// changes resize the pool and force a render.
    pub fn differs_structurally(&self, other: &Selection) -> bool {
        self.regime != other.regime
            || self.channel != other.channel
            || self.algorithm != other.algorithm
            || self.focus != other.focus
            || self.side != other.side
    }
}
