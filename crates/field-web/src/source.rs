use field_core::{FieldSnapshot, StateSource};
use web_sys as web;

use crate::events::AttributeWatch;

pub const ATTR_STATE: &str = "data-state";
pub const ATTR_REGIME: &str = "data-regime";
pub const ATTR_ALGORITHM: &str = "data-algorithm";
pub const ATTR_FOCUS: &str = "data-group-focus";
pub const ATTR_BINARY_SIDE: &str = "data-binary-side";
pub const ATTR_SCROLL_VELOCITY: &str = "data-scroll-velocity";

pub const WATCHED: [&str; 6] = [
    ATTR_STATE,
    ATTR_REGIME,
    ATTR_ALGORITHM,
    ATTR_FOCUS,
    ATTR_BINARY_SIDE,
    ATTR_SCROLL_VELOCITY,
];

/// Field state declared as `data-*` attributes on one element (the body).
#[derive(Clone)]
pub struct BodyDataset {
    el: web::Element,
}

impl BodyDataset {
    pub fn new(el: web::Element) -> Self {
        Self { el }
    }
}

impl StateSource for BodyDataset {
    type Subscription = Option<AttributeWatch>;

    fn read(&self) -> FieldSnapshot {
        let attr = |name: &str| self.el.get_attribute(name);
        FieldSnapshot {
            state: attr(ATTR_STATE),
            regime: attr(ATTR_REGIME),
            algorithm: attr(ATTR_ALGORITHM),
            focus: attr(ATTR_FOCUS),
            binary_side: attr(ATTR_BINARY_SIDE),
            scroll_velocity: attr(ATTR_SCROLL_VELOCITY),
        }
    }

    fn subscribe(&self, mut on_change: Box<dyn FnMut()>) -> Self::Subscription {
        match AttributeWatch::new(&self.el, &WATCHED, move || on_change()) {
            Ok(watch) => Some(watch),
            Err(e) => {
                log::warn!("[field] attribute observer unavailable: {e:?}");
                None
            }
        }
    }
}
