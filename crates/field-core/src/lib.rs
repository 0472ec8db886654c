pub mod color;
pub mod constants;
pub mod controller;
pub mod error;
pub mod force;
pub mod lifecycle;
pub mod metrics;
pub mod node;
pub mod overlay;
pub mod progress;
pub mod pulse;
pub mod regime;
pub mod render;
pub mod source;
pub mod surface;
pub mod timing;
pub mod viewport;

pub use color::Rgba;
pub use controller::{Environment, FieldController, LoopCommand, Phase};
pub use error::FieldError;
pub use lifecycle::{Dispose, Disposer, Slot, Ticket};
pub use metrics::{FieldMetrics, TopologySampler};
pub use node::{Node, NodePool};
pub use overlay::{KeyValueStore, OverlayContent};
pub use pulse::{HoverGate, Pulse, PulseQueue};
pub use regime::{Algorithm, AttractorRule, BinarySide, Regime, RegimeConfig};
pub use source::{Channel, FieldSnapshot, Selection, StateSource};
pub use surface::{Paint, Recording, Surface};
pub use viewport::Viewport;
