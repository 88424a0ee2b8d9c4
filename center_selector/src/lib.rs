pub mod config;
pub mod coordinate;
pub mod event;
pub mod reconciler;
pub mod replay;

pub use config::{ChangeDetection, SelectorConfig};
pub use coordinate::{Coordinate, DEFAULT_CENTER};
pub use event::{IdleEvent, MalformedMapEvent, UserLocationEvent};
pub use reconciler::{initialize, ChangeHandler, ControlMode, Reconciler, Update};
