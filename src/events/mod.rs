//! Gameplay event logging
//!
//! Provides a compact text format for logging combat events. Used by the
//! windowed game (debug log), batch simulation metrics and scenario tests.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, EventBus};
pub use format::{parse_event, parse_log, serialize_event};
pub use types::{ActorId, GameEvent};
