//! UI module - HUD health bar

mod hud;

pub use hud::*;
