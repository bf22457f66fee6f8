//! AI module - grid walkability, path search and enemy pursuit

mod grid;
mod pathfinding;
mod pursuit;

pub use grid::{GridNode, WalkabilityGrid};
pub use pathfinding::{PathResult, find_path};
pub use pursuit::{PursuitDecision, follow_player};
