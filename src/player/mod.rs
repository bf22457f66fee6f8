//! Player module - the human-controlled combat actor and its sprite mapping

mod actor;
mod sprite;

pub use actor::Player;
pub use sprite::player_clip;
