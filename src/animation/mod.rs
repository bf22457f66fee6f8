//! Animation module - clip sampling and the sprite-sheet manifest

mod clip;
mod library;

pub use clip::{AnimationClip, ClipId, SpriteFrame};
pub use library::{AnimationLibrary, SheetDef};
