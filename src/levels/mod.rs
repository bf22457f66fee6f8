//! Levels module - level definitions and the text database

mod database;

pub use database::*;
