//! Schema module - Configuration and palette types for the garden.

mod config;
mod palette;

pub use config::*;
pub use palette::*;
