//! Subcommand implementations.

pub mod check;
pub mod common;
pub mod params;
pub mod render;
