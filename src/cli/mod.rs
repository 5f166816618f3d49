//! Command-line interface for endpoint health operations

pub mod commands;

pub use commands::*;
