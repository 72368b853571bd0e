//! Subcommand implementations

pub mod analyze;
pub mod export;
pub mod simulate;
pub mod solve;
pub mod sweep;
pub mod verify;
