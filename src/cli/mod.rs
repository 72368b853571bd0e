//! CLI infrastructure for the mafia-odds toolkit
//!
//! This module provides the command-line interface for solving, analyzing,
//! exporting, and cross-checking Mafia win probabilities.

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
