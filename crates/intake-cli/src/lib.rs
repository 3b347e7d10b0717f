//! CLI library components for clinical import analysis.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
