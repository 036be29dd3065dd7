//! `gdp-chart` library crate.
//!
//! The binary (`gdp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the transform and renderer can be driven by other hosts than the TUI
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod render;
pub mod report;
pub mod transform;
pub mod tui;
