//! Output files.
//!
//! - record CSV, chart SVG and standalone HTML (`export`)

pub mod export;

pub use export::*;
