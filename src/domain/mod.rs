//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw wire shapes (`RawRow`, `PointInTime`, `Amount`, `GdpDataset`)
//! - the transformed unit (`Record`, `QuarterLabel`)
//! - run configuration (`ChartConfig`, `ChartLayout`, `SourceConfig`, etc.)

pub mod types;

pub use types::*;
