//! Dataset sources.
//!
//! - remote/file JSON loading (`source`)
//! - offline synthetic series (`sample`)

pub mod sample;
pub mod source;

pub use sample::generate_sample;
pub use source::{GdpClient, SourceError, parse_dataset, read_dataset, resolve_data_url};
