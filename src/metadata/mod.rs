//! Metadata extraction: block orchestration, value post-processing and
//! incremental reading.
//!
//! - [`parse_buffer`] decodes a buffer that holds the whole file
//! - [`MetadataReader`] decodes from a [`crate::io::RangeReader`], fetching
//!   only the byte ranges the decoder asks for

pub mod enums;
mod output;
mod parser;
mod reader;
pub mod revive;

pub use output::{BlockError, BlockKind, Blocks, Output, ParseReport, Xmp};
pub use parser::{parse_buffer, parse_partial};
pub use reader::{MetadataReader, MAX_CHUNK_REQUESTS};
