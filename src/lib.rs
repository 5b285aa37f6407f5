//! # EXIF Streamer
//!
//! Extracts EXIF, GPS, IPTC, XMP and ICC metadata from JPEG and TIFF files.
//!
//! Metadata usually sits in the first few kilobytes of an image, so the
//! reader fetches only the byte ranges the decoder needs instead of the
//! whole file.
//!
//! ## Features
//!
//! - **Range-based reading**: starts with a small chunk and fetches more only
//!   when a tag value lies past the loaded bytes
//! - **TIFF decoding**: IFD0, Exif, GPS, Interoperability and thumbnail IFDs,
//!   both byte orders, all TIFF 6.0 field types
//! - **Post-processing**: dates, enum names, version strings and decimal GPS
//!   coordinates
//! - **Other blocks**: IPTC application record, XMP packet, ICC profile header
//! - **Per-block errors**: a corrupt block never hides the others
//!
//! ## Architecture
//!
//! - [`io`] - range readers over files and in-memory data
//! - [`mod@format`] - segment location and binary decoders
//! - [`metadata`] - block orchestration, post-processing and incremental
//!   reading
//! - [`config`] - decoder options and CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_streamer::{FileRangeReader, MetadataReader, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = FileRangeReader::open("photo.jpg").await?;
//!     let options = Options::default().with_iptc(true);
//!
//!     let report = MetadataReader::new(reader, options).read().await?;
//!     if let Some(output) = report.output {
//!         println!("{}", serde_json::to_string_pretty(&output)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;

// Re-export commonly used types
pub use config::{Config, Options, XmlParser};
pub use error::{IoError, ParseError, TiffError};
pub use format::tiff::{ByteOrder, FieldType, TagKey, TagMap, TiffHeader, Value};
pub use format::{locate, SegmentKind, SegmentRange};
pub use io::{FileRangeReader, MemoryRangeReader, RangeReader};
pub use metadata::{
    parse_buffer, parse_partial, BlockError, BlockKind, Blocks, MetadataReader, Output,
    ParseReport, Xmp,
};
