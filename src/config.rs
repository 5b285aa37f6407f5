//! Configuration management for EXIF Streamer.
//!
//! Two layers:
//! - [`Options`] is the decoder configuration consumed by the library
//! - [`Config`] is the command-line surface (clap), with environment
//!   variable fallbacks using the `EXIF_` prefix
//!
//! # Example
//!
//! ```ignore
//! use exif_streamer::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//! let options = config.to_options();
//! ```
//!
//! # Environment Variables
//!
//! - `EXIF_TIFF`, `EXIF_EXIF`, `EXIF_GPS`, `EXIF_INTEROP`, `EXIF_THUMBNAIL`,
//!   `EXIF_XMP`, `EXIF_ICC`, `EXIF_IPTC` - Enable or disable each block
//! - `EXIF_NESTED` - Emit one object per block instead of a merged map
//! - `EXIF_RAW` - Skip value post-processing
//! - `EXIF_FIRST_CHUNK_SIZE` - Bytes read before locating segments (default: 512)
//! - `EXIF_CHUNK_SIZE` - Bytes read per additional request (default: 10000)

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};

// =============================================================================
// Default Values
// =============================================================================

/// Default size of the first read, enough for most APP1 headers.
pub const DEFAULT_FIRST_CHUNK_SIZE: usize = 512;

/// Default size of each additional read.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

// =============================================================================
// Decoder Options
// =============================================================================

/// Hook that turns XMP text into structured JSON.
pub type XmlParser = Arc<dyn Fn(&str) -> serde_json::Value + Send + Sync>;

/// Decoder configuration.
///
/// Every block can be enabled independently. `tiff` controls only the
/// `image` block: IFD0 is still decoded when a sub-IFD is requested.
#[derive(Clone)]
pub struct Options {
    /// IFD0 tags (`image` block)
    pub tiff: bool,

    /// Exif sub-IFD
    pub exif: bool,

    /// GPS sub-IFD
    pub gps: bool,

    /// Interoperability sub-IFD
    pub interop: bool,

    /// IFD1 tags (`thumbnail` block, nested output only)
    pub thumbnail: bool,

    pub xmp: bool,
    pub icc: bool,
    pub iptc: bool,

    /// Merge image, exif, gps, interop and iptc tags into one map
    pub merge_output: bool,

    /// Revive dates, translate enums, convert GPS coordinates and strip
    /// pointer tags
    pub post_process: bool,

    /// Bytes fetched before locating segments
    pub first_chunk_size: usize,

    /// Minimum bytes fetched when the decoder needs more data
    pub chunk_size: usize,

    /// Optional XMP parser; its output replaces the raw XMP text
    pub xml_parser: Option<XmlParser>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tiff: true,
            exif: true,
            gps: true,
            interop: false,
            thumbnail: false,
            xmp: false,
            icc: false,
            iptc: false,
            merge_output: true,
            post_process: true,
            first_chunk_size: DEFAULT_FIRST_CHUNK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            xml_parser: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("tiff", &self.tiff)
            .field("exif", &self.exif)
            .field("gps", &self.gps)
            .field("interop", &self.interop)
            .field("thumbnail", &self.thumbnail)
            .field("xmp", &self.xmp)
            .field("icc", &self.icc)
            .field("iptc", &self.iptc)
            .field("merge_output", &self.merge_output)
            .field("post_process", &self.post_process)
            .field("first_chunk_size", &self.first_chunk_size)
            .field("chunk_size", &self.chunk_size)
            .field("xml_parser", &self.xml_parser.is_some())
            .finish()
    }
}

impl Options {
    /// Options with every block enabled.
    pub fn all() -> Self {
        Self {
            interop: true,
            thumbnail: true,
            xmp: true,
            icc: true,
            iptc: true,
            ..Self::default()
        }
    }

    pub fn with_tiff(mut self, enabled: bool) -> Self {
        self.tiff = enabled;
        self
    }

    pub fn with_exif(mut self, enabled: bool) -> Self {
        self.exif = enabled;
        self
    }

    pub fn with_gps(mut self, enabled: bool) -> Self {
        self.gps = enabled;
        self
    }

    pub fn with_interop(mut self, enabled: bool) -> Self {
        self.interop = enabled;
        self
    }

    pub fn with_thumbnail(mut self, enabled: bool) -> Self {
        self.thumbnail = enabled;
        self
    }

    pub fn with_xmp(mut self, enabled: bool) -> Self {
        self.xmp = enabled;
        self
    }

    pub fn with_icc(mut self, enabled: bool) -> Self {
        self.icc = enabled;
        self
    }

    pub fn with_iptc(mut self, enabled: bool) -> Self {
        self.iptc = enabled;
        self
    }

    pub fn with_merge_output(mut self, enabled: bool) -> Self {
        self.merge_output = enabled;
        self
    }

    pub fn with_post_process(mut self, enabled: bool) -> Self {
        self.post_process = enabled;
        self
    }

    pub fn with_first_chunk_size(mut self, size: usize) -> Self {
        self.first_chunk_size = size;
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_xml_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> serde_json::Value + Send + Sync + 'static,
    {
        self.xml_parser = Some(Arc::new(parser));
        self
    }

    /// Whether any block derived from the TIFF structure is requested.
    pub fn wants_tiff_blocks(&self) -> bool {
        self.tiff || self.exif || self.gps || self.interop || self.thumbnail
    }

    /// Validate the options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_chunk_size == 0 {
            return Err("first_chunk_size must be greater than 0".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// EXIF Streamer - read image metadata without loading the whole file.
///
/// Prints EXIF, GPS, IPTC, XMP and ICC metadata found in a JPEG or TIFF
/// file as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-streamer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Input
    // =========================================================================
    /// Path of the JPEG or TIFF file to read.
    #[arg(required_unless_present = "base64", conflicts_with = "base64")]
    pub input: Option<PathBuf>,

    /// Read the image from a base64 string (optionally a `data:` URL).
    #[arg(long)]
    pub base64: Option<String>,

    // =========================================================================
    // Blocks
    // =========================================================================
    /// Emit IFD0 tags.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "EXIF_TIFF")]
    pub tiff: bool,

    /// Emit Exif sub-IFD tags.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "EXIF_EXIF")]
    pub exif: bool,

    /// Emit GPS tags.
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "EXIF_GPS")]
    pub gps: bool,

    /// Emit Interoperability tags.
    #[arg(long, default_value_t = false, action = ArgAction::Set, env = "EXIF_INTEROP")]
    pub interop: bool,

    /// Emit thumbnail (IFD1) tags. Only shown with --nested.
    #[arg(long, default_value_t = false, action = ArgAction::Set, env = "EXIF_THUMBNAIL")]
    pub thumbnail: bool,

    /// Emit the XMP packet.
    #[arg(long, default_value_t = false, action = ArgAction::Set, env = "EXIF_XMP")]
    pub xmp: bool,

    /// Emit the ICC profile header.
    #[arg(long, default_value_t = false, action = ArgAction::Set, env = "EXIF_ICC")]
    pub icc: bool,

    /// Emit IPTC tags.
    #[arg(long, default_value_t = false, action = ArgAction::Set, env = "EXIF_IPTC")]
    pub iptc: bool,

    /// Enable every block.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    // =========================================================================
    // Output
    // =========================================================================
    /// Emit one object per block instead of a single merged map.
    #[arg(long, default_value_t = false, env = "EXIF_NESTED")]
    pub nested: bool,

    /// Keep raw values: no date parsing, enum names or decimal GPS.
    #[arg(long, default_value_t = false, env = "EXIF_RAW")]
    pub raw: bool,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    // =========================================================================
    // Reading
    // =========================================================================
    /// Bytes read before locating metadata segments.
    #[arg(long, default_value_t = DEFAULT_FIRST_CHUNK_SIZE, env = "EXIF_FIRST_CHUNK_SIZE")]
    pub first_chunk_size: usize,

    /// Bytes read per additional request.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "EXIF_CHUNK_SIZE")]
    pub chunk_size: usize,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.input, &self.base64) {
            (None, None) => {
                return Err("An input path or --base64 is required".to_string());
            }
            (Some(_), Some(_)) => {
                return Err("Pass either an input path or --base64, not both".to_string());
            }
            _ => {}
        }

        if self.base64.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err("--base64 input is empty".to_string());
        }

        self.to_options().validate()
    }

    /// Build decoder options from the command line.
    pub fn to_options(&self) -> Options {
        let options = Options {
            tiff: self.tiff,
            exif: self.exif,
            gps: self.gps,
            interop: self.interop,
            thumbnail: self.thumbnail,
            xmp: self.xmp,
            icc: self.icc,
            iptc: self.iptc,
            merge_output: !self.nested,
            post_process: !self.raw,
            first_chunk_size: self.first_chunk_size,
            chunk_size: self.chunk_size,
            xml_parser: None,
        };

        if self.all {
            Options {
                tiff: true,
                exif: true,
                gps: true,
                ..Options::all()
            }
            .with_merge_output(options.merge_output)
            .with_post_process(options.post_process)
            .with_first_chunk_size(options.first_chunk_size)
            .with_chunk_size(options.chunk_size)
        } else {
            options
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
