//! Result types of a metadata parse.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::TiffError;
use crate::format::tiff::TagMap;

// =============================================================================
// Block identity and errors
// =============================================================================

/// One output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Image,
    Thumbnail,
    Exif,
    Gps,
    Interop,
    Iptc,
    Xmp,
    Icc,
}

impl BlockKind {
    /// Key of the block in nested output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Image => "image",
            BlockKind::Thumbnail => "thumbnail",
            BlockKind::Exif => "exif",
            BlockKind::Gps => "gps",
            BlockKind::Interop => "interop",
            BlockKind::Iptc => "iptc",
            BlockKind::Xmp => "xmp",
            BlockKind::Icc => "icc",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block that could not be decoded. Other blocks are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockError {
    pub block: BlockKind,
    pub error: TiffError,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} block: {}", self.block, self.error)
    }
}

// =============================================================================
// Blocks
// =============================================================================

/// XMP packet, raw or as returned by the configured XML parser.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Xmp {
    Raw(String),
    Parsed(serde_json::Value),
}

/// Every block a parse produced, keyed by block kind.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Blocks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interop: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iptc: Option<TagMap>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmp: Option<Xmp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icc: Option<TagMap>,
}

impl Blocks {
    /// Check if no block was produced.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.thumbnail.is_none()
            && self.exif.is_none()
            && self.gps.is_none()
            && self.interop.is_none()
            && self.iptc.is_none()
            && self.xmp.is_none()
            && self.icc.is_none()
    }

    /// Tag block of the given kind. `Xmp` has no tag map.
    pub fn tags(&self, kind: BlockKind) -> Option<&TagMap> {
        match kind {
            BlockKind::Image => self.image.as_ref(),
            BlockKind::Thumbnail => self.thumbnail.as_ref(),
            BlockKind::Exif => self.exif.as_ref(),
            BlockKind::Gps => self.gps.as_ref(),
            BlockKind::Interop => self.interop.as_ref(),
            BlockKind::Iptc => self.iptc.as_ref(),
            BlockKind::Icc => self.icc.as_ref(),
            BlockKind::Xmp => None,
        }
    }

    /// Flatten into the merged shape. Later blocks win on key collisions;
    /// the thumbnail is dropped.
    pub fn merge(self) -> Output {
        let mut tags = TagMap::new();
        for block in [self.image, self.exif, self.gps, self.interop, self.iptc]
            .into_iter()
            .flatten()
        {
            tags.extend(block);
        }

        Output::Merged {
            tags,
            xmp: self.xmp,
            icc: self.icc,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Final shape of the decoded metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Image, Exif, GPS, Interop and IPTC tags in one map, with XMP and ICC
    /// alongside.
    Merged {
        tags: TagMap,
        xmp: Option<Xmp>,
        icc: Option<TagMap>,
    },

    /// One entry per block.
    Nested(Blocks),
}

impl Output {
    /// The merged tag map, if this is merged output.
    pub fn merged(&self) -> Option<&TagMap> {
        match self {
            Output::Merged { tags, .. } => Some(tags),
            Output::Nested(_) => None,
        }
    }

    /// The blocks, if this is nested output.
    pub fn nested(&self) -> Option<&Blocks> {
        match self {
            Output::Merged { .. } => None,
            Output::Nested(blocks) => Some(blocks),
        }
    }

    pub fn xmp(&self) -> Option<&Xmp> {
        match self {
            Output::Merged { xmp, .. } => xmp.as_ref(),
            Output::Nested(blocks) => blocks.xmp.as_ref(),
        }
    }

    pub fn icc(&self) -> Option<&TagMap> {
        match self {
            Output::Merged { icc, .. } => icc.as_ref(),
            Output::Nested(blocks) => blocks.icc.as_ref(),
        }
    }
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Output::Nested(blocks) => blocks.serialize(serializer),
            Output::Merged { tags, xmp, icc } => {
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in tags.iter() {
                    map.serialize_entry(key, value)?;
                }
                if let Some(xmp) = xmp {
                    map.serialize_entry("xmp", xmp)?;
                }
                if let Some(icc) = icc {
                    map.serialize_entry("icc", icc)?;
                }
                map.end()
            }
        }
    }
}

// =============================================================================
// ParseReport
// =============================================================================

/// Decoded metadata plus the blocks that failed.
///
/// `output` is `None` when no block produced anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub output: Option<Output>,
    pub errors: Vec<BlockError>,
}

impl ParseReport {
    /// Every attempted block failed and nothing was produced.
    pub fn failed(&self) -> bool {
        self.output.is_none() && !self.errors.is_empty()
    }

    /// Error recorded for `block`, if any.
    pub fn error_for(&self, block: BlockKind) -> Option<&TiffError> {
        self.errors
            .iter()
            .find(|e| e.block == block)
            .map(|e| &e.error)
    }
}
