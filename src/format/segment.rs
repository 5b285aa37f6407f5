//! Locating metadata segments inside a JPEG byte stream.
//!
//! Metadata lives in JPEG application segments:
//!
//! ```text
//! FF E1 <len:u16 BE> "Exif\0\0" <TIFF block>        APP1 / EXIF
//! FF E1 <len:u16 BE> "http://ns.adobe.com/..." <XML> APP1 / XMP
//! FF E2 <len:u16 BE> "ICC_PROFILE\0" <seq> <n> <ICC> APP2 / ICC
//! ... "8BIM" 04 04 <name> <len:u32 BE> <IPTC>       APP13 Photoshop resource
//! ```
//!
//! The length field counts itself (2 bytes) and the identifier but not the
//! marker. It is big-endian regardless of the TIFF byte order inside.
//!
//! A bare TIFF file has no wrapper: its TIFF block starts at offset 0 and
//! has no known size.
//!
//! Scanning is a single linear pass that stops at the first match, so only
//! the first segment of each kind is found.

use tracing::debug;

use crate::format::buffer::ByteView;
use crate::format::tiff::ByteOrder;
use crate::io::{read_u16_be, read_u32_be};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// Application segment 1 (EXIF, XMP) marker
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Application segment 2 (ICC profile) marker
pub const APP2: [u8; 2] = [0xFF, 0xE2];

/// Identifier following the APP1 length for EXIF data
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

/// Start of the XMP namespace URI following the APP1 length
const XMP_IDENTIFIER: &[u8] = b"http";

/// Identifier following the APP2 length for ICC profiles
const ICC_IDENTIFIER: &[u8] = b"ICC_PROFILE\0";

/// Photoshop image resource "8BIM" with resource ID 0x0404 (IPTC-NAA)
const IPTC_RESOURCE: &[u8] = &[0x38, 0x42, 0x49, 0x4D, 0x04, 0x04];

/// Bytes between the marker and the TIFF block: length(2) + "Exif\0\0"(6)
const EXIF_HEADER_SIZE: usize = 10;

/// Bytes between the marker and the XMP payload: length(2)
const XMP_HEADER_SIZE: usize = 4;

/// Bytes between the marker and the ICC profile: length(2) + identifier(12) + seq(1) + count(1)
const ICC_HEADER_SIZE: usize = 18;

// =============================================================================
// SegmentRange
// =============================================================================

/// Kind of metadata segment to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Tiff,
    Xmp,
    Iptc,
    Icc,
}

/// Byte range of a segment payload within the buffer.
///
/// `end()` may exceed the loaded buffer when the segment spans more bytes
/// than were fetched so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    /// Absolute offset of the payload
    pub start: usize,

    /// Payload size, unknown for a bare TIFF file
    pub size: Option<usize>,
}

impl SegmentRange {
    /// Offset one past the payload, when the size is known.
    pub fn end(&self) -> Option<usize> {
        self.size.map(|size| self.start + size)
    }
}

// =============================================================================
// Locating
// =============================================================================

/// Find the first segment of `kind` in `data`.
///
/// Absence is not an error: an image may legitimately carry no metadata.
pub fn locate(data: &[u8], kind: SegmentKind) -> Option<SegmentRange> {
    let view = ByteView::new(data);
    let range = match kind {
        SegmentKind::Tiff => locate_tiff(&view),
        SegmentKind::Xmp => locate_app_segment(&view, APP1, XMP_IDENTIFIER, XMP_HEADER_SIZE),
        SegmentKind::Icc => locate_app_segment(&view, APP2, ICC_IDENTIFIER, ICC_HEADER_SIZE),
        SegmentKind::Iptc => locate_iptc(&view),
    };

    match range {
        Some(range) => debug!(?kind, start = range.start, size = ?range.size, "Located segment"),
        None => debug!(?kind, "Segment not present"),
    }
    range
}

/// Check whether `data` starts like a JPEG stream.
pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&SOI)
}

fn locate_tiff(view: &ByteView<'_>) -> Option<SegmentRange> {
    if let Ok(marker) = view.slice(0, 2) {
        if ByteOrder::from_marker([marker[0], marker[1]]).is_ok() {
            return Some(SegmentRange {
                start: 0,
                size: None,
            });
        }
    }

    locate_app_segment(view, APP1, EXIF_IDENTIFIER, EXIF_HEADER_SIZE)
}

/// Scan for `marker`, a 2-byte length, then `identifier`. The payload starts
/// `header_size` bytes after the marker.
fn locate_app_segment(
    view: &ByteView<'_>,
    marker: [u8; 2],
    identifier: &[u8],
    header_size: usize,
) -> Option<SegmentRange> {
    let needed = std::cmp::max(header_size, 4 + identifier.len());
    let mut pos = 0;

    while pos + needed <= view.len() {
        if view.matches_at(pos, &marker) && view.matches_at(pos + 4, identifier) {
            let length = read_u16_be(view.slice(pos + 2, 2).ok()?) as usize;
            return Some(SegmentRange {
                start: pos + header_size,
                // Length counts everything after the marker up to the payload
                size: Some(length.saturating_sub(header_size - 2)),
            });
        }
        pos += 1;
    }

    None
}

/// Scan for the Photoshop IPTC resource and skip its Pascal-string name,
/// which is padded so that length byte + name is even.
fn locate_iptc(view: &ByteView<'_>) -> Option<SegmentRange> {
    let mut pos = 0;

    while pos + IPTC_RESOURCE.len() < view.len() {
        if view.matches_at(pos, IPTC_RESOURCE) {
            let name_len = view.u8(pos + IPTC_RESOURCE.len()).ok()? as usize;
            let name_block = (1 + name_len + 1) & !1;
            let size_offset = pos + IPTC_RESOURCE.len() + name_block;
            let size = read_u32_be(view.slice(size_offset, 4).ok()?) as usize;

            return Some(SegmentRange {
                start: size_offset + 4,
                size: Some(size),
            });
        }
        pos += 1;
    }

    None
}

// =============================================================================
// Tests
// =============================================================================
