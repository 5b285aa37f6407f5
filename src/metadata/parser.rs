//! Synchronous metadata decoding over a byte buffer.
//!
//! # Decoding order
//!
//! ```text
//! TIFF header -> IFD0 -> Exif IFD -> GPS IFD -> Interop IFD -> IFD1
//!             then IPTC, XMP, ICC
//! ```
//!
//! IFD0 carries the pointers to the sub-IFDs, so it is decoded whenever any
//! TIFF-derived block is enabled, even if the `image` block itself is not.
//! An empty IFD0 stops the TIFF walk without an error.
//!
//! # Errors
//!
//! A failure aborts only the block it occurred in; it is recorded in the
//! [`ParseReport`] and the remaining blocks are still attempted. On a
//! partial buffer an out-of-range read instead suspends the whole parse
//! with [`ParseError::NeedMoreData`] so the caller can load more bytes and
//! start over.

use tracing::{debug, warn};

use crate::config::Options;
use crate::error::{ParseError, TiffError};
use crate::format::buffer::ByteView;
use crate::format::icc::decode_icc_header;
use crate::format::iptc::decode_iptc;
use crate::format::segment::{locate, SegmentKind};
use crate::format::tiff::{
    TagKey, TagMap, TagNamespace, TiffBlock, TiffHeader, Value, EXIF_IFD_POINTER,
    GPS_IFD_POINTER, INTEROP_IFD_POINTER, TIFF_HEADER_SIZE,
};
use crate::format::xmp::extract_xmp;

use super::output::{BlockError, BlockKind, Blocks, Output, ParseReport, Xmp};
use super::revive::{revive_gps, revive_tags};

/// Decode every enabled block of a complete buffer.
pub fn parse_buffer(data: &[u8], options: &Options) -> ParseReport {
    match Session::new(data, options, false).run() {
        Ok(report) => report,
        // A complete buffer records out-of-range reads as block errors, so
        // the session has nothing to suspend on
        Err(err) => {
            warn!(error = %err, "Unexpected suspension on a complete buffer");
            ParseReport::default()
        }
    }
}

/// Decode every enabled block of a buffer holding only a prefix of the
/// resource.
///
/// Returns [`ParseError::NeedMoreData`] as soon as a read falls past the end
/// of `data`.
pub fn parse_partial(data: &[u8], options: &Options) -> Result<ParseReport, ParseError> {
    Session::new(data, options, true).run()
}

// =============================================================================
// Session
// =============================================================================

/// State of one parse call.
struct Session<'a> {
    data: &'a [u8],
    options: &'a Options,

    /// Whether bytes past the end of `data` exist in the resource
    partial: bool,

    blocks: Blocks,
    errors: Vec<BlockError>,
}

/// Sub-IFD offsets found in IFD0, relative to the TIFF start.
#[derive(Debug, Default)]
struct Pointers {
    exif: Option<u32>,
    gps: Option<u32>,
    interop: Option<u32>,
}

impl<'a> Session<'a> {
    fn new(data: &'a [u8], options: &'a Options, partial: bool) -> Self {
        Self {
            data,
            options,
            partial,
            blocks: Blocks::default(),
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Result<ParseReport, ParseError> {
        if self.options.wants_tiff_blocks() {
            if let Some(range) = locate(self.data, SegmentKind::Tiff) {
                self.decode_tiff(range.start)?;
            }
        }

        if self.options.iptc {
            if let Some(range) = locate(self.data, SegmentKind::Iptc) {
                match decode_iptc(self.data, range) {
                    Ok(tags) => self.blocks.iptc = Some(tags),
                    Err(err) => self.settle(BlockKind::Iptc, err)?,
                }
            }
        }

        if self.options.xmp {
            if let Some(range) = locate(self.data, SegmentKind::Xmp) {
                self.blocks.xmp = extract_xmp(self.data, range).map(|text| {
                    match &self.options.xml_parser {
                        Some(parser) => Xmp::Parsed(parser(&text)),
                        None => Xmp::Raw(text),
                    }
                });
            }
        }

        if self.options.icc {
            if let Some(range) = locate(self.data, SegmentKind::Icc) {
                match decode_icc_header(self.data, range) {
                    Ok(tags) => self.blocks.icc = Some(tags),
                    Err(err) => self.settle(BlockKind::Icc, err)?,
                }
            }
        }

        Ok(self.finish())
    }

    /// Record a block failure, or suspend when more bytes could fix it.
    fn settle(&mut self, block: BlockKind, error: TiffError) -> Result<(), ParseError> {
        if self.partial {
            if let TiffError::ValueOffsetOutOfRange { offset, size, .. } = error {
                debug!(%block, offset, size, "Block needs more data");
                return Err(ParseError::NeedMoreData {
                    offset: offset as u64,
                    min_size: size,
                });
            }
        }

        warn!(%block, error = %error, "Failed to decode block");
        self.errors.push(BlockError { block, error });
        Ok(())
    }

    /// Decode one IFD, settling any failure against `block`.
    fn decode_ifd(
        &mut self,
        tiff: &TiffBlock<'_>,
        offset: u32,
        namespace: TagNamespace,
        block: BlockKind,
    ) -> Result<Option<TagMap>, ParseError> {
        match tiff.decode_ifd(offset, namespace) {
            Ok(tags) => Ok(Some(tags)),
            Err(err) => {
                self.settle(block, err)?;
                Ok(None)
            }
        }
    }

    fn decode_tiff(&mut self, start: usize) -> Result<(), ParseError> {
        let view = ByteView::new(self.data);
        let options = self.options;

        // IFD0 failures belong to the first requested block that needs it
        let ifd0_block = if options.tiff {
            BlockKind::Image
        } else if options.exif {
            BlockKind::Exif
        } else if options.gps {
            BlockKind::Gps
        } else if options.interop {
            BlockKind::Interop
        } else {
            BlockKind::Thumbnail
        };

        let header = match view
            .slice(start, TIFF_HEADER_SIZE)
            .and_then(TiffHeader::parse)
        {
            Ok(header) => header,
            Err(err) => return self.settle(ifd0_block, err),
        };
        debug!(start, byte_order = ?header.byte_order, ifd0 = header.ifd0_offset, "TIFF header");

        let tiff = TiffBlock::new(view, start, header.byte_order);

        let Some(mut ifd0) =
            self.decode_ifd(&tiff, header.ifd0_offset, TagNamespace::General, ifd0_block)?
        else {
            return Ok(());
        };

        if ifd0.is_empty() {
            if options.tiff {
                self.blocks.image = Some(ifd0);
            }
            return Ok(());
        }

        let mut pointers = Pointers {
            exif: take_pointer(&mut ifd0, EXIF_IFD_POINTER, options.post_process),
            gps: take_pointer(&mut ifd0, GPS_IFD_POINTER, options.post_process),
            interop: take_pointer(&mut ifd0, INTEROP_IFD_POINTER, options.post_process),
        };

        // The Exif IFD is also the fallback home of the Interop pointer
        let need_exif = options.exif || (options.interop && pointers.interop.is_none());
        // When only needed for its Interop pointer, failures belong to Interop
        let exif_block = if options.exif {
            BlockKind::Exif
        } else {
            BlockKind::Interop
        };
        let mut exif = match pointers.exif {
            Some(offset) if need_exif => {
                self.decode_ifd(&tiff, offset, TagNamespace::General, exif_block)?
            }
            _ => None,
        };
        if let Some(exif) = exif.as_mut() {
            let fallback = take_pointer(exif, INTEROP_IFD_POINTER, options.post_process);
            pointers.interop = pointers.interop.or(fallback);
        }

        let gps = match pointers.gps {
            Some(offset) if options.gps => {
                self.decode_ifd(&tiff, offset, TagNamespace::Gps, BlockKind::Gps)?
            }
            _ => None,
        };

        let interop = match pointers.interop {
            Some(offset) if options.interop => {
                self.decode_ifd(&tiff, offset, TagNamespace::Interop, BlockKind::Interop)?
            }
            _ => None,
        };

        // The thumbnail never appears in merged output
        let thumbnail = if options.thumbnail && !options.merge_output {
            self.decode_thumbnail(&tiff, header.ifd0_offset)?
        } else {
            None
        };

        if options.tiff {
            self.blocks.image = Some(self.revived(ifd0, revive_tags));
        }
        if options.exif {
            self.blocks.exif = exif.map(|tags| self.revived(tags, revive_tags));
        }
        self.blocks.gps = gps.map(|tags| self.revived(tags, revive_gps));
        self.blocks.interop = interop.map(|tags| self.revived(tags, revive_tags));
        self.blocks.thumbnail = thumbnail.map(|tags| self.revived(tags, revive_tags));

        Ok(())
    }

    /// Follow the next-IFD pointer of IFD0 to IFD1. A zero pointer means
    /// there is no thumbnail.
    fn decode_thumbnail(
        &mut self,
        tiff: &TiffBlock<'_>,
        ifd0_offset: u32,
    ) -> Result<Option<TagMap>, ParseError> {
        let ifd1_offset = match tiff.next_ifd_offset(ifd0_offset) {
            Ok(0) => return Ok(None),
            Ok(offset) => offset,
            Err(err) => {
                self.settle(BlockKind::Thumbnail, err)?;
                return Ok(None);
            }
        };

        self.decode_ifd(tiff, ifd1_offset, TagNamespace::General, BlockKind::Thumbnail)
    }

    fn revived(&self, mut tags: TagMap, revive: fn(&mut TagMap)) -> TagMap {
        if self.options.post_process {
            revive(&mut tags);
        }
        tags
    }

    fn finish(self) -> ParseReport {
        let output = if self.blocks.is_empty() {
            None
        } else if self.options.merge_output {
            Some(self.blocks.merge())
        } else {
            Some(Output::Nested(self.blocks))
        };

        ParseReport {
            output,
            errors: self.errors,
        }
    }
}

/// Read a sub-IFD pointer, removing the tag when `strip` is set.
fn take_pointer(tags: &mut TagMap, tag_id: u16, strip: bool) -> Option<u32> {
    let key = TagKey::resolve(TagNamespace::General, tag_id);
    let offset = tags.get_key(&key).and_then(Value::as_u32);
    if strip {
        if let Some(name) = key.name() {
            tags.remove(name);
        }
    }
    offset
}

// =============================================================================
// Tests
// =============================================================================
