//! Incremental metadata reading over a [`RangeReader`].
//!
//! Only the bytes the decoder needs are fetched:
//!
//! 1. The first `first_chunk_size` bytes are loaded.
//! 2. Each enabled segment is located. A located segment is loaded up to its
//!    end; a segment missing from a partial buffer triggers a full load,
//!    since it may sit further in the file.
//! 3. The synchronous decoder runs on the loaded prefix. Whenever it reports
//!    [`ParseError::NeedMoreData`], a chunk of at least `chunk_size` bytes
//!    anchored at the requested offset is loaded and decoding restarts.
//!    After [`MAX_CHUNK_REQUESTS`] such chunks the rest of the resource is
//!    loaded in one read and decoded as a complete buffer.

use tracing::{debug, info};

use crate::config::Options;
use crate::error::ParseError;
use crate::format::segment::{locate, SegmentKind};
use crate::io::{ChunkedBuffer, RangeReader};

use super::output::ParseReport;
use super::parser::{parse_buffer, parse_partial};

/// Chunk requests issued while decoding before falling back to a full load.
pub const MAX_CHUNK_REQUESTS: usize = 32;

/// Reads metadata from any [`RangeReader`].
pub struct MetadataReader<R: RangeReader> {
    reader: R,
    options: Options,
}

impl<R: RangeReader> MetadataReader<R> {
    pub fn new(reader: R, options: Options) -> Self {
        Self { reader, options }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Fetch and decode the metadata.
    ///
    /// Block-level failures end up in the report; only I/O failures are
    /// returned as errors.
    pub async fn read(&self) -> Result<ParseReport, ParseError> {
        let mut buffer = ChunkedBuffer::new(&self.reader);
        buffer.ensure(0, self.options.first_chunk_size).await?;

        self.load_segments(&mut buffer).await?;

        let mut chunk_requests = 0;
        let report = loop {
            if buffer.is_complete() {
                break parse_buffer(buffer.as_slice(), &self.options);
            }

            match parse_partial(buffer.as_slice(), &self.options) {
                Ok(report) => break report,
                Err(ParseError::NeedMoreData { offset, min_size }) => {
                    if chunk_requests >= MAX_CHUNK_REQUESTS {
                        debug!(chunk_requests, "Chunk request limit reached, loading everything");
                        buffer.load_all().await?;
                        break parse_buffer(buffer.as_slice(), &self.options);
                    }
                    chunk_requests += 1;

                    let len = std::cmp::max(min_size, self.options.chunk_size);
                    buffer.ensure(offset, len).await?;
                }
                Err(err) => return Err(err),
            }
        };

        info!(
            source = self.reader.identifier(),
            loaded = buffer.len(),
            size = self.reader.size(),
            requests = buffer.request_count(),
            errors = report.errors.len(),
            "Read metadata"
        );
        Ok(report)
    }

    /// Make sure every enabled segment is fully loaded.
    async fn load_segments(&self, buffer: &mut ChunkedBuffer<'_, R>) -> Result<(), ParseError> {
        let options = &self.options;
        let kinds = [
            (SegmentKind::Tiff, options.wants_tiff_blocks()),
            (SegmentKind::Iptc, options.iptc),
            (SegmentKind::Xmp, options.xmp),
            (SegmentKind::Icc, options.icc),
        ];

        for (kind, enabled) in kinds {
            if !enabled {
                continue;
            }

            match locate(buffer.as_slice(), kind) {
                Some(range) => {
                    if let Some(end) = range.end() {
                        buffer.ensure(0, end).await?;
                    }
                }
                None if !buffer.is_complete() => {
                    debug!(?kind, "Segment not in loaded prefix, loading everything");
                    buffer.load_all().await?;
                    return Ok(());
                }
                None => {}
            }
        }

        Ok(())
    }
}
