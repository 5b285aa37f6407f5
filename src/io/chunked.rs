use bytes::BytesMut;
use tracing::debug;

use super::RangeReader;
use crate::error::IoError;

/// Contiguous, growing prefix of a resource.
///
/// The decoder addresses bytes by absolute offset, so loaded data always
/// starts at offset 0. Requests past the loaded end fetch the gap in one
/// read, which keeps the buffer contiguous.
pub struct ChunkedBuffer<'a, R: RangeReader> {
    reader: &'a R,
    data: BytesMut,
    requests: usize,
}

impl<'a, R: RangeReader> ChunkedBuffer<'a, R> {
    /// Create an empty buffer over `reader`.
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            data: BytesMut::new(),
            requests: 0,
        }
    }

    /// Make sure bytes `[0, offset + len)` are loaded, clamped to the
    /// resource size.
    pub async fn ensure(&mut self, offset: u64, len: usize) -> Result<(), IoError> {
        let wanted = std::cmp::min(offset.saturating_add(len as u64), self.reader.size());
        let loaded = self.data.len() as u64;
        if wanted <= loaded {
            return Ok(());
        }

        let gap = (wanted - loaded) as usize;
        debug!(
            source = self.reader.identifier(),
            offset = loaded,
            len = gap,
            "Fetching chunk"
        );
        let chunk = self.reader.read_chunk(loaded, gap).await?;
        self.data.extend_from_slice(&chunk);
        self.requests += 1;
        Ok(())
    }

    /// Load the whole resource.
    pub async fn load_all(&mut self) -> Result<(), IoError> {
        let size = self.reader.size();
        self.ensure(0, size as usize).await
    }

    /// Whether every byte of the resource is loaded.
    pub fn is_complete(&self) -> bool {
        self.data.len() as u64 >= self.reader.size()
    }

    /// Number of bytes currently loaded.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of reads issued against the underlying reader.
    pub fn request_count(&self) -> usize {
        self.requests
    }

    /// The loaded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
