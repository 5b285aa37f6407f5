use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use super::RangeReader;
use crate::error::IoError;

/// RangeReader over bytes that are already in memory.
///
/// Used for blobs handed over by the caller and for base64-encoded input.
#[derive(Clone)]
pub struct MemoryRangeReader {
    data: Bytes,
    identifier: String,
}

impl MemoryRangeReader {
    /// Wrap an in-memory buffer.
    pub fn new(data: impl Into<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            identifier: identifier.into(),
        }
    }

    /// Decode a base64 string, optionally prefixed with a `data:` URL header
    /// such as `data:image/jpeg;base64,`.
    pub fn from_base64(input: &str) -> Result<Self, IoError> {
        let payload = match input.find("base64,") {
            Some(pos) if input.starts_with("data:") => &input[pos + "base64,".len()..],
            _ => input,
        };

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| IoError::InvalidBase64(e.to_string()))?;

        Ok(Self::new(data, "base64://input"))
    }
}

#[async_trait]
impl RangeReader for MemoryRangeReader {
    async fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        let size = self.data.len() as u64;
        if offset + len as u64 > size {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size,
            });
        }

        let start = offset as usize;
        Ok(self.data.slice(start..start + len))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
