use thiserror::Error;

/// I/O errors raised by the input-acquisition layer
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Error from the local filesystem
    #[error("I/O error: {0}")]
    Io(String),

    /// Requested range exceeds resource bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Base64 input could not be decoded
    #[error("Invalid base64 input: {0}")]
    InvalidBase64(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => IoError::NotFound(err.to_string()),
            _ => IoError::Io(err.to_string()),
        }
    }
}

/// Errors that can occur when decoding a TIFF block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// First two bytes of the TIFF header are neither II nor MM
    #[error("Invalid TIFF byte order marker: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrderMarker(u16),

    /// Magic number 42 missing after the byte order marker
    #[error("Invalid TIFF magic number: expected 0x002A, got 0x{0:04X}")]
    InvalidMagicNumber(u16),

    /// IFD0 offset points inside the 8-byte header
    #[error("Invalid IFD0 offset: {0} (must be at least 8)")]
    InvalidIfd0Offset(u32),

    /// A directory or tag value lies beyond the available bytes
    #[error("Value out of range: {size} bytes at offset {offset}, only {available} bytes available")]
    ValueOffsetOutOfRange {
        offset: usize,
        size: usize,
        available: usize,
    },
}

impl TiffError {
    /// Whether loading more bytes could make this error go away.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TiffError::ValueOffsetOutOfRange { .. })
    }
}

/// Top-level errors returned by the metadata parsers
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// I/O error while fetching bytes
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The buffer in hand ends before a value the decoder needs.
    ///
    /// Only produced for partial buffers; [`crate::metadata::MetadataReader`]
    /// answers it by fetching a chunk anchored at `offset` and retrying.
    #[error("Need at least {min_size} more bytes at offset {offset}")]
    NeedMoreData { offset: u64, min_size: usize },
}
