//! Bounds-checked, endian-aware reads from a borrowed byte buffer.
//!
//! Every accessor reports an out-of-range read as
//! [`TiffError::ValueOffsetOutOfRange`], which the incremental reader
//! treats as a request for more bytes.

use crate::error::TiffError;
use crate::format::tiff::ByteOrder;

/// Read-only view over the bytes loaded so far.
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    data: &'a [u8],
}

impl<'a> ByteView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of bytes in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], TiffError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(&self.data[offset..end]),
            _ => Err(TiffError::ValueOffsetOutOfRange {
                offset,
                size: len,
                available: self.data.len(),
            }),
        }
    }

    /// Check whether `pattern` occurs at `offset`. Out-of-range is `false`.
    pub fn matches_at(&self, offset: usize, pattern: &[u8]) -> bool {
        self.slice(offset, pattern.len())
            .map(|bytes| bytes == pattern)
            .unwrap_or(false)
    }

    pub fn u8(&self, offset: usize) -> Result<u8, TiffError> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn i8(&self, offset: usize) -> Result<i8, TiffError> {
        Ok(self.u8(offset)? as i8)
    }

    pub fn u16(&self, offset: usize, byte_order: ByteOrder) -> Result<u16, TiffError> {
        Ok(byte_order.read_u16(self.slice(offset, 2)?))
    }

    pub fn i16(&self, offset: usize, byte_order: ByteOrder) -> Result<i16, TiffError> {
        Ok(self.u16(offset, byte_order)? as i16)
    }

    pub fn u32(&self, offset: usize, byte_order: ByteOrder) -> Result<u32, TiffError> {
        Ok(byte_order.read_u32(self.slice(offset, 4)?))
    }

    pub fn i32(&self, offset: usize, byte_order: ByteOrder) -> Result<i32, TiffError> {
        Ok(self.u32(offset, byte_order)? as i32)
    }

    /// Decode `len` bytes as text, replacing invalid UTF-8.
    pub fn string(&self, offset: usize, len: usize) -> Result<String, TiffError> {
        Ok(String::from_utf8_lossy(self.slice(offset, len)?).into_owned())
    }
}
