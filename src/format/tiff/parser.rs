//! TIFF header and IFD entry parsing.
//!
//! # TIFF Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Magic number (42 = 0x002A)
//! Bytes 4-7: Offset to IFD0, relative to the start of the TIFF block
//! ```
//!
//! # IFD Entry Structure (12 bytes)
//!
//! ```text
//! Bytes 0-1:  Tag ID
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Count (number of values, not bytes)
//! Bytes 8-11: Value if it fits in 4 bytes, else offset to the value
//! ```

use crate::error::TiffError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le};

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Magic number following the byte order marker
const TIFF_MAGIC: u16 = 0x002A;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry in bytes
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count field at the start of an IFD
pub const IFD_COUNT_SIZE: usize = 2;

/// Size of the value/offset field of an entry (the inline threshold)
pub const VALUE_OFFSET_SIZE: usize = 4;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF block.
///
/// Declared by the first two bytes of the header. All multi-byte values in
/// the block must be read respecting this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Detect the byte order from the first two bytes of a TIFF block.
    pub fn from_marker(marker: [u8; 2]) -> Result<Self, TiffError> {
        // Compared as a raw pattern, so endianness of the read doesn't matter
        match u16::from_be_bytes(marker) {
            BYTE_ORDER_LITTLE_ENDIAN => Ok(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => Ok(ByteOrder::BigEndian),
            other => Err(TiffError::InvalidByteOrderMarker(other)),
        }
    }

    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the block
    pub byte_order: ByteOrder,

    /// Offset of IFD0, relative to the TIFF start
    pub ifd0_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from the first bytes of a TIFF block.
    ///
    /// # Errors
    /// - `InvalidByteOrderMarker` if bytes 0-1 are not II or MM
    /// - `InvalidMagicNumber` if bytes 2-3 are not 42
    /// - `InvalidIfd0Offset` if the IFD0 offset points inside the header
    /// - `ValueOffsetOutOfRange` if fewer than 8 bytes are available
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::ValueOffsetOutOfRange {
                offset: 0,
                size: TIFF_HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let byte_order = ByteOrder::from_marker([bytes[0], bytes[1]])?;

        let magic = byte_order.read_u16(&bytes[2..4]);
        if magic != TIFF_MAGIC {
            return Err(TiffError::InvalidMagicNumber(magic));
        }

        let ifd0_offset = byte_order.read_u32(&bytes[4..8]);
        if (ifd0_offset as usize) < TIFF_HEADER_SIZE {
            return Err(TiffError::InvalidIfd0Offset(ifd0_offset));
        }

        Ok(TiffHeader {
            byte_order,
            ifd0_offset,
        })
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// One raw 12-byte IFD entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry {
    /// Tag identifier
    pub tag_id: u16,

    /// Decoded field type, `None` if the type code is unknown
    pub field_type: Option<FieldType>,

    /// Raw field type code
    pub field_type_raw: u16,

    /// Number of values
    pub count: u32,

    /// Raw bytes of the value/offset field
    pub value_offset_bytes: [u8; 4],
}

impl IfdEntry {
    /// Parse an entry from exactly 12 bytes.
    pub fn parse(bytes: &[u8], byte_order: ByteOrder) -> Self {
        let field_type_raw = byte_order.read_u16(&bytes[2..4]);
        IfdEntry {
            tag_id: byte_order.read_u16(&bytes[0..2]),
            field_type: FieldType::from_u16(field_type_raw),
            field_type_raw,
            count: byte_order.read_u32(&bytes[4..8]),
            value_offset_bytes: [bytes[8], bytes[9], bytes[10], bytes[11]],
        }
    }

    /// Total size of the value in bytes, `None` for unknown types.
    pub fn value_byte_size(&self) -> Option<usize> {
        self.field_type
            .map(|t| t.size_in_bytes() * self.count as usize)
    }

    /// Whether the value is stored in the entry itself.
    pub fn is_inline(&self) -> bool {
        self.field_type
            .map(|t| t.fits_inline(self.count))
            .unwrap_or(false)
    }

    /// Interpret the value/offset field as an offset.
    pub fn value_offset(&self, byte_order: ByteOrder) -> u32 {
        byte_order.read_u32(&self.value_offset_bytes)
    }
}

// =============================================================================
// Tests
// =============================================================================
