//! TIFF structure decoding for EXIF metadata.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF blocks declare their endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values must be read
//!   respecting this order.
//!
//! - **IFD (Image File Directory)**: an entry count followed by 12-byte tag
//!   entries. IFD0 describes the main image and carries pointers to the Exif,
//!   GPS and Interoperability sub-IFDs; IFD1 describes the thumbnail.
//!
//! - **Inline vs offset values**: values of 4 bytes or less are stored inline
//!   in the IFD entry, larger values at an offset relative to the TIFF start.

mod ifd;
mod parser;
mod tags;
mod values;

pub use ifd::{TagKey, TagMap, TiffBlock};
pub use parser::{ByteOrder, IfdEntry, TiffHeader, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE};
pub use tags::{FieldType, TagNamespace, EXIF_IFD_POINTER, GPS_IFD_POINTER, INTEROP_IFD_POINTER};
pub use values::{decode_value, Value};
