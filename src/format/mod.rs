//! Binary metadata formats embedded in JPEG and TIFF files.
//!
//! [`segment::locate`] finds where each kind of metadata lives in a buffer;
//! the other modules decode one block kind each:
//!
//! - [`tiff`]: TIFF header, IFDs and typed tag values (EXIF, GPS, Interop)
//! - [`iptc`]: IPTC-IIM application record
//! - [`xmp`]: XMP packet text
//! - [`icc`]: ICC profile header

pub mod buffer;
pub mod icc;
pub mod iptc;
pub mod segment;
pub mod tiff;
pub mod xmp;

pub use buffer::ByteView;
pub use segment::{is_jpeg, locate, SegmentKind, SegmentRange};
