//! Test utilities for integration tests.
//!
//! This module provides a request-tracking mock reader and builders for
//! synthetic TIFF blocks and JPEG files carrying EXIF, XMP, IPTC and ICC
//! segments.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use exif_streamer::error::IoError;
use exif_streamer::io::RangeReader;

// =============================================================================
// Mock Range Reader with Request Tracking
// =============================================================================

/// A mock range reader that tracks all read requests.
pub struct TrackingMockReader {
    data: Bytes,
    identifier: String,
    request_count: Arc<AtomicUsize>,
    requests: Arc<RwLock<Vec<(u64, usize)>>>,
}

impl TrackingMockReader {
    pub fn new(data: Vec<u8>, identifier: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(data),
            identifier: identifier.into(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub async fn get_requests(&self) -> Vec<(u64, usize)> {
        self.requests.read().await.clone()
    }

    /// Total bytes served so far.
    pub async fn bytes_read(&self) -> usize {
        self.requests.read().await.iter().map(|(_, len)| len).sum()
    }
}

impl Clone for TrackingMockReader {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            identifier: self.identifier.clone(),
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl RangeReader for TrackingMockReader {
    async fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push((offset, len));

        let start = offset as usize;
        let end = start + len;
        if end > self.data.len() {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.data.len() as u64,
            });
        }
        Ok(self.data.slice(start..end))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// TIFF Builders
// =============================================================================

#[derive(Clone, Copy, Debug)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

impl ByteOrderType {
    fn u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }

    fn u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrderType::LittleEndian => value.to_le_bytes(),
            ByteOrderType::BigEndian => value.to_be_bytes(),
        }
    }
}

struct IfdEntryBuilder {
    tag: u16,
    field_type: u16,
    count: u32,
    /// Value bytes already encoded in the block's byte order
    payload: Vec<u8>,
}

/// Builder for one IFD. Values larger than 4 bytes are written right after
/// the directory.
pub struct IfdBuilder {
    byte_order: ByteOrderType,
    entries: Vec<IfdEntryBuilder>,
}

impl IfdBuilder {
    pub fn new(byte_order: ByteOrderType) -> Self {
        Self {
            byte_order,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, tag: u16, field_type: u16, count: u32, payload: Vec<u8>) -> &mut Self {
        self.entries.push(IfdEntryBuilder {
            tag,
            field_type,
            count,
            payload,
        });
        self
    }

    pub fn add_byte(&mut self, tag: u16, values: &[u8]) -> &mut Self {
        self.push(tag, 1, values.len() as u32, values.to_vec())
    }

    pub fn add_ascii(&mut self, tag: u16, text: &str) -> &mut Self {
        let mut payload = text.as_bytes().to_vec();
        payload.push(0);
        self.push(tag, 2, payload.len() as u32, payload)
    }

    pub fn add_short(&mut self, tag: u16, value: u16) -> &mut Self {
        self.add_shorts(tag, &[value])
    }

    pub fn add_shorts(&mut self, tag: u16, values: &[u16]) -> &mut Self {
        let order = self.byte_order;
        let payload = values.iter().flat_map(|v| order.u16(*v)).collect();
        self.push(tag, 3, values.len() as u32, payload)
    }

    pub fn add_long(&mut self, tag: u16, value: u32) -> &mut Self {
        let payload = self.byte_order.u32(value).to_vec();
        self.push(tag, 4, 1, payload)
    }

    pub fn add_rationals(&mut self, tag: u16, values: &[(u32, u32)]) -> &mut Self {
        let order = self.byte_order;
        let payload = values
            .iter()
            .flat_map(|(n, d)| order.u32(*n).into_iter().chain(order.u32(*d)))
            .collect();
        self.push(tag, 5, values.len() as u32, payload)
    }

    pub fn add_srational(&mut self, tag: u16, numerator: i32, denominator: i32) -> &mut Self {
        let order = self.byte_order;
        let mut payload = order.u32(numerator as u32).to_vec();
        payload.extend_from_slice(&order.u32(denominator as u32));
        self.push(tag, 10, 1, payload)
    }

    pub fn add_sshort(&mut self, tag: u16, value: i16) -> &mut Self {
        let payload = self.byte_order.u16(value as u16).to_vec();
        self.push(tag, 8, 1, payload)
    }

    pub fn add_undefined(&mut self, tag: u16, bytes: &[u8]) -> &mut Self {
        self.push(tag, 7, bytes.len() as u32, bytes.to_vec())
    }

    fn set_long(&mut self, tag: u16, value: u32) {
        let payload = self.byte_order.u32(value).to_vec();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.tag == tag) {
            entry.payload = payload;
        }
    }

    fn external_size(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.payload.len() > 4)
            .map(|e| e.payload.len())
            .sum()
    }

    fn size(&self) -> usize {
        2 + self.entries.len() * 12 + 4 + self.external_size()
    }

    /// Write the IFD at `offset` (relative to the TIFF start, which must
    /// equal `data.len()`).
    fn write_to(&self, data: &mut Vec<u8>, next_ifd: u32) {
        let order = self.byte_order;
        let offset = data.len();
        let mut external_offset = offset + 2 + self.entries.len() * 12 + 4;
        let mut external = Vec::new();

        data.extend_from_slice(&order.u16(self.entries.len() as u16));
        for entry in &self.entries {
            data.extend_from_slice(&order.u16(entry.tag));
            data.extend_from_slice(&order.u16(entry.field_type));
            data.extend_from_slice(&order.u32(entry.count));

            if entry.payload.len() <= 4 {
                let mut inline = entry.payload.clone();
                inline.resize(4, 0);
                data.extend_from_slice(&inline);
            } else {
                data.extend_from_slice(&order.u32(external_offset as u32));
                external_offset += entry.payload.len();
                external.extend_from_slice(&entry.payload);
            }
        }
        data.extend_from_slice(&order.u32(next_ifd));
        data.extend_from_slice(&external);
    }
}

/// Builder for a TIFF block with IFD0 and optional sub-IFDs and IFD1.
///
/// Pointer tags are added and patched automatically.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    ifd0: IfdBuilder,
    exif: Option<IfdBuilder>,
    gps: Option<IfdBuilder>,
    interop: Option<IfdBuilder>,
    ifd1: Option<IfdBuilder>,
}

impl TiffBuilder {
    pub fn new(byte_order: ByteOrderType) -> Self {
        Self {
            byte_order,
            ifd0: IfdBuilder::new(byte_order),
            exif: None,
            gps: None,
            interop: None,
            ifd1: None,
        }
    }

    pub fn ifd0(&mut self) -> &mut IfdBuilder {
        &mut self.ifd0
    }

    pub fn exif(&mut self) -> &mut IfdBuilder {
        let order = self.byte_order;
        self.exif.get_or_insert_with(|| IfdBuilder::new(order))
    }

    pub fn gps(&mut self) -> &mut IfdBuilder {
        let order = self.byte_order;
        self.gps.get_or_insert_with(|| IfdBuilder::new(order))
    }

    /// Interop IFD; its pointer lives in the Exif IFD when there is one.
    pub fn interop(&mut self) -> &mut IfdBuilder {
        let order = self.byte_order;
        self.interop.get_or_insert_with(|| IfdBuilder::new(order))
    }

    pub fn ifd1(&mut self) -> &mut IfdBuilder {
        let order = self.byte_order;
        self.ifd1.get_or_insert_with(|| IfdBuilder::new(order))
    }

    /// Build the TIFF block.
    pub fn build(mut self) -> Vec<u8> {
        let order = self.byte_order;

        // Pointer entries first, so directory sizes are final
        if self.exif.is_some() {
            self.ifd0.add_long(0x8769, 0);
        }
        if self.gps.is_some() {
            self.ifd0.add_long(0x8825, 0);
        }
        if self.interop.is_some() {
            match self.exif.as_mut() {
                Some(exif) => exif.add_long(0xA005, 0),
                None => self.ifd0.add_long(0xA005, 0),
            };
        }

        let ifd0_offset = 8;
        let mut next = ifd0_offset + self.ifd0.size();
        let mut place = |ifd: &Option<IfdBuilder>| -> u32 {
            match ifd {
                Some(ifd) => {
                    let offset = next;
                    next += ifd.size();
                    offset as u32
                }
                None => 0,
            }
        };
        let exif_offset = place(&self.exif);
        let gps_offset = place(&self.gps);
        let interop_offset = place(&self.interop);
        let ifd1_offset = place(&self.ifd1);

        // Only patch pointers this builder added; hand-written ones stay
        if self.exif.is_some() {
            self.ifd0.set_long(0x8769, exif_offset);
        }
        if self.gps.is_some() {
            self.ifd0.set_long(0x8825, gps_offset);
        }
        if self.interop.is_some() {
            match self.exif.as_mut() {
                Some(exif) => exif.set_long(0xA005, interop_offset),
                None => self.ifd0.set_long(0xA005, interop_offset),
            }
        }

        let mut data = Vec::new();
        match order {
            ByteOrderType::LittleEndian => data.extend_from_slice(b"II"),
            ByteOrderType::BigEndian => data.extend_from_slice(b"MM"),
        }
        data.extend_from_slice(&order.u16(42));
        data.extend_from_slice(&order.u32(ifd0_offset as u32));

        self.ifd0.write_to(&mut data, ifd1_offset);
        for ifd in [&self.exif, &self.gps, &self.interop, &self.ifd1]
            .into_iter()
            .flatten()
        {
            ifd.write_to(&mut data, 0);
        }

        data
    }
}

/// A camera-like TIFF block: Make/Model/Orientation/ModifyDate in IFD0,
/// exposure data in Exif, a GPS fix (40°26'46" N, 79°58'56" W) and an IFD1.
pub fn create_camera_tiff(byte_order: ByteOrderType) -> Vec<u8> {
    let mut builder = TiffBuilder::new(byte_order);
    builder
        .ifd0()
        .add_ascii(0x010F, "Canon")
        .add_ascii(0x0110, "Canon EOS 5D")
        .add_short(0x0112, 1)
        .add_rationals(0x011A, &[(72, 1)])
        .add_short(0x0128, 2)
        .add_ascii(0x0132, "2019:06:01 12:30:05");
    builder
        .exif()
        .add_rationals(0x829A, &[(1, 200)])
        .add_rationals(0x829D, &[(28, 10)])
        .add_short(0x8822, 3)
        .add_short(0x8827, 400)
        .add_undefined(0x9000, b"0230")
        .add_ascii(0x9003, "2019:06:01 12:30:05")
        .add_srational(0x9204, -1, 3)
        .add_short(0x9209, 0x10)
        .add_undefined(0x9101, &[1, 2, 3, 0]);
    builder
        .gps()
        .add_byte(0x0000, &[2, 3, 0, 0])
        .add_ascii(0x0001, "N")
        .add_rationals(0x0002, &[(40, 1), (26, 1), (46, 1)])
        .add_ascii(0x0003, "W")
        .add_rationals(0x0004, &[(79, 1), (58, 1), (56, 1)])
        .add_rationals(0x0007, &[(14, 1), (30, 1), (46, 1)])
        .add_ascii(0x001D, "2019:06:01");
    builder.ifd1().add_short(0x0103, 6).add_long(0x0201, 0);
    builder.build()
}

// =============================================================================
// JPEG Builders
// =============================================================================

/// Builder for a JPEG byte stream made of metadata segments.
///
/// Only the container is valid: there is no image data between SOS and EOI.
pub struct JpegBuilder {
    segments: Vec<Vec<u8>>,
    padding: usize,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            padding: 0,
        }
    }

    /// Add a JFIF APP0 segment.
    pub fn jfif(mut self) -> Self {
        let mut payload = b"JFIF\0".to_vec();
        payload.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        self.segments.push(segment(0xE0, &payload));
        self
    }

    pub fn exif(mut self, tiff: &[u8]) -> Self {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(tiff);
        self.segments.push(segment(0xE1, &payload));
        self
    }

    pub fn xmp(mut self, xml: &str) -> Self {
        let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
        payload.extend_from_slice(xml.as_bytes());
        self.segments.push(segment(0xE1, &payload));
        self
    }

    /// Add an APP13 Photoshop segment holding IPTC record 2 datasets.
    pub fn iptc(mut self, datasets: &[(u8, &[u8])]) -> Self {
        let mut iim = Vec::new();
        for (tag, value) in datasets {
            iim.extend_from_slice(&[0x1C, 0x02, *tag]);
            iim.extend_from_slice(&(value.len() as u16).to_be_bytes());
            iim.extend_from_slice(value);
        }

        let mut payload = b"Photoshop 3.0\0".to_vec();
        payload.extend_from_slice(b"8BIM");
        payload.extend_from_slice(&[0x04, 0x04, 0x00, 0x00]);
        payload.extend_from_slice(&(iim.len() as u32).to_be_bytes());
        payload.extend_from_slice(&iim);
        self.segments.push(segment(0xED, &payload));
        self
    }

    /// Add an APP2 ICC segment with the given profile bytes.
    pub fn icc(mut self, profile: &[u8]) -> Self {
        let mut payload = b"ICC_PROFILE\0".to_vec();
        payload.extend_from_slice(&[1, 1]);
        payload.extend_from_slice(profile);
        self.segments.push(segment(0xE2, &payload));
        self
    }

    /// Append `bytes` of filler after the metadata segments.
    pub fn padding(mut self, bytes: usize) -> Self {
        self.padding = bytes;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        for seg in self.segments {
            data.extend(seg);
        }
        // Start of scan with a minimal header, then filler "image data"
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        data.extend(std::iter::repeat(0x55).take(self.padding));
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut seg = vec![0xFF, marker];
    seg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    seg.extend_from_slice(payload);
    seg
}

/// A 128-byte sRGB display profile header.
pub fn create_icc_header() -> Vec<u8> {
    let mut header = vec![0u8; 128];
    header[0..4].copy_from_slice(&3144u32.to_be_bytes());
    header[4..8].copy_from_slice(b"Lino");
    header[8] = 2;
    header[9] = 0x10;
    header[12..16].copy_from_slice(b"mntr");
    header[16..20].copy_from_slice(b"RGB ");
    header[20..24].copy_from_slice(b"XYZ ");
    for (i, part) in [1998u16, 2, 9, 6, 49, 0].iter().enumerate() {
        header[24 + i * 2..26 + i * 2].copy_from_slice(&part.to_be_bytes());
    }
    header[36..40].copy_from_slice(b"acsp");
    header[40..44].copy_from_slice(b"MSFT");
    header[48..52].copy_from_slice(b"IEC ");
    header[52..56].copy_from_slice(b"sRGB");
    header[80..84].copy_from_slice(b"HP  ");
    header
}

// =============================================================================
// Helpers
// =============================================================================

pub fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-3
}
