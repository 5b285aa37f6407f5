//! IPTC-IIM application record decoding.
//!
//! Each dataset is laid out as:
//!
//! ```text
//! 1C 02 <dataset:u8> <size:u16 BE> <payload>
//! ```
//!
//! Only record 2 (the application record) is decoded. Repeatable datasets
//! such as Keywords accumulate into an array in encounter order.

use tracing::debug;

use crate::error::TiffError;
use crate::format::buffer::ByteView;
use crate::format::segment::SegmentRange;
use crate::format::tiff::{ByteOrder, TagKey, TagMap, Value};

/// Dataset marker followed by the application record number
const RECORD_2_MARKER: [u8; 2] = [0x1C, 0x02];

/// Marker(2) + dataset(1) + size(2)
const DATASET_HEADER_SIZE: usize = 5;

/// ApplicationRecordVersion, a binary 16-bit number
const RECORD_VERSION: u8 = 0;

/// Human-readable name of a record 2 dataset.
pub fn dataset_name(dataset: u8) -> Option<&'static str> {
    let name = match dataset {
        0 => "ApplicationRecordVersion",
        5 => "ObjectName",
        7 => "EditStatus",
        10 => "Urgency",
        12 => "SubjectReference",
        15 => "Category",
        20 => "SupplementalCategories",
        22 => "FixtureIdentifier",
        25 => "Keywords",
        26 => "ContentLocationCode",
        27 => "ContentLocationName",
        30 => "ReleaseDate",
        35 => "ReleaseTime",
        37 => "ExpirationDate",
        38 => "ExpirationTime",
        40 => "SpecialInstructions",
        42 => "ActionAdvised",
        45 => "ReferenceService",
        47 => "ReferenceDate",
        50 => "ReferenceNumber",
        55 => "DateCreated",
        60 => "TimeCreated",
        62 => "DigitalCreationDate",
        63 => "DigitalCreationTime",
        65 => "OriginatingProgram",
        70 => "ProgramVersion",
        75 => "ObjectCycle",
        80 => "Byline",
        85 => "BylineTitle",
        90 => "City",
        92 => "Sublocation",
        95 => "State",
        100 => "CountryCode",
        101 => "Country",
        103 => "OriginalTransmissionReference",
        105 => "Headline",
        110 => "Credit",
        115 => "Source",
        116 => "CopyrightNotice",
        118 => "Contact",
        120 => "Caption",
        122 => "Writer",
        130 => "ImageType",
        131 => "ImageOrientation",
        135 => "LanguageIdentifier",
        _ => return None,
    };
    Some(name)
}

/// Decode the record 2 datasets found in `range`.
///
/// The scan stops at the end of the range (or of the buffer, whichever
/// comes first). A dataset whose payload runs past the buffer fails the
/// block.
pub fn decode_iptc(data: &[u8], range: SegmentRange) -> Result<TagMap, TiffError> {
    let view = ByteView::new(data);
    let end = range.end().unwrap_or(data.len()).min(data.len());

    let mut tags = TagMap::new();
    let mut pos = range.start;

    while pos + DATASET_HEADER_SIZE <= end {
        if !view.matches_at(pos, &RECORD_2_MARKER) {
            pos += 1;
            continue;
        }

        let dataset = view.u8(pos + 2)?;
        let size = view.u16(pos + 3, ByteOrder::BigEndian)? as usize;
        let payload = view.slice(pos + DATASET_HEADER_SIZE, size)?;

        let value = if dataset == RECORD_VERSION && size == 2 {
            Value::Unsigned(u16::from_be_bytes([payload[0], payload[1]]) as u32)
        } else {
            Value::Text(String::from_utf8_lossy(payload).into_owned())
        };

        let key = dataset_name(dataset)
            .map(TagKey::Name)
            .unwrap_or(TagKey::Id(dataset as u16));
        accumulate(&mut tags, key, value);

        pos += DATASET_HEADER_SIZE + size;
    }

    debug!(count = tags.len(), "Decoded IPTC record");
    Ok(tags)
}

/// Store `value` under `key`, turning repeated keys into an array.
fn accumulate(tags: &mut TagMap, key: TagKey, value: Value) {
    match tags.get_key_mut(&key) {
        None => {
            tags.insert(key, value);
        }
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Null);
            *existing = Value::Array(vec![first, value]);
        }
    }
}
