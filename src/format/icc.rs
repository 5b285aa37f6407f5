//! ICC profile header decoding.
//!
//! Only the fixed 128-byte header of the first APP2 segment is decoded.
//! All header fields are big-endian.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::TiffError;
use crate::format::buffer::ByteView;
use crate::format::segment::SegmentRange;
use crate::format::tiff::{ByteOrder, TagKey, TagMap, Value};

/// Size of the profile header
pub const ICC_HEADER_SIZE: usize = 128;

fn profile_class(signature: &str) -> Option<&'static str> {
    let name = match signature {
        "scnr" => "Input Device profile",
        "mntr" => "Display Device profile",
        "prtr" => "Output Device profile",
        "link" => "DeviceLink profile",
        "spac" => "ColorSpace Conversion profile",
        "abst" => "Abstract profile",
        "nmcl" => "Named Color profile",
        _ => return None,
    };
    Some(name)
}

fn primary_platform(signature: &str) -> Option<&'static str> {
    let name = match signature {
        "APPL" => "Apple Computer Inc.",
        "MSFT" => "Microsoft Corporation",
        "SGI" => "Silicon Graphics Inc.",
        "SUNW" => "Sun Microsystems Inc.",
        _ => return None,
    };
    Some(name)
}

fn rendering_intent(code: u32) -> Value {
    match code {
        0 => Value::Text("Perceptual".into()),
        1 => Value::Text("Media-Relative Colorimetric".into()),
        2 => Value::Text("Saturation".into()),
        3 => Value::Text("ICC-Absolute Colorimetric".into()),
        other => Value::Unsigned(other),
    }
}

/// Decode the profile header at the start of `range`.
pub fn decode_icc_header(data: &[u8], range: SegmentRange) -> Result<TagMap, TiffError> {
    let view = ByteView::new(data);
    let base = range.start;
    view.slice(base, ICC_HEADER_SIZE)?;

    let be = ByteOrder::BigEndian;
    let signature = |offset: usize| -> Result<String, TiffError> {
        let text = view.string(base + offset, 4)?;
        Ok(text.trim_end_matches(['\0', ' ']).to_string())
    };
    let named = |text: String, lookup: fn(&str) -> Option<&'static str>| match lookup(&text) {
        Some(name) => Value::Text(name.to_string()),
        None => Value::Text(text),
    };

    let mut tags = TagMap::with_capacity(12);
    tags.insert(
        TagKey::Name("ProfileSize"),
        Value::Unsigned(view.u32(base, be)?),
    );
    tags.insert(TagKey::Name("ProfileCMMType"), Value::Text(signature(4)?));

    let major = view.u8(base + 8)?;
    let minor = view.u8(base + 9)?;
    tags.insert(
        TagKey::Name("ProfileVersion"),
        Value::Text(format!("{}.{}.{}", major, minor >> 4, minor & 0x0F)),
    );

    tags.insert(
        TagKey::Name("ProfileClass"),
        named(signature(12)?, profile_class),
    );
    tags.insert(TagKey::Name("ColorSpaceData"), Value::Text(signature(16)?));
    tags.insert(
        TagKey::Name("ProfileConnectionSpace"),
        Value::Text(signature(20)?),
    );

    let mut parts = [0u32; 6];
    for (i, part) in parts.iter_mut().enumerate() {
        *part = view.u16(base + 24 + i * 2, be)? as u32;
    }
    let date = NaiveDate::from_ymd_opt(parts[0] as i32, parts[1], parts[2])
        .and_then(|date| date.and_hms_opt(parts[3], parts[4], parts[5]))
        .map(Value::DateTime)
        .unwrap_or(Value::Null);
    tags.insert(TagKey::Name("ProfileDateTime"), date);

    tags.insert(
        TagKey::Name("PrimaryPlatform"),
        named(signature(40)?, primary_platform),
    );
    tags.insert(TagKey::Name("DeviceManufacturer"), Value::Text(signature(48)?));
    tags.insert(TagKey::Name("DeviceModel"), Value::Text(signature(52)?));
    tags.insert(
        TagKey::Name("RenderingIntent"),
        rendering_intent(view.u32(base + 64, be)?),
    );
    tags.insert(TagKey::Name("ProfileCreator"), Value::Text(signature(80)?));

    debug!(start = base, "Decoded ICC profile header");
    Ok(tags)
}
