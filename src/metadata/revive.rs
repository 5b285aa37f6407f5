//! Post-processing of decoded tag values.
//!
//! Turns raw TIFF values into the forms a reader expects: parsed dates,
//! enum names, version strings and decimal GPS coordinates. Input that does
//! not have the expected shape is left alone, except for dates which become
//! [`Value::Null`] when unparseable.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::format::tiff::{TagKey, TagMap, Value};

use super::enums;

/// TIFF date layout, e.g. `2019:06:01 12:30:00`
const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

const DATE_TAGS: &[&str] = &["ModifyDate", "DateTimeOriginal", "CreateDate"];

const VERSION_TAGS: &[&str] = &["ExifVersion", "FlashpixVersion", "InteropVersion"];

// =============================================================================
// Single values
// =============================================================================

/// Parse a TIFF date string. Anything else yields `Null`.
pub fn revive_date(value: &Value) -> Value {
    value
        .as_str()
        .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT).ok())
        .map(Value::DateTime)
        .unwrap_or(Value::Null)
}

/// Replacement for `value` of tag `name`, or `None` to keep it.
fn revive_value(name: &str, value: &Value) -> Option<Value> {
    if DATE_TAGS.contains(&name) {
        return Some(revive_date(value));
    }

    if VERSION_TAGS.contains(&name) {
        return match value {
            Value::Bytes(bytes) => Some(Value::Text(bytes.iter().map(|b| *b as char).collect())),
            _ => None,
        };
    }

    match name {
        "GPSVersionID" => {
            let parts = integer_parts(value)?;
            Some(Value::Text(parts.join(".")))
        }
        "GPSTimeStamp" => {
            let parts: Vec<String> = value
                .elements()
                .iter()
                .map(|v| v.as_f64().map(|f| f.to_string()))
                .collect::<Option<_>>()?;
            Some(Value::Text(parts.join(":")))
        }
        "ComponentsConfiguration" => {
            let Value::Bytes(bytes) = value else {
                return None;
            };
            let names: Vec<&str> = bytes
                .iter()
                .map(|b| enums::component(*b))
                .collect::<Option<_>>()?;
            Some(Value::Text(names.join(", ")))
        }
        _ => describe(name, value),
    }
}

/// Enum lookup for scalar codes, including single UNDEFINED bytes.
fn describe(name: &str, value: &Value) -> Option<Value> {
    let description = match value {
        Value::Unsigned(code) => enums::describe(name, *code),
        Value::Bytes(bytes) if bytes.len() == 1 => enums::describe(name, bytes[0] as u32),
        Value::Text(code) => enums::describe_text(name, code),
        _ => None,
    };
    description.map(|d| Value::Text(d.to_string()))
}

fn integer_parts(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Bytes(bytes) => Some(bytes.iter().map(|b| b.to_string()).collect()),
        other => other
            .elements()
            .iter()
            .map(|v| v.as_u32().map(|n| n.to_string()))
            .collect(),
    }
}

// =============================================================================
// Blocks
// =============================================================================

/// Revive every named tag of an IFD0, Exif, Interop or IFD1 block.
pub fn revive_tags(tags: &mut TagMap) {
    for (key, value) in tags.iter_mut() {
        let TagKey::Name(name) = key else {
            continue;
        };
        if let Some(revived) = revive_value(name, value) {
            *value = revived;
        }
    }
}

/// Revive a GPS block and add the derived `GPSDateTime`, `latitude` and
/// `longitude` entries.
pub fn revive_gps(tags: &mut TagMap) {
    let timestamp = gps_timestamp(tags);
    let latitude = decimal_coordinate(tags, "GPSLatitude", "GPSLatitudeRef");
    let longitude = decimal_coordinate(tags, "GPSLongitude", "GPSLongitudeRef");

    revive_tags(tags);

    if let Some(timestamp) = timestamp {
        tags.insert(TagKey::Name("GPSDateTime"), timestamp);
    }
    if let Some(latitude) = latitude {
        tags.insert(TagKey::Name("latitude"), Value::Float(latitude));
    }
    if let Some(longitude) = longitude {
        tags.insert(TagKey::Name("longitude"), Value::Float(longitude));
    }
}

/// Combine `GPSDateStamp` (`YYYY:MM:DD`) with the raw `GPSTimeStamp`
/// triple. An unparseable date yields `Null`.
fn gps_timestamp(tags: &TagMap) -> Option<Value> {
    let date = tags.get("GPSDateStamp")?.as_str()?;
    let time = tags.get("GPSTimeStamp")?.elements();
    let [hours, minutes, seconds] = time else {
        return None;
    };

    let date = NaiveDate::parse_from_str(date.trim(), "%Y:%m:%d").ok();
    let time = match (hours.as_f64(), minutes.as_f64(), seconds.as_f64()) {
        (Some(h), Some(m), Some(s)) if s >= 0.0 => NaiveTime::from_hms_milli_opt(
            h as u32,
            m as u32,
            s.trunc() as u32,
            (s.fract() * 1000.0).round() as u32,
        ),
        _ => None,
    };

    let value = match (date, time) {
        (Some(date), Some(time)) => Value::DateTime(date.and_time(time)),
        _ => Value::Null,
    };
    Some(value)
}

/// Convert a degrees/minutes/seconds triple to decimal degrees, negated
/// for the southern and western hemispheres.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: &str) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    match reference.trim() {
        "S" | "W" => -decimal,
        _ => decimal,
    }
}

fn decimal_coordinate(tags: &TagMap, tag: &str, reference_tag: &str) -> Option<f64> {
    let parts = tags.get(tag)?.elements();
    let [degrees, minutes, seconds] = parts else {
        return None;
    };
    let reference = tags
        .get(reference_tag)
        .and_then(Value::as_str)
        .unwrap_or("");

    Some(dms_to_decimal(
        degrees.as_f64()?,
        minutes.as_f64()?,
        seconds.as_f64()?,
        reference,
    ))
}

// =============================================================================
// Tests
// =============================================================================
