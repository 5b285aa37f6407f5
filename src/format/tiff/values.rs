//! TIFF tag value decoding.
//!
//! A value is either stored inline in its IFD entry (when it fits in 4
//! bytes) or at an offset relative to the TIFF start. The directory decoder
//! resolves which; this module turns the resolved bytes into a [`Value`]
//! according to the entry's field type.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::TiffError;
use crate::format::buffer::ByteView;

use super::parser::ByteOrder;
use super::tags::FieldType;

// =============================================================================
// Value
// =============================================================================

/// A decoded tag value.
///
/// Raw decoding produces the numeric, text, byte and array variants.
/// `DateTime` and `Null` only appear after value revival.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// BYTE, SHORT or LONG
    Unsigned(u32),

    /// SBYTE, SSHORT or SLONG
    Signed(i32),

    /// RATIONAL or SRATIONAL as the quotient numerator / denominator
    Float(f64),

    /// ASCII text, or a string produced by revival
    Text(String),

    /// UNDEFINED bytes, verbatim
    Bytes(Vec<u8>),

    /// Parsed date
    DateTime(NaiveDateTime),

    /// Multiple values of one type, in file order
    Array(Vec<Value>),

    /// A value that could not be revived
    Null,
}

impl Value {
    /// The value as an unsigned integer, if it is a non-negative integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Unsigned(v) => Some(*v),
            Value::Signed(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value as a float, for any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Unsigned(v) => Some(*v as f64),
            Value::Signed(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as text, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an array; a scalar yields itself as a single element.
    pub fn elements(&self) -> &[Value] {
        match self {
            Value::Array(values) => values,
            other => std::slice::from_ref(other),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode `count` values of `field_type` located at absolute `offset`.
///
/// ASCII drops exactly one trailing NUL. UNDEFINED is returned verbatim.
/// Numeric types yield a scalar for `count == 1` and an array otherwise.
pub fn decode_value(
    view: &ByteView<'_>,
    offset: usize,
    field_type: FieldType,
    count: usize,
    byte_order: ByteOrder,
) -> Result<Value, TiffError> {
    let width = field_type.size_in_bytes();
    let size = width.checked_mul(count).ok_or(TiffError::ValueOffsetOutOfRange {
        offset,
        size: usize::MAX,
        available: view.len(),
    })?;

    // Check the whole region once so arrays fail before any element is read
    let bytes = view.slice(offset, size)?;

    match field_type {
        FieldType::Ascii => Ok(Value::Text(decode_ascii(bytes))),
        FieldType::Undefined => Ok(Value::Bytes(bytes.to_vec())),
        _ if count == 1 => decode_scalar(view, offset, field_type, byte_order),
        _ => {
            let mut values = Vec::with_capacity(count);
            for i in 0..count {
                values.push(decode_scalar(view, offset + i * width, field_type, byte_order)?);
            }
            Ok(Value::Array(values))
        }
    }
}

fn decode_ascii(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(&[0u8]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_scalar(
    view: &ByteView<'_>,
    offset: usize,
    field_type: FieldType,
    byte_order: ByteOrder,
) -> Result<Value, TiffError> {
    let value = match field_type {
        FieldType::Byte | FieldType::Ascii | FieldType::Undefined => {
            Value::Unsigned(view.u8(offset)? as u32)
        }
        FieldType::SByte => Value::Signed(view.i8(offset)? as i32),
        FieldType::Short => Value::Unsigned(view.u16(offset, byte_order)? as u32),
        FieldType::SShort => Value::Signed(view.i16(offset, byte_order)? as i32),
        FieldType::Long => Value::Unsigned(view.u32(offset, byte_order)?),
        FieldType::SLong => Value::Signed(view.i32(offset, byte_order)?),
        FieldType::Rational => {
            let numerator = view.u32(offset, byte_order)? as f64;
            let denominator = view.u32(offset + 4, byte_order)? as f64;
            Value::Float(numerator / denominator)
        }
        FieldType::SRational => {
            let numerator = view.i32(offset, byte_order)? as f64;
            let denominator = view.i32(offset + 4, byte_order)? as f64;
            Value::Float(numerator / denominator)
        }
    };
    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
