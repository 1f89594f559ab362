//! Converting raw text into a field's declared kind.
//!
//! Rules:
//! - booleans: empty text is `false`, otherwise one of the tokens accepted by
//!   [`bool_token`]
//! - integers and floats: empty text counts as `0`, then a base-10 parse at
//!   the field's width
//! - strings: taken verbatim
//! - sequences: each element is coerced and appended. Only string and integer
//!   elements are supported. Other element kinds drop their values silently.

use core::num::{ParseFloatError, ParseIntError};
use core::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::macros::trace;
use crate::schema::{SeqSlot, Slot};

/// Recognize a textual boolean.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn bool_token(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn number_text(text: &str) -> &str {
    if text.is_empty() { "0" } else { text }
}

fn parse_bool(text: &str, field: &str) -> Result<bool> {
    if text.is_empty() {
        return Ok(false);
    }
    bool_token(text).ok_or_else(|| ConfigError::InvalidBool {
        field: field.to_string(),
        value: text.to_string(),
    })
}

fn parse_int<T>(text: &str, field: &str) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    number_text(text)
        .parse()
        .map_err(|cause| ConfigError::InvalidInteger {
            field: field.to_string(),
            value: text.to_string(),
            cause,
        })
}

fn parse_float<T>(text: &str, field: &str) -> Result<T>
where
    T: FromStr<Err = ParseFloatError>,
{
    number_text(text)
        .parse()
        .map_err(|cause| ConfigError::InvalidFloat {
            field: field.to_string(),
            value: text.to_string(),
            cause,
        })
}

/// Write `text` into a scalar slot.
pub(crate) fn assign(slot: &mut Slot<'_>, text: &str, field: &str) -> Result<()> {
    match slot {
        Slot::Bool(v) => **v = parse_bool(text, field)?,
        Slot::I8(v) => **v = parse_int(text, field)?,
        Slot::I16(v) => **v = parse_int(text, field)?,
        Slot::I32(v) => **v = parse_int(text, field)?,
        Slot::I64(v) => **v = parse_int(text, field)?,
        Slot::Isize(v) => **v = parse_int(text, field)?,
        Slot::U8(v) => **v = parse_int(text, field)?,
        Slot::U16(v) => **v = parse_int(text, field)?,
        Slot::U32(v) => **v = parse_int(text, field)?,
        Slot::U64(v) => **v = parse_int(text, field)?,
        Slot::Usize(v) => **v = parse_int(text, field)?,
        Slot::F32(v) => **v = parse_float(text, field)?,
        Slot::F64(v) => **v = parse_float(text, field)?,
        Slot::Str(v) => text.clone_into(&mut **v),
    }
    Ok(())
}

fn push_ints<T>(seq: &mut Vec<T>, values: &[String], field: &str) -> Result<()>
where
    T: FromStr<Err = ParseIntError>,
{
    for value in values {
        trace!(field, value = %value, "coerce: appending integer");
        seq.push(parse_int(value, field)?);
    }
    Ok(())
}

/// Append `values` to a sequence slot, in order.
pub(crate) fn append(seq: &mut SeqSlot<'_>, values: &[String], field: &str) -> Result<()> {
    match seq {
        SeqSlot::Str(v) => {
            trace!(field, count = values.len(), "coerce: appending strings");
            v.extend(values.iter().cloned());
            Ok(())
        }
        SeqSlot::I8(v) => push_ints(&mut **v, values, field),
        SeqSlot::I16(v) => push_ints(&mut **v, values, field),
        SeqSlot::I32(v) => push_ints(&mut **v, values, field),
        SeqSlot::I64(v) => push_ints(&mut **v, values, field),
        SeqSlot::Isize(v) => push_ints(&mut **v, values, field),
        SeqSlot::U8(v) => push_ints(&mut **v, values, field),
        SeqSlot::U16(v) => push_ints(&mut **v, values, field),
        SeqSlot::U32(v) => push_ints(&mut **v, values, field),
        SeqSlot::U64(v) => push_ints(&mut **v, values, field),
        SeqSlot::Usize(v) => push_ints(&mut **v, values, field),
        SeqSlot::Skipped(element) => {
            trace!(field, element = element.name(), "coerce: element kind not supported, skipping");
            Ok(())
        }
    }
}
