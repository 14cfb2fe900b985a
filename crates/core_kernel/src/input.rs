//! Loosely typed request fields
//!
//! Request payloads are read into [`FieldValue`]s instead of concrete types,
//! so a value of the wrong JSON type is reported against its field rather
//! than failing the whole body. Coercion follows the public API contract:
//! text fields accept numbers, integer fields accept numeric strings and
//! whole floats (`"30"`, `30.0`).

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::validation::{FieldErrors, BLANK, NOT_AN_INTEGER, NOT_A_STRING, NOT_NULL, REQUIRED};

/// A single request field before coercion
///
/// Struct fields of this type should carry `#[serde(default)]` so that a
/// missing key becomes [`FieldValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Absent,
    Null,
    Text(String),
    /// A JSON number in its textual form
    Number(String),
    /// A boolean, array or object
    Other,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Coerces to a string; `Ok(None)` when the key was absent
    pub fn into_text(self) -> Result<Option<String>, &'static str> {
        match self {
            FieldValue::Absent => Ok(None),
            FieldValue::Null => Err(NOT_NULL),
            FieldValue::Text(s) | FieldValue::Number(s) => Ok(Some(s)),
            FieldValue::Other => Err(NOT_A_STRING),
        }
    }

    /// Coerces to an `i32`; `Ok(None)` when the key was absent
    pub fn into_integer(self) -> Result<Option<i32>, &'static str> {
        match self {
            FieldValue::Absent => Ok(None),
            FieldValue::Null => Err(NOT_NULL),
            FieldValue::Text(s) | FieldValue::Number(s) => parse_integer(&s).map(Some).ok_or(NOT_AN_INTEGER),
            FieldValue::Other => Err(NOT_AN_INTEGER),
        }
    }
}

/// Accepts an optional zero fraction: `30`, `30.`, `30.00`
fn parse_integer(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let whole = match raw.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => raw,
    };
    whole.parse().ok()
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.to_string())
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FieldValue, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Other)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldValue, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FieldValue::Other)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldValue, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(FieldValue::Other)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

/// Reads a required, non-blank text field, recording any error
pub fn required_text(errors: &mut FieldErrors, field: &str, value: FieldValue) -> Option<String> {
    if value.is_absent() {
        errors.add(field, REQUIRED);
        return None;
    }
    optional_text(errors, field, value)
}

/// Reads an optional text field; surrounding whitespace is trimmed
pub fn optional_text(errors: &mut FieldErrors, field: &str, value: FieldValue) -> Option<String> {
    let value = match value.into_text() {
        Ok(value) => value?.trim().to_string(),
        Err(message) => {
            errors.add(field, message);
            return None;
        }
    };
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    Some(value)
}

pub fn required_integer(errors: &mut FieldErrors, field: &str, value: FieldValue) -> Option<i32> {
    if value.is_absent() {
        errors.add(field, REQUIRED);
        return None;
    }
    optional_integer(errors, field, value)
}

pub fn optional_integer(errors: &mut FieldErrors, field: &str, value: FieldValue) -> Option<i32> {
    value.into_integer().unwrap_or_else(|message| {
        errors.add(field, message);
        None
    })
}
