//! Field-level validation errors
//!
//! Every validation failure in the system is reported as a map from field
//! name to the list of messages for that field, serialized as
//! `{"email": ["pessoa with this email already exists."]}`. Errors of a
//! nested object are kept under its field as a map of the same shape:
//! `{"endereco": {"cidade": ["This field is required."]}}`. Errors that do
//! not belong to a single field go under [`FieldErrors::NON_FIELD`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Message used when a required field is absent from a payload
pub const REQUIRED: &str = "This field is required.";

/// Message used when a string field is present but empty
pub const BLANK: &str = "This field may not be blank.";

/// Message used when a field is explicitly `null`
pub const NOT_NULL: &str = "This field may not be null.";

pub const NOT_A_STRING: &str = "Not a valid string.";

pub const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// Errors recorded against one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldEntry {
    Messages(Vec<String>),
    Nested(FieldErrors),
}

impl FieldEntry {
    fn absorb(&mut self, incoming: FieldEntry) {
        match incoming {
            FieldEntry::Messages(more) => match self {
                FieldEntry::Messages(existing) => existing.extend(more),
                FieldEntry::Nested(existing) => {
                    for message in more {
                        existing.add(FieldErrors::NON_FIELD, message);
                    }
                }
            },
            FieldEntry::Nested(mut more) => match self {
                FieldEntry::Nested(existing) => existing.merge(more),
                FieldEntry::Messages(existing) => {
                    for message in existing.drain(..) {
                        more.add(FieldErrors::NON_FIELD, message);
                    }
                    *self = FieldEntry::Nested(more);
                }
            },
        }
    }
}

/// Collected validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldEntry>);

impl FieldErrors {
    /// Key for errors that are not tied to one field
    pub const NON_FIELD: &'static str = "non_field_errors";

    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends a message to the given field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.insert(field.into(), FieldEntry::Messages(vec![message.into()]));
    }

    /// Records the errors of a nested object under `parent`
    pub fn nest(&mut self, parent: impl Into<String>, errors: FieldErrors) {
        if !errors.is_empty() {
            self.insert(parent.into(), FieldEntry::Nested(errors));
        }
    }

    /// Moves every message of `other` into this set
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, entry) in other.0 {
            self.insert(field, entry);
        }
    }

    fn insert(&mut self, field: String, entry: FieldEntry) {
        match self.0.entry(field) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages of a plain field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        match self.0.get(field)? {
            FieldEntry::Messages(messages) => Some(messages),
            FieldEntry::Nested(_) => None,
        }
    }

    /// Errors of a nested object
    pub fn get_nested(&self, field: &str) -> Option<&FieldErrors> {
        match self.0.get(field)? {
            FieldEntry::Nested(errors) => Some(errors),
            FieldEntry::Messages(_) => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, entry)| match entry {
                FieldEntry::Messages(messages) => format!("{}: {}", field, messages.join(" ")),
                FieldEntry::Nested(nested) => format!("{}: ({})", field, nested),
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", error.code));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}
