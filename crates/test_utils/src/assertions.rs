//! Custom Test Assertions
//!
//! Helpers for the JSON error bodies returned by the API, with failure
//! messages that show the whole body.

use serde_json::Value;

/// Asserts that `body` carries `message` under `field`
///
/// Field errors have the shape `{"field": ["message", ...]}`.
///
/// # Panics
///
/// Panics if the field is missing or none of its messages match
pub fn assert_field_error(body: &Value, field: &str, message: &str) {
    let messages = body
        .get(field)
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("Expected errors for '{}', got {}", field, body));

    assert!(
        messages.iter().any(|m| m.as_str() == Some(message)),
        "Expected '{}' under '{}', got {}",
        message,
        field,
        body
    );
}

/// Asserts that `body` has an error entry for `field`, whatever the message
pub fn assert_has_field_error(body: &Value, field: &str) {
    assert!(
        body.get(field).and_then(Value::as_array).is_some_and(|m| !m.is_empty()),
        "Expected errors for '{}', got {}",
        field,
        body
    );
}

/// Asserts that `body` is `{"message": message}`
pub fn assert_message(body: &Value, message: &str) {
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(message),
        "Unexpected body {}",
        body
    );
}
