//! Postal code (CEP) normalization
//!
//! Brazilian postal codes arrive in many shapes: `64082-550`, `64.082-550`,
//! ` 64082550 `. Stored codes are always the normalized form, which strips
//! whitespace, periods and hyphens and keeps every other character as is.

/// Maximum length of a stored postal code
pub const MAX_LEN: usize = 8;

/// Removes whitespace, `.` and `-` from a postal code string
///
/// # Example
///
/// ```rust
/// use domain_address::postal_code::normalize;
///
/// assert_eq!(normalize("123.456-78"), "12345678");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .collect()
}

/// Returns true when the code consists of ASCII digits only
pub fn is_digits(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}
