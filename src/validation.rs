//! Input validation for identity names carried in memos

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator the memo format uses between fields.
pub const FIELD_SEPARATOR: &str = "//";

/// One or more characters that are not `@`, whitespace or control
/// characters, followed by a single trailing `@`.
static IDENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s\p{Cc}]+@$").expect("identity regex pattern is valid"));

/// Validates an identity name such as `alice@`
pub fn validate_identity_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Identity name cannot be empty".to_string());
    }

    if !IDENTITY_RE.is_match(name) {
        return Err(format!(
            "Invalid identity name '{}': expected a name ending in a single @, without spaces or control characters",
            name.escape_default()
        ));
    }

    // Would be ambiguous with the memo field separators
    if name.contains(FIELD_SEPARATOR) {
        return Err("Identity name cannot contain //".to_string());
    }

    Ok(())
}
