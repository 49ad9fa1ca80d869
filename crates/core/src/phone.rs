//! Indian mobile number normalization.

use crate::error::{DomainError, DomainResult};

/// Normalize an Indian mobile number to its 10 digits.
///
/// Accepts spaces, dashes and a leading `+91`, `91` or `0`. The remaining
/// number must be 10 digits starting with 6-9.
pub fn normalize_mobile(raw: &str) -> DomainResult<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('0') => &digits[1..],
        12 if digits.starts_with("91") => &digits[2..],
        _ => return Err(DomainError::validation(format!("invalid mobile number '{raw}'"))),
    };

    if !matches!(local.as_bytes()[0], b'6'..=b'9') {
        return Err(DomainError::validation(format!("invalid mobile number '{raw}'")));
    }

    Ok(local.to_string())
}
