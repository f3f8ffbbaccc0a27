//! Phone number normalization and formatting
//!
//! Phone identity is always the digits-only form. The display string a user
//! typed ("8888-1212", "+506 8888 1212") never takes part in comparisons.

/// Country calling code prepended to local numbers in international form
pub const COUNTRY_CODE: &str = "506";

/// Local subscriber numbers are eight digits long
pub const LOCAL_NUMBER_LEN: usize = 8;

/// Strip every non-digit character
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a normalized phone for display
///
/// - 8 digits: `XXXX-XXXX`
/// - 11 digits starting with the country code: `+506 XXXX-XXXX`
/// - anything else is returned unchanged
pub fn format_phone(digits: &str) -> String {
    let local = |d: &str| format!("{}-{}", &d[..4], &d[4..]);

    if digits.len() == LOCAL_NUMBER_LEN {
        local(digits)
    } else if digits.len() == COUNTRY_CODE.len() + LOCAL_NUMBER_LEN
        && digits.starts_with(COUNTRY_CODE)
    {
        format!("+{} {}", COUNTRY_CODE, local(&digits[COUNTRY_CODE.len()..]))
    } else {
        digits.to_string()
    }
}

/// Whether a normalized phone can send or receive money
pub fn is_dialable(digits: &str) -> bool {
    digits.len() >= LOCAL_NUMBER_LEN
}

/// Compare two display strings by their normalized digits
pub fn same_phone(a: &str, b: &str) -> bool {
    normalize_phone(a) == normalize_phone(b)
}
