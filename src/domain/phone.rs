//! Shape check for subscriber phone numbers.

/// Required length of a phone number, in characters.
pub const PHONE_NUMBER_LEN: usize = 10;

const DISALLOWED_CHARS: [char; 3] = ['+', '@', '-'];

/// Returns `true` when `phone` is exactly ten decimal digits.
///
/// Three checks must all pass: the string parses as an unsigned integer, it
/// contains none of `+`, `@` or `-`, and it is exactly ten characters long.
/// The character scan overlaps with the parse; both are kept.
pub fn is_valid_phone(phone: &str) -> bool {
    // ---
    if phone.parse::<u64>().is_err() {
        return false;
    }

    if phone.chars().any(|c| DISALLOWED_CHARS.contains(&c)) {
        return false;
    }

    phone.len() == PHONE_NUMBER_LEN
}
