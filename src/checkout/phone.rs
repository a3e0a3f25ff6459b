const MAX_DIGITS: usize = 11;

pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Brazilian landline (10 digits) or mobile (11 digits) number.
pub fn is_valid(raw: &str) -> bool {
    matches!(digits(raw).len(), 10 | 11)
}

/// Re-renders whatever has been typed so far as `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD`.
pub fn format(raw: &str) -> String {
    let mut digits = digits(raw);
    digits.truncate(MAX_DIGITS);

    match digits.len() {
        0 => String::new(),
        1..=2 => format!("({digits}"),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}
