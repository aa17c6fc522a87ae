//! String normalization for comparison keys and display values
//!
//! All functions are pure and idempotent.

/// ASCII punctuation removed by [`strip_punctuation`]
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Remove ASCII punctuation, leaving everything else (including spaces)
pub fn strip_punctuation(input: &str) -> String {
    input.chars().filter(|c| !PUNCTUATION.contains(*c)).collect()
}

/// Comparison key: no whitespace, no punctuation, upper case
pub fn normalize(input: &str) -> String {
    let collapsed: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    strip_punctuation(&collapsed.to_uppercase())
}

/// Readable title: punctuation stripped, then title-cased
///
/// A letter starts a word when the preceding character is not alphabetic.
/// Case mappings that expand to several characters are left unmapped so the
/// result stays stable when normalized again.
pub fn normalize_title(input: &str) -> String {
    let stripped = strip_punctuation(input);
    let mut out = String::with_capacity(stripped.len());
    let mut previous_alphabetic = false;

    for c in stripped.chars() {
        let mapped = if previous_alphabetic {
            single_char(c.to_lowercase()).unwrap_or(c)
        } else {
            single_char(c.to_uppercase()).unwrap_or(c)
        };
        out.push(mapped);
        previous_alphabetic = c.is_alphabetic();
    }
    out
}

fn single_char(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    match mapping.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// OCLC number from an 001 value: digits only, leading zeros dropped
///
/// Returns `None` when no digits remain.
pub fn normalize_oclc_number(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
