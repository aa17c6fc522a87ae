//! Title similarity scoring

use super::normalize::normalize;

/// Normalized Levenshtein similarity of two strings after [`normalize`]
///
/// Returns a value in `[0.0, 1.0]`; 1.0 means identical once normalized.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize(a), &normalize(b))
}
