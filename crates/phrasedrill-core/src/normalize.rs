//! Text normalization for answer comparison.
//!
//! All verification happens on the canonical form produced here, so typos in
//! casing, accents, and punctuation never count against the learner.

use unicode_normalization::UnicodeNormalization;

/// Produce the canonical comparison form of a string.
///
/// Decomposes to NFD and drops combining marks, lowercases, replaces every
/// run of characters outside `[a-z0-9']` with a single space, and collapses
/// surrounding and repeated whitespace. Total and idempotent:
/// `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();

    let mapped: String = stripped
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}
