//! Address canonicalization for source-vs-listing comparison.
//!
//! The rule is literal: case, punctuation, ordinal suffixes and
//! whitespace are folded, but street-type words are not. `"ave"` and
//! `"avenue"` stay distinct, as do `"1st"` and `"first"`.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an ordinal suffix directly after a digit: `1st`, `22nd`, `3rd`, `45th`.
static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("ordinal suffix regex is valid")
});

/// Normalizes an address for equality comparison.
///
/// 1. Lower-case ASCII letters.
/// 2. Replace every character that is not an ASCII letter, digit, or
///    whitespace with a space (`"1-2 Ave"` becomes `"1 2 ave"`).
/// 3. Delete ordinal suffixes that follow a digit (`45th` becomes `45`).
/// 4. Collapse whitespace runs and trim.
///
/// Idempotent: `normalize_address(&normalize_address(s)) == normalize_address(s)`.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let folded: String = address
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let without_ordinals = ORDINAL_SUFFIX.replace_all(&folded, "$1");

    without_ordinals
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `true` when both addresses normalize to the same string.
#[must_use]
pub fn same_address(source: &str, scraped: &str) -> bool {
    normalize_address(source) == normalize_address(scraped)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
