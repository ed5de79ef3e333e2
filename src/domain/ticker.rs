//! Ticker input handling for custom portfolios.
//!
//! Alphabetic input is an equity ticker and is uppercased, numeric input is a
//! Hong Kong listing code padded to four digits with the `.HK` suffix, and
//! anything else passes through untouched.

use std::collections::HashSet;

pub const HK_SUFFIX: &str = ".HK";

pub fn normalize_ticker(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.chars().all(char::is_alphabetic) {
        trimmed.to_uppercase()
    } else if trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>4}{}", trimmed, HK_SUFFIX)
    } else {
        trimmed.to_string()
    };
    Some(normalized)
}

/// Normalizes each entry, skipping blanks and dropping repeats while keeping
/// first-seen order.
pub fn normalize_all<'a, I>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .filter_map(normalize_ticker)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Splits a comma-separated ticker string and normalizes every entry.
pub fn parse_ticker_inputs(input: &str) -> Vec<String> {
    normalize_all(input.split(','))
}

/// Newline-delimited ticker list: lines are trimmed and blank lines skipped.
pub fn parse_ticker_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Drops a trailing venue suffix such as `.HK` or `.SS`. Single-letter share
/// classes (`BRK.B`) are kept.
pub fn strip_venue_suffix(symbol: &str) -> &str {
    match symbol.rsplit_once('.') {
        Some((base, venue))
            if !base.is_empty()
                && (2..=3).contains(&venue.len())
                && venue.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            base
        }
        _ => symbol,
    }
}
