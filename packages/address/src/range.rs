//! House-number extraction and address ranges.
//!
//! Parcel addresses look like `"10-12 Tremont St 02116"`. Hyphens are
//! treated as separators, the trailing zip code is dropped, and every
//! remaining token made mostly of digits counts as a house number. This
//! keeps suffixed numbers such as `"10A"` and drops street-name tokens such
//! as `"1st"`.

use std::collections::BTreeSet;

use crate::natural::natural_cmp;

/// Whether strictly more than half of the token's characters are ASCII
/// digits.
///
/// Slash-separated digit runs (`"7/4/1976"`) pass this test and are kept
/// as-is.
#[must_use]
pub fn is_mostly_numeric(token: &str) -> bool {
    let (digits, total) = token.chars().fold((0usize, 0usize), |(digits, total), c| {
        (digits + usize::from(c.is_ascii_digit()), total + 1)
    });
    digits * 2 > total
}

/// Extracts the house-number tokens of one address, in order.
#[must_use]
pub fn house_numbers(full_address: &str) -> Vec<String> {
    let spaced = full_address.replace('-', " ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();

    // Last token is the zip code.
    let Some((_, tokens)) = tokens.split_last() else {
        return Vec::new();
    };

    tokens
        .iter()
        .filter(|token| is_mostly_numeric(token))
        .map(|token| (*token).to_string())
        .collect()
}

/// Computes the house-number range covered by `addresses`.
///
/// Returns an empty string when no house numbers are found, the single
/// number when there is exactly one distinct number, and `"{first}-{last}"`
/// of the naturally sorted distinct numbers otherwise.
#[must_use]
pub fn extract_range<I, S>(addresses: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let numbers: BTreeSet<String> = addresses
        .into_iter()
        .flat_map(|address| house_numbers(address.as_ref()))
        .collect();

    let mut sorted: Vec<&str> = numbers.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| natural_cmp(a, b));

    if let Some(odd) = sorted.iter().find(|n| n.contains('/')) {
        log::debug!("House number token '{odd}' contains '/'; keeping it in the range");
    }

    match sorted.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, .., last] => format!("{first}-{last}"),
    }
}
