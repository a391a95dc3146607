//! Natural-sort ordering for house numbers.
//!
//! A token is split into alternating text and digit runs, always starting
//! and ending with a (possibly empty) text run: `"10A"` becomes
//! `["", 10, "A"]`. Keys compare chunk by chunk, digit runs numerically and
//! text runs lexicographically, so `"9" < "10" < "10A" < "10B"`.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Regex for a run of ASCII digits.
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// One run of a natural-sort key.
#[derive(Debug, Clone, Copy)]
pub enum Chunk<'a> {
    /// A run of non-digit characters (possibly empty).
    Text(&'a str),
    /// A run of ASCII digits, compared by numeric value.
    Digits(&'a str),
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Digits(a), Self::Digits(b)) => compare_digit_runs(a, b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // Keys alternate text/digits from a text start, so runs at the
            // same position always share a variant.
            (Self::Digits(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Digits(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Chunk<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Chunk<'_> {}

/// Natural-sort key of a token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey<'a>(Vec<Chunk<'a>>);

impl<'a> NaturalKey<'a> {
    /// Splits `token` into its text/digit runs.
    #[must_use]
    pub fn new(token: &'a str) -> Self {
        let mut chunks = Vec::new();
        let mut last = 0;

        for run in DIGIT_RUN_RE.find_iter(token) {
            chunks.push(Chunk::Text(&token[last..run.start()]));
            chunks.push(Chunk::Digits(run.as_str()));
            last = run.end();
        }
        chunks.push(Chunk::Text(&token[last..]));

        Self(chunks)
    }

    /// The runs making up this key.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk<'a>] {
        &self.0
    }
}

/// Compares two tokens in natural order.
///
/// Tokens with equal keys but different text (`"07"` and `"7"`) fall back
/// to plain string order, which keeps the ordering total.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a)
        .cmp(&NaturalKey::new(b))
        .then_with(|| a.cmp(b))
}

/// Compares digit runs by value without parsing, so arbitrarily long runs
/// never overflow.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
