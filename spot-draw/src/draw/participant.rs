// Participant records and the fixed-spot expression parser.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque participant identity issued by the session.
///
/// Ids are handed out in increasing order and never reused, so sorting by id
/// reproduces insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Display name, trimmed and never empty.
    pub name: String,
    /// Reserved spot numbers, ascending and unique.
    pub fixed_spots: Vec<u32>,
    /// How many additional spots to fill at random.
    pub random_count: u32,
}

impl Participant {
    /// Total number of spots this participant asked for.
    pub fn requested_total(&self) -> u64 {
        self.fixed_spots.len() as u64 + u64::from(self.random_count)
    }
}

/// Raw form input for a new participant, before validation.
///
/// All three fields are kept as entered; the session trims, parses and
/// validates them when the draft is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub name: String,
    pub fixed_spots: String,
    pub random_count: String,
}

impl ParticipantDraft {
    pub fn new(
        name: impl Into<String>,
        fixed_spots: impl Into<String>,
        random_count: impl Into<String>,
    ) -> Self {
        ParticipantDraft {
            name: name.into(),
            fixed_spots: fixed_spots.into(),
            random_count: random_count.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-spot expressions
// ---------------------------------------------------------------------------

/// Result of parsing a fixed-spot expression such as `"1, 3 5-8"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpots {
    /// In-range spot numbers, deduplicated and ascending.
    pub spots: Vec<u32>,
    /// Tokens that were neither an integer nor an `a-b` range.
    pub ignored_tokens: Vec<String>,
    /// Number of well-formed values dropped for falling outside
    /// `[1, total_spots]`.
    pub out_of_range: u64,
}

impl ParsedSpots {
    /// Whether anything in the expression was dropped.
    pub fn has_skipped(&self) -> bool {
        !self.ignored_tokens.is_empty() || self.out_of_range > 0
    }
}

/// Parse a fixed-spot expression against the current spot count.
///
/// Tokens are separated by commas and/or whitespace. Each token is either a
/// bare integer or an inclusive range `a-b` (either order). Malformed tokens
/// and out-of-range values are dropped and reported in the result rather than
/// failing the whole expression.
pub fn parse_spot_expression(expr: &str, total_spots: u32) -> ParsedSpots {
    let mut spots = BTreeSet::new();
    let mut ignored_tokens = Vec::new();
    let mut out_of_range = 0u64;

    for token in expr
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let Some((lo, hi)) = parse_token(token) else {
            ignored_tokens.push(token.to_string());
            continue;
        };

        // Clamp arithmetically so "1-4000000000" costs O(total_spots).
        let first = lo.max(1);
        let last = hi.min(u64::from(total_spots));
        // Saturates: "0-18446744073709551615" spans 2^64 values.
        let span = (hi - lo).saturating_add(1);
        if first > last {
            out_of_range = out_of_range.saturating_add(span);
            continue;
        }
        out_of_range = out_of_range.saturating_add(span - (last - first + 1));
        // `last <= total_spots`, so both ends fit in u32.
        spots.extend(first as u32..=last as u32);
    }

    ParsedSpots {
        spots: spots.into_iter().collect(),
        ignored_tokens,
        out_of_range,
    }
}

/// Parse one token into an inclusive `(low, high)` pair.
fn parse_token(token: &str) -> Option<(u64, u64)> {
    match token.split_once('-') {
        Some((a, b)) => {
            let a = parse_number(a)?;
            let b = parse_number(b)?;
            Some((a.min(b), a.max(b)))
        }
        None => parse_number(token).map(|n| (n, n)),
    }
}

fn parse_number(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Render spot numbers back into compact range notation (`1-3, 7`).
pub fn format_spots(spots: &[u32]) -> String {
    let mut parts = Vec::new();
    let mut iter = spots.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }
    parts.join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
