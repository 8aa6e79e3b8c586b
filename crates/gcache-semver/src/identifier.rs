//! Prerelease and build identifiers

use std::cmp::Ordering;
use std::fmt;

use crate::grammar::MAX_SAFE_INTEGER;

/// One dot-separated prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Purely numeric identifier that fits in a safe integer
    Numeric(u64),
    /// Anything else (letters, hyphens, or oversized digit runs)
    AlphaNumeric(String),
}

impl Identifier {
    /// Classify a raw identifier
    pub fn new(raw: &str) -> Self {
        if is_numeric(raw) {
            if let Ok(n) = raw.parse::<u64>() {
                if n < MAX_SAFE_INTEGER {
                    return Identifier::Numeric(n);
                }
            }
        }
        Identifier::AlphaNumeric(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Identifier::Numeric(n) => Some(*n),
            Identifier::AlphaNumeric(_) => None,
        }
    }
}

impl From<u64> for Identifier {
    fn from(n: u64) -> Self {
        Identifier::Numeric(n)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => write!(f, "{}", s),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            _ => compare_identifiers(&self.to_string(), &other.to_string()),
        }
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Compare two digit strings by value, without overflowing
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two identifiers: numeric ones by value and below non-numeric
/// ones, non-numeric ones by ASCII order
pub fn compare_identifiers(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => compare_numeric(a, b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Pairwise identifier comparison where a strict prefix sorts first
pub fn compare_identifier_lists<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Same as [`compare_identifier_lists`] for raw build identifiers
pub fn compare_build_lists(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if x == y {
            continue;
        }
        return compare_identifiers(x, y);
    }
    a.len().cmp(&b.len())
}
