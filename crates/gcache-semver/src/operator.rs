//! Comparison operators

use std::fmt;
use std::str::FromStr;

use crate::error::SemverError;
use crate::version::Version;

/// Comparison operators understood by comparators and [`crate::Semver::cmp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (empty, `=` or `==`)
    Equal,
    /// Same version text (`===`)
    StrictEqual,
    /// Not equal (!=)
    NotEqual,
    /// Different version text (`!==`)
    StrictNotEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
}

impl Operator {
    /// Get the string representation of the operator
    ///
    /// Equality renders as the empty string, the way comparators print it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "",
            Operator::StrictEqual => "===",
            Operator::NotEqual => "!=",
            Operator::StrictNotEqual => "!==",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
        }
    }

    /// `>` or `>=`
    pub fn is_greater(&self) -> bool {
        matches!(self, Operator::GreaterThan | Operator::GreaterThanOrEqual)
    }

    /// `<` or `<=`
    pub fn is_less(&self) -> bool {
        matches!(self, Operator::LessThan | Operator::LessThanOrEqual)
    }

    /// Whether the operator admits equality (`=`, `>=`, `<=`)
    pub fn includes_equal(&self) -> bool {
        matches!(
            self,
            Operator::Equal | Operator::StrictEqual | Operator::LessThanOrEqual | Operator::GreaterThanOrEqual
        )
    }

    /// Apply the operator as `left <op> right`
    pub fn test(&self, left: &Version, right: &Version) -> bool {
        match self {
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
            Operator::StrictEqual => left.version() == right.version(),
            Operator::StrictNotEqual => left.version() != right.version(),
            Operator::LessThan => left < right,
            Operator::LessThanOrEqual => left <= right,
            Operator::GreaterThan => left > right,
            Operator::GreaterThanOrEqual => left >= right,
        }
    }

    /// Get all supported operators
    pub fn supported_operators() -> &'static [&'static str] {
        &["", "=", "==", "===", "!=", "!==", "<", "<=", ">", ">="]
    }
}

impl FromStr for Operator {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "=" | "==" => Ok(Operator::Equal),
            "===" => Ok(Operator::StrictEqual),
            "!=" => Ok(Operator::NotEqual),
            "!==" => Ok(Operator::StrictNotEqual),
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessThanOrEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            _ => Err(SemverError::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
