//! A single primitive constraint: operator plus version, or "any"

use std::fmt;
use std::slice;

use log::debug;

use crate::error::SemverError;
use crate::grammar::{collapse_whitespace, COMPARATOR, COMPARATOR_LOOSE};
use crate::operator::Operator;
use crate::options::Options;
use crate::range::test_set;
use crate::version::Version;

/// Comparator value that no version satisfies
pub const NULL_SET: &str = "<0.0.0-0";

/// One `op version` constraint
///
/// A comparator without a version is "any" and matches every version.
#[derive(Debug, Clone)]
pub struct Comparator {
    operator: Operator,
    semver: Option<Version>,
    value: String,
    options: Options,
}

impl Comparator {
    /// Parse one comparator token such as `>=1.2.3`, `=1.2.3` or the empty string
    pub fn parse(text: &str, options: impl Into<Options>) -> Result<Self, SemverError> {
        let options = options.into();
        let text = collapse_whitespace(text);

        let re = if options.loose { &*COMPARATOR_LOOSE } else { &*COMPARATOR };
        let caps = re
            .captures(&text)
            .ok_or_else(|| SemverError::InvalidComparator(text.clone()))?;

        let operator = match caps.get(1) {
            Some(m) => m.as_str().parse()?,
            None => Operator::Equal,
        };

        let semver = match caps.get(2) {
            Some(m) if !m.as_str().is_empty() => Some(Version::parse(m.as_str(), options)?),
            _ => None,
        };

        let value = match &semver {
            Some(version) => format!("{}{}", operator, version.version()),
            None => String::new(),
        };

        debug!("comparator {:?} -> {:?}", text, value);

        Ok(Comparator {
            operator,
            semver,
            value,
            options,
        })
    }

    /// Build a comparator from an operator and a version
    pub fn new(operator: Operator, version: Version, options: impl Into<Options>) -> Self {
        Comparator {
            operator,
            value: format!("{}{}", operator, version.version()),
            semver: Some(version),
            options: options.into(),
        }
    }

    /// The comparator every version satisfies
    pub fn any(options: impl Into<Options>) -> Self {
        Comparator {
            operator: Operator::Equal,
            semver: None,
            value: String::new(),
            options: options.into(),
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The bound version, `None` for "any"
    pub fn semver(&self) -> Option<&Version> {
        self.semver.as_ref()
    }

    /// Canonical text: operator followed by the version without build
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn is_any(&self) -> bool {
        self.semver.is_none()
    }

    /// Whether this is the `<0.0.0-0` comparator
    pub fn is_null_set(&self) -> bool {
        self.value == NULL_SET
    }

    /// Whether the version satisfies this comparator alone
    pub fn test(&self, version: &Version) -> bool {
        match &self.semver {
            None => true,
            Some(bound) => self.operator.test(version, bound),
        }
    }

    /// Whether some version could satisfy both comparators
    pub fn intersects(&self, other: &Comparator, options: impl Into<Options>) -> bool {
        let options = options.into();

        if self.operator == Operator::Equal {
            return match &self.semver {
                None => true,
                Some(version) => test_set(slice::from_ref(other), version, options),
            };
        }
        if other.operator == Operator::Equal {
            return match &other.semver {
                None => true,
                Some(version) => test_set(slice::from_ref(self), version, options),
            };
        }

        let (Some(this_version), Some(other_version)) = (&self.semver, &other.semver) else {
            return true;
        };

        if options.include_prerelease && (self.is_null_set() || other.is_null_set()) {
            return false;
        }
        if !options.include_prerelease && (self.value.starts_with("<0.0.0") || other.value.starts_with("<0.0.0")) {
            return false;
        }

        let (this_op, other_op) = (self.operator, other.operator);

        if this_op.is_greater() && other_op.is_greater() {
            return true;
        }
        if this_op.is_less() && other_op.is_less() {
            return true;
        }
        if this_version.version() == other_version.version() && this_op.includes_equal() && other_op.includes_equal()
        {
            return true;
        }
        if this_version < other_version && this_op.is_greater() && other_op.is_less() {
            return true;
        }
        if this_version > other_version && this_op.is_less() && other_op.is_greater() {
            return true;
        }

        false
    }
}

impl PartialEq for Comparator {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Comparator {}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(text: &str) -> Comparator {
        Comparator::parse(text, Options::default()).unwrap()
    }

    #[test]
    fn test_parse_normalizes_value() {
        assert_eq!(c(">= 1.2.3").value(), ">=1.2.3");
        assert_eq!(c("=1.2.3").value(), "1.2.3");
        assert_eq!(c("1.2.3+build").value(), "1.2.3");
        assert_eq!(c("<1.0.0-0").value(), "<1.0.0-0");
        assert!(c("").is_any());
        assert_eq!(c("").value(), "");
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(
            Comparator::parse("foo", false).unwrap_err(),
            SemverError::InvalidComparator("foo".to_string())
        );
        assert!(Comparator::parse("~1.2.3", false).is_err());
        assert!(Comparator::parse(">=v1.2.3", false).is_ok());
        assert!(Comparator::parse(">=01.2.3", false).is_err());
        assert!(Comparator::parse(">=01.2.3", true).is_ok());
    }

    #[test]
    fn test_matches() {
        let version: Version = "1.2.3".parse().unwrap();
        assert!(c(">=1.2.3").test(&version));
        assert!(!c(">1.2.3").test(&version));
        assert!(c("<1.2.4").test(&version));
        assert!(c("1.2.3").test(&version));
        assert!(c("").test(&version));
        assert!(!c("<0.0.0-0").test(&version));
    }

    #[test]
    fn test_intersects() {
        let cases = [
            ("1.3.0", ">=1.3.0", true),
            ("1.3.0", ">1.3.0", false),
            (">=1.3.0", "<1.3.0", false),
            ("<1.3.0", ">=1.3.0", false),
            (">1.3.0", "<=1.3.0", false),
            (">=1.3.0", "<=1.3.0", true),
            ("<=1.3.0", ">=1.3.0", true),
            (">1.0.0", ">2.0.0", true),
            ("<1.0.0", "<=2.0.0", true),
            (">1.0.0", "<2.0.0", true),
            ("<1.0.0", ">2.0.0", false),
            ("", "<0.0.0-0", true),
            (">=0.0.0", "<0.0.0-0", false),
            ("1.2.3-beta", ">1.2.3-alpha", true),
            ("1.2.4-beta", ">1.2.3", false),
        ];

        for (a, b, expected) in cases {
            let (a, b) = (c(a), c(b));
            assert_eq!(a.intersects(&b, Options::default()), expected, "{} ∩ {}", a, b);
            assert_eq!(b.intersects(&a, Options::default()), expected, "{} ∩ {}", b, a);
        }
    }

    #[test]
    fn test_intersects_include_prerelease() {
        let opts = Options::include_prerelease();
        assert!(c("1.2.4-beta").intersects(&c(">1.2.3"), opts));
        assert!(!c(">=0.0.0").intersects(&c("<0.0.0-0"), opts));
    }
}
