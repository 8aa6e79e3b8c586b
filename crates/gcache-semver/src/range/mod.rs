//! Ranges: an OR of AND-ed comparator groups

mod cache;
mod parser;
mod query;
mod subset;

use std::fmt;
use std::str::FromStr;

use crate::comparator::Comparator;
use crate::error::SemverError;
use crate::options::Options;
use crate::version::Version;

pub use cache::LruCache;
pub use parser::RangeParser;
pub use query::{min_version, outside, simplify, Hilo};
pub use subset::subset;

/// A parsed range such as `^1.2.3 || >=2.5.0 <3.0.0`
#[derive(Debug, Clone)]
pub struct Range {
    raw: String,
    formatted: String,
    set: Vec<Vec<Comparator>>,
    options: Options,
}

impl Range {
    /// Parse with the process-wide [`RangeParser`]
    pub fn parse(text: &str, options: impl Into<Options>) -> Result<Self, SemverError> {
        RangeParser::global().parse(text, options)
    }

    /// Parse with a caller-owned parser and cache
    pub fn parse_with(parser: &RangeParser, text: &str, options: impl Into<Options>) -> Result<Self, SemverError> {
        parser.parse(text, options)
    }

    pub(crate) fn from_parts(raw: String, set: Vec<Vec<Comparator>>, options: Options) -> Self {
        let formatted = set
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(Comparator::value)
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("||");

        Range {
            raw,
            formatted,
            set,
            options,
        }
    }

    /// The input text with whitespace collapsed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Comparator groups; a version must satisfy every comparator of one group
    pub fn set(&self) -> &[Vec<Comparator>] {
        &self.set
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Whether the range matches every release version
    pub fn is_any(&self) -> bool {
        self.formatted.is_empty()
    }

    pub fn test(&self, version: &Version) -> bool {
        self.set.iter().any(|group| test_set(group, version, self.options))
    }

    /// Parse the version with this range's options first; invalid text never matches
    pub fn test_str(&self, version: &str) -> bool {
        match Version::parse(version, self.options) {
            Ok(version) => self.test(&version),
            Err(_) => false,
        }
    }

    /// Whether some version could satisfy both ranges
    pub fn intersects(&self, other: &Range, options: impl Into<Options>) -> bool {
        let options = options.into();
        self.set.iter().any(|ours| {
            is_satisfiable(ours, options)
                && other.set.iter().any(|theirs| {
                    is_satisfiable(theirs, options)
                        && ours
                            .iter()
                            .all(|a| theirs.iter().all(|b| a.intersects(b, options)))
                })
        })
    }
}

/// Test one comparator group, including the prerelease pin rule
pub(crate) fn test_set(set: &[Comparator], version: &Version, options: Options) -> bool {
    if !set.iter().all(|comparator| comparator.test(version)) {
        return false;
    }

    if version.is_prerelease() && !options.include_prerelease {
        // A prerelease only matches when some comparator in the group pins
        // a prerelease on the same major.minor.patch
        return set
            .iter()
            .filter_map(Comparator::semver)
            .any(|allowed| allowed.is_prerelease() && allowed.same_tuple(version));
    }

    true
}

/// Every pair of comparators in the group intersects
pub(crate) fn is_satisfiable(comparators: &[Comparator], options: Options) -> bool {
    comparators.iter().enumerate().all(|(i, a)| {
        comparators[i + 1..]
            .iter()
            .all(|b| a.intersects(b, options))
    })
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted)
    }
}

impl FromStr for Range {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Range::parse(s, Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(version: &str, range: &str, options: Options) -> bool {
        Range::parse(range, options).unwrap().test_str(version)
    }

    #[test]
    fn test_range_include() {
        let opts = Options::default();
        let cases = [
            ("1.0.0 - 2.0.0", "1.2.3"),
            ("^1.2.3+build", "1.2.3"),
            ("^1.2.3+build", "1.3.0"),
            ("1.2.3-pre+asdf - 2.4.3-pre+asdf", "1.2.3"),
            ("1.2.3-pre+asdf - 2.4.3-pre+asdf", "1.2.3-pre.2"),
            ("1.2.3-pre+asdf - 2.4.3-pre+asdf", "2.4.3-alpha"),
            ("1.0.0", "1.0.0"),
            (">=*", "0.2.4"),
            ("", "1.0.0"),
            ("*", "1.2.3"),
            (">=1.0.0", "1.0.0"),
            (">=1.0.0", "1.0.1"),
            (">=1.0.0", "1.1.0"),
            (">1.0.0", "1.0.1"),
            ("<=2.0.0", "2.0.0"),
            ("<=2.0.0", "1.9999.9999"),
            ("<2.0.0", "0.2.9"),
            (">= 1.0.0", "1.0.0"),
            ("<=   2.0.0", "1.9999.9999"),
            ("0.1.20 || 1.2.4", "1.2.4"),
            (">=0.2.3 || <0.0.1", "0.0.0"),
            (">=0.2.3 || <0.0.1", "0.2.3"),
            ("2.x.x", "2.1.3"),
            ("1.2.x", "1.2.3"),
            ("1.2.x || 2.x", "2.1.3"),
            ("x", "1.2.3"),
            ("2.*.*", "2.1.3"),
            ("2", "2.1.2"),
            ("2.3", "2.3.1"),
            ("~0.0.1", "0.0.1"),
            ("~0.0.1", "0.0.2"),
            ("~x", "0.0.9"),
            ("~2", "2.0.9"),
            ("~2.4", "2.4.0"),
            ("~2.4", "2.4.5"),
            ("~>3.2.1", "3.2.2"),
            ("~1", "1.2.3"),
            ("~>1", "1.2.3"),
            ("~ 1.0", "1.0.2"),
            ("~ 1.0.3", "1.0.12"),
            (">=1", "1.0.0"),
            (">= 1", "1.0.0"),
            ("<1.2", "1.1.1"),
            ("< 1.2", "1.1.1"),
            ("~v0.5.4-pre", "0.5.5"),
            ("~v0.5.4-pre", "0.5.4"),
            ("=0.7.x", "0.7.2"),
            ("<=0.7.x", "0.7.2"),
            (">=0.7.x", "0.7.2"),
            ("<=0.7.x", "0.6.2"),
            ("~1.2.1 >=1.2.3", "1.2.3"),
            ("~1.2.1 =1.2.3", "1.2.3"),
            ("~1.2.1 1.2.3", "1.2.3"),
            (">=1.2.1 1.2.3", "1.2.3"),
            ("1.2.3 >=1.2.1", "1.2.3"),
            (">=1.2.3 >=1.2.1", "1.2.3"),
            (">=1.2.1 >=1.2.3", "1.2.3"),
            (">=1.2", "1.2.8"),
            ("^1.2.3", "1.8.1"),
            ("^0.1.2", "0.1.2"),
            ("^0.1", "0.1.2"),
            ("^0.0.1", "0.0.1"),
            ("^1.2", "1.4.2"),
            ("^1.2 ^1", "1.4.2"),
            ("^1.2.3-alpha", "1.2.3-pre"),
            ("^1.2.0-alpha", "1.2.0-pre"),
            ("^0.0.1-alpha", "0.0.1-beta"),
            ("^0.0.1-alpha", "0.0.1"),
            ("^0.1.1-alpha", "0.1.1-beta"),
            ("^x", "1.2.3"),
            ("x - 1.0.0", "0.9.7"),
            ("x - 1.x", "0.9.7"),
            ("1.0.0 - x", "1.9.7"),
            ("1.x - x", "1.9.7"),
            ("<=7.x", "7.9.9"),
        ];

        for (range, version) in cases {
            assert!(satisfies(version, range, opts), "{} should satisfy {}", version, range);
        }
    }

    #[test]
    fn test_range_include_loose_and_prerelease() {
        assert!(satisfies("1.2.3", "1.2.3pre+asdf - 2.4.3-pre+asdf", Options::loose()));
        assert!(!satisfies("1.2.3", "~v0.5.4-pre", Options::loose()));
        assert!(satisfies("1.2.3-pre", "1.2.3pre+asdf - 2.4.3pre+asdf", Options::loose()));
        assert!(satisfies("1.0.0-beta", "*", Options::include_prerelease()));
        assert!(satisfies("1.0.0-beta", "^1.0.0-0", Options::default()));
        assert!(satisfies("2.0.0-pre", ">=1.0.0", Options::include_prerelease()));
        assert!(satisfies("1.0.1-beta", "~1.0.0", Options::include_prerelease()));
    }

    #[test]
    fn test_range_exclude() {
        let opts = Options::default();
        let cases = [
            ("1.0.0 - 2.0.0", "2.2.3"),
            ("1.2.3+asdf - 2.4.3+asdf", "1.2.3-pre.2"),
            ("1.2.3+asdf - 2.4.3+asdf", "2.4.3-alpha"),
            ("^1.2.3+build", "2.0.0"),
            ("^1.2.3+build", "1.2.0"),
            ("^1.2.3", "1.2.3-pre"),
            ("^1.2", "1.2.0-pre"),
            (">1.2", "1.3.0-beta"),
            ("<=1.2.3", "1.2.3-beta"),
            ("^1.2.3", "1.2.3-beta"),
            ("=0.7.x", "0.7.0-asdf"),
            (">=0.7.x", "0.7.0-asdf"),
            ("<=0.7.x", "0.7.0-asdf"),
            ("1.0.0", "1.0.1"),
            (">=1.0.0", "0.0.0"),
            (">=1.0.0", "0.0.1"),
            (">=1.0.0", "0.1.0"),
            (">1.0.0", "0.0.1"),
            ("<=2.0.0", "3.0.0"),
            ("<=2.0.0", "2.9999.9999"),
            ("<2.0.0", "2.0.0"),
            ("0.1.20 || 1.2.4", "1.2.3"),
            (">=0.2.3 || <0.0.1", "0.0.3"),
            (">=0.2.3 || <0.0.1", "0.2.2"),
            ("2.x.x", "1.1.3"),
            ("2.x.x", "3.1.3"),
            ("1.2.x", "1.3.3"),
            ("1.2.x || 2.x", "3.1.3"),
            ("1.2.x || 2.x", "1.1.3"),
            ("2.*.*", "3.1.3"),
            ("2", "1.1.2"),
            ("2.3", "2.4.1"),
            ("~0.0.1", "0.1.0-alpha"),
            ("~0.0.1", "0.1.0"),
            ("~2.4", "2.5.0"),
            ("~2.4", "2.3.9"),
            ("~>3.2.1", "3.3.2"),
            ("~>3.2.1", "3.2.0"),
            ("~1", "0.2.3"),
            ("~>1", "2.2.3"),
            ("~1.0", "1.1.0"),
            ("<1", "1.0.0"),
            (">=1.2", "1.1.1"),
            ("~v0.5.4-beta", "0.5.4-alpha"),
            ("=0.7.x", "0.8.2"),
            (">=0.7.x", "0.6.2"),
            ("<0.7.x", "0.7.2"),
            ("<1.2.3", "1.2.3-beta"),
            ("=1.2.3", "1.2.3-beta"),
            (">1.2", "1.2.8"),
            ("^0.0.1", "0.0.2"),
            ("^1.2.3", "2.0.0-alpha"),
            ("^1.2.3", "1.2.2"),
            ("^1.2", "1.1.9"),
            ("*", "v1.2.3-foo"),
            ("^1.0.0", "2.0.0-rc1"),
            ("1 - 2", "3.0.0-pre"),
            ("1 - 2", "2.0.0-pre"),
            ("1 - 2", "1.0.0-pre"),
            ("1.0 - 2", "1.0.0-pre"),
            ("1.1.x", "1.0.0-a"),
            ("1.1.x", "1.1.0-a"),
            ("1.1.x", "1.2.0-a"),
            ("1.x", "1.0.0-a"),
            ("1.x", "1.1.0-a"),
            ("1.x", "1.2.0-a"),
            (">=1.0.0 <1.1.0", "1.1.0"),
            (">=1.0.0 <1.1.0", "1.1.0-pre"),
            (">=1.0.0 <1.1.0-pre", "1.1.0-pre"),
            ("==1.0.0 || foo", "2.0.0"),
        ];

        for (range, version) in cases {
            let range = match Range::parse(range, opts) {
                Ok(range) => range,
                Err(_) => continue,
            };
            assert!(!range.test_str(version), "{} should not satisfy {}", version, range.raw());
        }
    }

    #[test]
    fn test_invalid_versions_never_match() {
        let range = Range::parse("*", Options::default()).unwrap();
        assert!(!range.test_str("not a version"));
        assert!(!range.test_str(""));
    }

    #[test]
    fn test_range_intersects() {
        let cases = [
            ("1.3.0 || <1.0.0 >2.0.0", "1.3.0 || <1.0.0 >2.0.0", true),
            ("<1.0.0 >2.0.0", ">0.0.0", false),
            (">0.0.0", "<1.0.0 >2.0.0", false),
            ("<1.0.0 >2.0.0", ">1.4.0 <1.6.0", false),
            ("<1.0.0 >2.0.0", ">1.4.0 <1.6.0 || 2.0.0", false),
            (">1.0.0 <=2.0.0", "2.0.0", true),
            ("<1.0.0 >=2.0.0", "2.1.0", false),
            ("<1.0.0 >=2.0.0", ">1.4.0 <1.6.0 || 2.0.0", false),
            ("1.5.x", "<1.5.0", false),
            ("<1.5.0", "1.5.x", false),
            ("^1.2.3", "^1.4.0", true),
            ("~1.2.3", "^1.4.0", false),
            ("1.x", "1.3.0", true),
            ("", "<1.0.0", true),
            (">=1.0.0 || <0.5.0", "0.6.0", false),
            ("1.0.0 - 2.0.0", "2.0.0 - 3.0.0", true),
        ];

        for (a, b, expected) in cases {
            let (ra, rb) = (Range::parse(a, false).unwrap(), Range::parse(b, false).unwrap());
            assert_eq!(ra.intersects(&rb, Options::default()), expected, "{:?} ∩ {:?}", a, b);
            assert_eq!(rb.intersects(&ra, Options::default()), expected, "{:?} ∩ {:?}", b, a);
        }
    }

    #[test]
    fn test_display_and_raw() {
        let range = Range::parse("  ^1.2.3   ||  ~2  ", false).unwrap();
        assert_eq!(range.raw(), "^1.2.3 || ~2");
        assert_eq!(range.to_string(), ">=1.2.3 <2.0.0-0||>=2.0.0 <3.0.0-0");
        assert_eq!(range.set().len(), 2);
        assert!(Range::parse("*", false).unwrap().is_any());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Range::parse("not a range", false),
            Err(SemverError::InvalidComparator(_))
        ));
        assert!(matches!(
            Range::parse("not a range", true),
            Err(SemverError::InvalidRange(_))
        ));
        assert!("^1.2.3".parse::<Range>().is_ok());
    }
}
