//! Questions asked of a whole range

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::SemverError;
use crate::identifier::Identifier;
use crate::operator::Operator;
use crate::range::Range;
use crate::version::Version;

/// Direction for [`outside`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hilo {
    /// Above every group (`>`)
    Greater,
    /// Below every group (`<`)
    Less,
}

impl FromStr for Hilo {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Hilo::Greater),
            "<" => Ok(Hilo::Less),
            _ => Err(SemverError::InvalidHilo),
        }
    }
}

/// Lowest version the range admits, if any
pub fn min_version(range: &Range) -> Option<Version> {
    let zero = Version::new(0, 0, 0);
    if range.test(&zero) {
        return Some(zero);
    }

    let mut zero_pre = Version::new(0, 0, 0);
    zero_pre.pre.push(Identifier::Numeric(0));
    if range.test(&zero_pre) {
        return Some(zero_pre);
    }

    let mut lowest: Option<Version> = None;
    for group in range.set() {
        let mut group_min: Option<Version> = None;

        for comparator in group {
            let Some(bound) = comparator.semver() else {
                continue;
            };
            let mut candidate = bound.clone();
            candidate.build.clear();

            match comparator.operator() {
                Operator::GreaterThan => {
                    if candidate.is_prerelease() {
                        candidate.pre.push(Identifier::Numeric(0));
                    } else {
                        candidate.patch += 1;
                    }
                }
                Operator::Equal | Operator::GreaterThanOrEqual => {}
                _ => continue,
            }

            if group_min.as_ref().map_or(true, |current| candidate > *current) {
                group_min = Some(candidate);
            }
        }

        if let Some(candidate) = group_min {
            if lowest.as_ref().map_or(true, |current| *current > candidate) {
                lowest = Some(candidate);
            }
        }
    }

    lowest.filter(|version| range.test(version))
}

/// Whether the version lies entirely above (`Greater`) or below (`Less`) the range
pub fn outside(version: &Version, range: &Range, hilo: Hilo) -> bool {
    if range.test(version) {
        return false;
    }

    let (comp, ecomp) = match hilo {
        Hilo::Greater => (Operator::GreaterThan, Operator::GreaterThanOrEqual),
        Hilo::Less => (Operator::LessThan, Operator::LessThanOrEqual),
    };
    // Ordering as seen from `hilo`: for `Less` everything is mirrored
    let order = |a: &Version, b: &Version| match hilo {
        Hilo::Greater => a.cmp(b),
        Hilo::Less => b.cmp(a),
    };

    let zero = Version::new(0, 0, 0);

    for group in range.set() {
        let bounds = group.iter().map(|comparator| match comparator.semver() {
            Some(bound) => (comparator.operator(), bound),
            None => (Operator::GreaterThanOrEqual, &zero),
        });

        let mut high: Option<(Operator, &Version)> = None;
        let mut low: Option<(Operator, &Version)> = None;
        for current in bounds {
            let h = *high.get_or_insert(current);
            let l = *low.get_or_insert(current);
            if order(current.1, h.1) == Ordering::Greater {
                high = Some(current);
            } else if order(current.1, l.1) == Ordering::Less {
                low = Some(current);
            }
        }

        let (Some((high_op, _)), Some((low_op, low_version))) = (high, low) else {
            continue;
        };

        // Some comparator keeps growing in the direction asked about
        if high_op == comp || high_op == ecomp {
            return false;
        }

        // The lowest bound already excludes the version from the wrong side
        if (low_op == Operator::Equal || low_op == comp) && order(version, low_version) != Ordering::Greater {
            return false;
        } else if low_op == ecomp && order(version, low_version) == Ordering::Less {
            return false;
        }
    }

    true
}

/// Shortest range selecting the same members of `versions` as `range`
///
/// Invalid versions are skipped. Falls back to the range's own text when
/// the simplification is not shorter.
pub fn simplify(versions: &[&str], range: &Range) -> String {
    let mut sorted: Vec<(Version, &str)> = versions
        .iter()
        .filter_map(|text| Version::parse(text, range.options()).ok().map(|v| (v, *text)))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut spans: Vec<(&str, Option<&str>)> = Vec::new();
    let mut first: Option<&str> = None;
    let mut prev: Option<&str> = None;

    for (version, text) in &sorted {
        if range.test(version) {
            prev = Some(*text);
            first.get_or_insert(*text);
        } else {
            if let (Some(start), Some(end)) = (first, prev) {
                spans.push((start, Some(end)));
            }
            first = None;
            prev = None;
        }
    }
    if let Some(start) = first {
        spans.push((start, None));
    }

    let lowest = sorted.first().map(|(_, text)| *text);
    let parts: Vec<String> = spans
        .into_iter()
        .map(|(min, max)| match max {
            Some(max) if min == max => min.to_string(),
            None if Some(min) == lowest => "*".to_string(),
            None => format!(">={}", min),
            Some(max) if Some(min) == lowest => format!("<={}", max),
            Some(max) => format!("{} - {}", min, max),
        })
        .collect();

    let simplified = parts.join(" || ");
    if simplified.len() < range.raw().len() {
        simplified
    } else {
        range.raw().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn range(text: &str) -> Range {
        Range::parse(text, Options::default()).unwrap()
    }

    fn min(text: &str) -> Option<String> {
        min_version(&range(text)).map(|v| v.to_string())
    }

    #[test]
    fn test_min_version() {
        let cases = [
            ("*", Some("0.0.0")),
            ("* || >=2", Some("0.0.0")),
            (">=2 || *", Some("0.0.0")),
            (">2 || *", Some("0.0.0")),
            ("1.0.0", Some("1.0.0")),
            ("1.0", Some("1.0.0")),
            ("1.0.x", Some("1.0.0")),
            ("1.0.*", Some("1.0.0")),
            ("1", Some("1.0.0")),
            ("1.x.x", Some("1.0.0")),
            ("1.*.x", Some("1.0.0")),
            ("1.x.*", Some("1.0.0")),
            ("1.x", Some("1.0.0")),
            ("1.*", Some("1.0.0")),
            ("=1.0.0", Some("1.0.0")),
            ("~1.1.1", Some("1.1.1")),
            ("~1.1.1-beta", Some("1.1.1-beta")),
            ("~1.1.1 || >=2", Some("1.1.1")),
            ("^1.1.1", Some("1.1.1")),
            ("^1.1.1-beta", Some("1.1.1-beta")),
            ("^1.1.1 || >=2", Some("1.1.1")),
            ("^2.16.2 ^2.16", Some("2.16.2")),
            ("1.1.1 - 1.8.0", Some("1.1.1")),
            ("1.1 - 1.8.0", Some("1.1.0")),
            ("<2", Some("0.0.0")),
            ("<0.0.0-beta", Some("0.0.0-0")),
            ("<0.0.1-beta", Some("0.0.0")),
            ("<2 || >4", Some("0.0.0")),
            (">4 || <2", Some("0.0.0")),
            ("<=2 || >=4", Some("0.0.0")),
            (">=4 || <=2", Some("0.0.0")),
            ("<0.0.0-beta >0.0.0-alpha", Some("0.0.0-alpha.0")),
            (">0.0.0-alpha <0.0.0-beta", Some("0.0.0-alpha.0")),
            (">=1.1.1 <2 || >=2.2.2 <2", Some("1.1.1")),
            (">=2.2.2 <2 || >=1.1.1 <2", Some("1.1.1")),
            (">1.0.0", Some("1.0.1")),
            (">1.0.0-0", Some("1.0.0-0.0")),
            (">1.0.0-beta", Some("1.0.0-beta.0")),
            (">2 || >1.0.0", Some("1.0.1")),
            (">2 || >1.0.0-0", Some("1.0.0-0.0")),
            (">2 || >1.0.0-beta", Some("1.0.0-beta.0")),
            (">4 <3", None),
        ];

        for (text, expected) in cases {
            assert_eq!(min(text).as_deref(), expected, "{:?}", text);
        }
    }

    #[test]
    fn test_outside() {
        let above = [
            ("~1.2.2", "1.3.0"),
            ("~0.6.1-1", "0.7.1-1"),
            ("1.0.0 - 2.0.0", "2.0.1"),
            ("1.0.0", "1.0.1-beta1"),
            ("1.0.0", "2.0.0"),
            ("<=2.0.0", "2.1.1"),
            ("<=2.0.0", "3.2.9"),
            ("<2.0.0", "2.0.0"),
            ("0.1.20 || 1.2.4", "1.2.5"),
            ("2.x.x", "3.0.0"),
            ("1.2.x", "1.3.0"),
            ("1.2.x || 2.x", "3.0.0"),
            ("2.*.*", "5.0.1"),
            ("1.2.*", "1.3.3"),
            ("2", "3.1.0"),
            ("2.3", "2.4.2"),
            ("~2.4", "2.5.0"),
            ("~>3.2.1", "3.3.0"),
            ("~1", "2.2.3"),
            ("<1", "1.0.0"),
            ("<1.2", "1.2.0"),
            ("=0.7.x", "0.8.0"),
            ("<0.7.x", "0.7.0"),
        ];
        for (r, v) in above {
            let version: Version = v.parse().unwrap();
            assert!(outside(&version, &range(r), Hilo::Greater), "{} > {}", v, r);
            assert!(!outside(&version, &range(r), Hilo::Less), "!({} < {})", v, r);
        }

        let below = [
            ("~1.2.2", "1.2.1"),
            ("1.0.0 - 2.0.0", "0.0.1"),
            ("1.0.0", "0.0.0"),
            (">=2.0.0", "1.1.1"),
            (">2.0.0", "2.0.0"),
            ("0.1.20 || 1.2.4", "0.1.5"),
            ("2.x.x", "1.0.0"),
            ("1.2.x || 2.x", "1.0.0"),
            ("2", "1.0.0"),
            ("~1.2", "1.1.0"),
            ("^1.2.3", "1.2.2"),
            (">1.2", "1.2.0"),
        ];
        for (r, v) in below {
            let version: Version = v.parse().unwrap();
            assert!(outside(&version, &range(r), Hilo::Less), "{} < {}", v, r);
            assert!(!outside(&version, &range(r), Hilo::Greater), "!({} > {})", v, r);
        }

        let inside: Version = "1.2.3".parse().unwrap();
        assert!(!outside(&inside, &range("^1.2.0"), Hilo::Greater));
        assert!(!outside(&inside, &range("^1.2.0"), Hilo::Less));
    }

    #[test]
    fn test_hilo_parse() {
        assert_eq!(">".parse::<Hilo>().unwrap(), Hilo::Greater);
        assert_eq!("<".parse::<Hilo>().unwrap(), Hilo::Less);
        assert_eq!("=".parse::<Hilo>().unwrap_err(), SemverError::InvalidHilo);
    }

    #[test]
    fn test_simplify() {
        let versions = [
            "1.0.0", "1.0.1", "1.0.2", "1.0.3", "1.0.4", "1.1.0", "1.1.1", "1.1.2", "1.2.0", "1.2.1", "1.2.2",
            "1.2.3", "1.2.4", "1.2.5", "2.0.0", "2.0.1", "2.1.0", "2.1.1", "2.1.2", "2.2.0", "2.2.1", "2.2.2",
            "2.3.0", "2.3.1", "2.4.0", "3.0.0", "3.1.0", "3.2.0", "3.3.0",
        ];

        assert_eq!(
            simplify(&versions, &range("1.0.0 || 1.0.1 || 1.0.2 || 1.0.3 || 1.0.4")),
            "<=1.0.4"
        );
        assert_eq!(
            simplify(&versions, &range("1.0.0 || 1.0.1 || 1.0.2 || 1.0.3 || 1.0.4 || 2.3.0 || 2.3.1 || 2.4.0")),
            "<=1.0.4 || 2.3.0 - 2.4.0"
        );
        assert_eq!(simplify(&versions, &range(">=3.0.0 <3.1.0")), "3.0.0");
        assert_eq!(simplify(&versions, &range("3.0.0 || 3.1 || 3.2 || 3.3")), ">=3.0.0");
        assert_eq!(simplify(&versions, &range("1 || 2 || 3")), "*");
        assert_eq!(simplify(&versions, &range("2.1 || 2.2 || 2.3")), "2.1.0 - 2.3.1");
        assert_eq!(simplify(&versions, &range("^1.0.0")), "^1.0.0");
    }
}
