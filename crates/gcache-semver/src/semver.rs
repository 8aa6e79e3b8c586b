//! Semver facade providing high-level version operations

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::coerce;
use crate::error::SemverError;
use crate::identifier::Identifier;
use crate::operator::Operator;
use crate::options::Options;
use crate::range::{self, Hilo, Range};
use crate::version::{PrereleaseBase, ReleaseType, Version};

/// A version given either as text or already parsed
#[derive(Debug, Clone, Copy)]
pub enum VersionLike<'a> {
    Text(&'a str),
    Parsed(&'a Version),
}

impl<'a> VersionLike<'a> {
    /// Parse text with the given options, borrow parsed versions as-is
    pub fn resolve(&self, options: Options) -> Result<Cow<'a, Version>, SemverError> {
        match *self {
            VersionLike::Text(text) => Version::parse(text, options).map(Cow::Owned),
            VersionLike::Parsed(version) => Ok(Cow::Borrowed(version)),
        }
    }

    /// Text used by the strict `===`/`!==` comparisons
    fn literal(&self) -> Cow<'a, str> {
        match *self {
            VersionLike::Text(text) => Cow::Borrowed(text),
            VersionLike::Parsed(version) => Cow::Owned(version.version()),
        }
    }
}

impl<'a> From<&'a str> for VersionLike<'a> {
    fn from(text: &'a str) -> Self {
        VersionLike::Text(text)
    }
}

impl<'a> From<&'a String> for VersionLike<'a> {
    fn from(text: &'a String) -> Self {
        VersionLike::Text(text)
    }
}

impl<'a> From<&'a Version> for VersionLike<'a> {
    fn from(version: &'a Version) -> Self {
        VersionLike::Parsed(version)
    }
}

/// A range given either as text or already parsed
#[derive(Debug, Clone, Copy)]
pub enum RangeLike<'a> {
    Text(&'a str),
    Parsed(&'a Range),
}

impl<'a> RangeLike<'a> {
    pub fn resolve(&self, options: Options) -> Result<Cow<'a, Range>, SemverError> {
        match *self {
            RangeLike::Text(text) => Range::parse(text, options).map(Cow::Owned),
            RangeLike::Parsed(range) => Ok(Cow::Borrowed(range)),
        }
    }
}

impl<'a> From<&'a str> for RangeLike<'a> {
    fn from(text: &'a str) -> Self {
        RangeLike::Text(text)
    }
}

impl<'a> From<&'a String> for RangeLike<'a> {
    fn from(text: &'a String) -> Self {
        RangeLike::Text(text)
    }
}

impl<'a> From<&'a Range> for RangeLike<'a> {
    fn from(range: &'a Range) -> Self {
        RangeLike::Parsed(range)
    }
}

/// Main facade for semantic versioning operations
///
/// Functions returning `Option` or `bool` never fail: unparseable input
/// reads as "no result". Functions returning `Result` report bad input.
pub struct Semver;

impl Semver {
    /// Parse a version, `None` when invalid
    pub fn parse(version: &str, options: impl Into<Options>) -> Option<Version> {
        Version::parse(version, options).ok()
    }

    /// Canonical form of a valid version
    pub fn valid(version: &str, options: impl Into<Options>) -> Option<String> {
        Self::parse(version, options).map(|v| v.version())
    }

    /// Canonical form after trimming and dropping leading `=` and `v`
    pub fn clean(version: &str, options: impl Into<Options>) -> Option<String> {
        let stripped = version.trim().trim_start_matches(['=', 'v']);
        Self::valid(stripped, options)
    }

    pub fn major(version: &str, options: impl Into<Options>) -> Option<u64> {
        Self::parse(version, options).map(|v| v.major)
    }

    pub fn minor(version: &str, options: impl Into<Options>) -> Option<u64> {
        Self::parse(version, options).map(|v| v.minor)
    }

    pub fn patch(version: &str, options: impl Into<Options>) -> Option<u64> {
        Self::parse(version, options).map(|v| v.patch)
    }

    /// Prerelease identifiers, `None` for release versions and invalid input
    pub fn prerelease(version: &str, options: impl Into<Options>) -> Option<Vec<Identifier>> {
        Self::parse(version, options)
            .map(|v| v.pre)
            .filter(|pre| !pre.is_empty())
    }

    /// Extract a version from arbitrary text
    pub fn coerce(text: &str, options: impl Into<Options>) -> Option<Version> {
        coerce::coerce(text, options)
    }

    pub fn compare<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<Ordering, SemverError> {
        let options = options.into();
        let a = a.into().resolve(options)?;
        let b = b.into().resolve(options)?;
        Ok(a.compare(&b))
    }

    pub fn compare_loose<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
    ) -> Result<Ordering, SemverError> {
        Self::compare(a, b, Options::loose())
    }

    /// Reverse of [`Semver::compare`]
    pub fn rcompare<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<Ordering, SemverError> {
        Self::compare(b, a, options)
    }

    /// Precedence first, build metadata as the tiebreak
    pub fn compare_build<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<Ordering, SemverError> {
        let options = options.into();
        let a = a.into().resolve(options)?;
        let b = b.into().resolve(options)?;
        Ok(a.compare(&b).then_with(|| a.compare_build(&b)))
    }

    pub fn gt<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? == Ordering::Greater)
    }

    pub fn gte<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? != Ordering::Less)
    }

    pub fn lt<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? == Ordering::Less)
    }

    pub fn lte<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? != Ordering::Greater)
    }

    pub fn eq<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? == Ordering::Equal)
    }

    pub fn neq<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Ok(Self::compare(a, b, options)? != Ordering::Equal)
    }

    /// Compare with an operator given as text
    ///
    /// `===` and `!==` compare the literal text rather than precedence.
    pub fn cmp<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        op: &str,
        b: impl Into<VersionLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        let (a, b) = (a.into(), b.into());
        match op.parse::<Operator>()? {
            Operator::StrictEqual => Ok(a.literal() == b.literal()),
            Operator::StrictNotEqual => Ok(a.literal() != b.literal()),
            operator => {
                let options = options.into();
                let (a, b) = (a.resolve(options)?, b.resolve(options)?);
                Ok(operator.test(&a, &b))
            }
        }
    }

    /// Sort versions in ascending order, dropping invalid ones
    pub fn sort(versions: &[&str], options: impl Into<Options>) -> Vec<String> {
        Self::usort(versions, options.into(), true)
    }

    /// Sort versions in descending order, dropping invalid ones
    pub fn rsort(versions: &[&str], options: impl Into<Options>) -> Vec<String> {
        Self::usort(versions, options.into(), false)
    }

    fn usort(versions: &[&str], options: Options, ascending: bool) -> Vec<String> {
        let mut parsed: Vec<(Version, usize)> = versions
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((Version::parse(v, options).ok()?, i)))
            .collect();

        parsed.sort_by(|(a, _), (b, _)| {
            let cmp = a.compare(b).then_with(|| a.compare_build(b));
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });

        parsed
            .into_iter()
            .map(|(_, i)| versions[i].to_string())
            .collect()
    }

    /// Increment a version by release kind name
    pub fn inc<'a>(
        version: impl Into<VersionLike<'a>>,
        release: &str,
        identifier: Option<&str>,
        options: impl Into<Options>,
    ) -> Result<Version, SemverError> {
        Self::inc_with_base(version, release, identifier, PrereleaseBase::Zero, options)
    }

    pub fn inc_with_base<'a>(
        version: impl Into<VersionLike<'a>>,
        release: &str,
        identifier: Option<&str>,
        base: PrereleaseBase,
        options: impl Into<Options>,
    ) -> Result<Version, SemverError> {
        let options = options.into();
        let release: ReleaseType = release.parse()?;
        let mut version = version.into().resolve(options)?.into_owned();
        version.inc_with(release, identifier, base, options)?;
        Ok(version)
    }

    /// Classify the difference between two versions, `None` when equal
    pub fn diff<'a, 'b>(
        a: impl Into<VersionLike<'a>>,
        b: impl Into<VersionLike<'b>>,
    ) -> Result<Option<ReleaseType>, SemverError> {
        let a = a.into().resolve(Options::default())?;
        let b = b.into().resolve(Options::default())?;

        let (high, low) = match a.compare(&b) {
            Ordering::Equal => return Ok(None),
            Ordering::Greater => (&a, &b),
            Ordering::Less => (&b, &a),
        };

        if low.is_prerelease() && !high.is_prerelease() {
            // Going from a prerelease to its release is a bump of the
            // part the prerelease was cut for
            if low.patch == 0 && low.minor == 0 {
                return Ok(Some(ReleaseType::Major));
            }
            if low.compare_main(high) == Ordering::Equal {
                if low.minor != 0 && low.patch == 0 {
                    return Ok(Some(ReleaseType::Minor));
                }
                return Ok(Some(ReleaseType::Patch));
            }
        }

        let pre = high.is_prerelease();
        let kind = if a.major != b.major {
            if pre { ReleaseType::PreMajor } else { ReleaseType::Major }
        } else if a.minor != b.minor {
            if pre { ReleaseType::PreMinor } else { ReleaseType::Minor }
        } else if a.patch != b.patch {
            if pre { ReleaseType::PrePatch } else { ReleaseType::Patch }
        } else {
            ReleaseType::PreRelease
        };

        Ok(Some(kind))
    }

    /// Check if a version satisfies a range; invalid input never does
    pub fn satisfies<'a, 'b>(
        version: impl Into<VersionLike<'a>>,
        range: impl Into<RangeLike<'b>>,
        options: impl Into<Options>,
    ) -> bool {
        let options = options.into();
        let Ok(range) = range.into().resolve(options) else {
            return false;
        };
        match version.into().resolve(range.options()) {
            Ok(version) => range.test(&version),
            Err(_) => false,
        }
    }

    /// Return all versions that satisfy the given range
    pub fn satisfied_by(versions: &[&str], range: &str, options: impl Into<Options>) -> Vec<String> {
        let Ok(range) = Range::parse(range, options) else {
            return Vec::new();
        };

        versions
            .iter()
            .filter(|v| range.test_str(v))
            .map(|v| v.to_string())
            .collect()
    }

    /// Highest version in the list satisfying the range
    pub fn max_satisfying(versions: &[&str], range: &str, options: impl Into<Options>) -> Option<String> {
        Self::extreme_satisfying(versions, range, options.into(), Ordering::Greater)
    }

    /// Lowest version in the list satisfying the range
    pub fn min_satisfying(versions: &[&str], range: &str, options: impl Into<Options>) -> Option<String> {
        Self::extreme_satisfying(versions, range, options.into(), Ordering::Less)
    }

    fn extreme_satisfying(versions: &[&str], range: &str, options: Options, wanted: Ordering) -> Option<String> {
        let range = Range::parse(range, options).ok()?;
        let mut best: Option<(Version, &str)> = None;

        for text in versions {
            let Ok(version) = Version::parse(text, range.options()) else {
                continue;
            };
            if !range.test(&version) {
                continue;
            }
            // Ties keep the first seen
            if best.as_ref().map_or(true, |(current, _)| version.compare(current) == wanted) {
                best = Some((version, text));
            }
        }

        best.map(|(_, text)| text.to_string())
    }

    /// Lowest version the range admits
    ///
    /// An invalid range is an error; a range nothing satisfies is `Ok(None)`.
    pub fn min_version<'a>(
        range: impl Into<RangeLike<'a>>,
        options: impl Into<Options>,
    ) -> Result<Option<Version>, SemverError> {
        let range = range.into().resolve(options.into())?;
        Ok(range::min_version(&range))
    }

    /// Normalized range text, `*` for a range matching everything
    pub fn valid_range(range: &str, options: impl Into<Options>) -> Option<String> {
        let range = Range::parse(range, options).ok()?;
        if range.is_any() {
            Some("*".to_string())
        } else {
            Some(range.to_string())
        }
    }

    /// Comparator values of every group
    pub fn to_comparators<'a>(
        range: impl Into<RangeLike<'a>>,
        options: impl Into<Options>,
    ) -> Result<Vec<Vec<String>>, SemverError> {
        let range = range.into().resolve(options.into())?;
        Ok(range
            .set()
            .iter()
            .map(|group| group.iter().map(|c| c.value().to_string()).collect())
            .collect())
    }

    /// Whether some version satisfies both ranges
    pub fn intersects<'a, 'b>(
        a: impl Into<RangeLike<'a>>,
        b: impl Into<RangeLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        let options = options.into();
        let a = a.into().resolve(options)?;
        let b = b.into().resolve(options)?;
        Ok(a.intersects(&b, options))
    }

    /// Whether every version satisfying `sub` also satisfies `dom`
    pub fn subset<'a, 'b>(
        sub: impl Into<RangeLike<'a>>,
        dom: impl Into<RangeLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        let options = options.into();
        let (sub, dom) = (sub.into(), dom.into());
        if let (RangeLike::Text(a), RangeLike::Text(b)) = (sub, dom) {
            if a == b {
                return Ok(true);
            }
        }
        let sub = sub.resolve(options)?;
        let dom = dom.resolve(options)?;
        Ok(range::subset(&sub, &dom, options))
    }

    /// Whether the version is above (`">"`) or below (`"<"`) every group of the range
    pub fn outside<'a, 'b>(
        version: impl Into<VersionLike<'a>>,
        range: impl Into<RangeLike<'b>>,
        hilo: &str,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        let options = options.into();
        let hilo: Hilo = hilo.parse()?;
        let version = version.into().resolve(options)?;
        let range = range.into().resolve(options)?;
        Ok(range::outside(&version, &range, hilo))
    }

    /// Greater than every version the range admits
    pub fn gtr<'a, 'b>(
        version: impl Into<VersionLike<'a>>,
        range: impl Into<RangeLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Self::outside(version, range, ">", options)
    }

    /// Less than every version the range admits
    pub fn ltr<'a, 'b>(
        version: impl Into<VersionLike<'a>>,
        range: impl Into<RangeLike<'b>>,
        options: impl Into<Options>,
    ) -> Result<bool, SemverError> {
        Self::outside(version, range, "<", options)
    }

    /// Shortest range text selecting the same versions from the list
    pub fn simplify_range<'a>(
        versions: &[&str],
        range: impl Into<RangeLike<'a>>,
        options: impl Into<Options>,
    ) -> Result<String, SemverError> {
        let range = range.into().resolve(options.into())?;
        Ok(range::simplify(versions, &range))
    }
}
