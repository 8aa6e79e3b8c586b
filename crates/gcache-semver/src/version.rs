//! A single parsed semantic version

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::SemverError;
use crate::grammar::{FULL, LOOSE, MAX_LENGTH, MAX_SAFE_INTEGER, PRERELEASE_EXACT, PRERELEASE_EXACT_LOOSE};
use crate::identifier::{compare_build_lists, compare_identifier_lists, compare_identifiers, Identifier};
use crate::options::Options;

/// Kinds of version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
    PreMajor,
    PreMinor,
    PrePatch,
    PreRelease,
    /// Bump (or start) the prerelease counter only
    Pre,
    /// Drop the prerelease of a prerelease version
    Release,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::PreMajor => "premajor",
            ReleaseType::PreMinor => "preminor",
            ReleaseType::PrePatch => "prepatch",
            ReleaseType::PreRelease => "prerelease",
            ReleaseType::Pre => "pre",
            ReleaseType::Release => "release",
        }
    }

    fn is_pre(&self) -> bool {
        matches!(
            self,
            ReleaseType::PreMajor
                | ReleaseType::PreMinor
                | ReleaseType::PrePatch
                | ReleaseType::PreRelease
                | ReleaseType::Pre
        )
    }
}

impl FromStr for ReleaseType {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            "premajor" => Ok(ReleaseType::PreMajor),
            "preminor" => Ok(ReleaseType::PreMinor),
            "prepatch" => Ok(ReleaseType::PrePatch),
            "prerelease" => Ok(ReleaseType::PreRelease),
            "pre" => Ok(ReleaseType::Pre),
            "release" => Ok(ReleaseType::Release),
            _ => Err(SemverError::InvalidRelease(s.to_string())),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Number appended after a prerelease identifier by `pre*` increments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PrereleaseBase {
    #[default]
    Zero,
    One,
    /// Use the identifier alone, e.g. `1.2.4-dev`
    Omit,
}

impl PrereleaseBase {
    fn value(&self) -> u64 {
        match self {
            PrereleaseBase::One => 1,
            PrereleaseBase::Zero | PrereleaseBase::Omit => 0,
        }
    }
}

impl FromStr for PrereleaseBase {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(PrereleaseBase::Zero),
            "1" => Ok(PrereleaseBase::One),
            "false" => Ok(PrereleaseBase::Omit),
            _ => Err(SemverError::InvalidIdentifier(s.to_string())),
        }
    }
}

/// A parsed version: `major.minor.patch[-prerelease][+build]`
///
/// Equality, ordering and hashing ignore build metadata.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Version {
    /// A release version with no prerelease or build
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a version, failing on anything the grammar rejects
    pub fn parse(text: &str, options: impl Into<Options>) -> Result<Self, SemverError> {
        let options = options.into();

        if text.len() > MAX_LENGTH {
            return Err(SemverError::TooLong);
        }

        let re = if options.loose { &*LOOSE } else { &*FULL };
        let caps = re
            .captures(text.trim())
            .ok_or_else(|| SemverError::InvalidVersion(text.to_string()))?;

        let major = parse_component(&caps[1], "major")?;
        let minor = parse_component(&caps[2], "minor")?;
        let patch = parse_component(&caps[3], "patch")?;

        let pre = caps
            .get(4)
            .map(|m| m.as_str().split('.').map(Identifier::new).collect())
            .unwrap_or_default();
        let build = caps
            .get(5)
            .map(|m| m.as_str().split('.').map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Version {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }

    /// The precedence-relevant form, `major.minor.patch[-prerelease]`
    pub fn version(&self) -> String {
        let mut out = format!("{}.{}.{}", self.major, self.minor, self.patch);
        if !self.pre.is_empty() {
            out.push('-');
            out.push_str(&join(&self.pre));
        }
        out
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Whether `major.minor.patch` equals the other version's
    pub fn same_tuple(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    pub fn compare(&self, other: &Version) -> Ordering {
        self.compare_main(other).then_with(|| self.compare_pre(other))
    }

    /// Compare `major.minor.patch` only
    pub fn compare_main(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }

    /// Compare prereleases: a release sorts above any prerelease of it
    pub fn compare_pre(&self, other: &Version) -> Ordering {
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, false) => compare_identifier_lists(&self.pre, &other.pre),
        }
    }

    /// Compare build metadata with the prerelease identifier rules
    pub fn compare_build(&self, other: &Version) -> Ordering {
        compare_build_lists(&self.build, &other.build)
    }

    /// Increment in place with the default identifier base
    pub fn inc(&mut self, release: ReleaseType, identifier: Option<&str>) -> Result<&mut Self, SemverError> {
        self.inc_with(release, identifier, PrereleaseBase::Zero, Options::default())
    }

    /// Increment in place; on error the version is left untouched
    pub fn inc_with(
        &mut self,
        release: ReleaseType,
        identifier: Option<&str>,
        base: PrereleaseBase,
        options: Options,
    ) -> Result<&mut Self, SemverError> {
        let mut next = self.clone();
        next.apply_inc(release, identifier.filter(|id| !id.is_empty()), base, options)?;
        *self = next;
        Ok(self)
    }

    fn apply_inc(
        &mut self,
        release: ReleaseType,
        identifier: Option<&str>,
        base: PrereleaseBase,
        options: Options,
    ) -> Result<(), SemverError> {
        if release.is_pre() {
            if identifier.is_none() && base == PrereleaseBase::Omit {
                return Err(SemverError::EmptyIdentifier);
            }
            if let Some(id) = identifier {
                let re = if options.loose { &*PRERELEASE_EXACT_LOOSE } else { &*PRERELEASE_EXACT };
                let valid = re
                    .captures(&format!("-{}", id))
                    .and_then(|caps| caps.get(1))
                    .map_or(false, |m| m.as_str() == id);
                if !valid {
                    return Err(SemverError::InvalidIdentifier(id.to_string()));
                }
            }
        }

        match release {
            ReleaseType::PreMajor => {
                self.pre.clear();
                self.patch = 0;
                self.minor = 0;
                self.major += 1;
                self.apply_inc(ReleaseType::Pre, identifier, base, options)?;
            }
            ReleaseType::PreMinor => {
                self.pre.clear();
                self.patch = 0;
                self.minor += 1;
                self.apply_inc(ReleaseType::Pre, identifier, base, options)?;
            }
            ReleaseType::PrePatch => {
                // Clearing first makes the patch step below always bump
                self.pre.clear();
                self.apply_inc(ReleaseType::Patch, identifier, base, options)?;
                self.apply_inc(ReleaseType::Pre, identifier, base, options)?;
            }
            ReleaseType::PreRelease => {
                if self.pre.is_empty() {
                    self.apply_inc(ReleaseType::Patch, identifier, base, options)?;
                }
                self.apply_inc(ReleaseType::Pre, identifier, base, options)?;
            }
            ReleaseType::Release => {
                if self.pre.is_empty() {
                    return Err(SemverError::NotAPrerelease(self.to_string()));
                }
                self.pre.clear();
            }
            ReleaseType::Major => {
                // 1.0.0-5 releases to 1.0.0, it does not skip to 2.0.0
                if self.minor != 0 || self.patch != 0 || self.pre.is_empty() {
                    self.major += 1;
                }
                self.minor = 0;
                self.patch = 0;
                self.pre.clear();
            }
            ReleaseType::Minor => {
                if self.patch != 0 || self.pre.is_empty() {
                    self.minor += 1;
                }
                self.patch = 0;
                self.pre.clear();
            }
            ReleaseType::Patch => {
                if self.pre.is_empty() {
                    self.patch += 1;
                }
                self.pre.clear();
            }
            ReleaseType::Pre => self.bump_pre(identifier, base)?,
        }

        Ok(())
    }

    fn bump_pre(&mut self, identifier: Option<&str>, base: PrereleaseBase) -> Result<(), SemverError> {
        let start = base.value();

        if self.pre.is_empty() {
            self.pre = vec![Identifier::Numeric(start)];
        } else {
            match self.pre.iter().rposition(Identifier::is_numeric) {
                Some(i) => {
                    if let Identifier::Numeric(n) = &mut self.pre[i] {
                        *n += 1;
                    }
                }
                None => {
                    if base == PrereleaseBase::Omit && identifier == Some(join(&self.pre).as_str()) {
                        return Err(SemverError::DuplicateIdentifier);
                    }
                    self.pre.push(Identifier::Numeric(start));
                }
            }
        }

        if let Some(id) = identifier {
            let replacement = if base == PrereleaseBase::Omit {
                vec![Identifier::new(id)]
            } else {
                vec![Identifier::new(id), Identifier::Numeric(start)]
            };

            let same_leading = self
                .pre
                .first()
                .map_or(false, |first| compare_identifiers(&first.to_string(), id) == Ordering::Equal);

            if !same_leading || !self.pre.get(1).map_or(false, Identifier::is_numeric) {
                self.pre = replacement;
            }
        }

        Ok(())
    }
}

fn parse_component(digits: &str, component: &'static str) -> Result<u64, SemverError> {
    digits
        .parse::<u64>()
        .ok()
        .filter(|n| *n <= MAX_SAFE_INTEGER)
        .ok_or(SemverError::ComponentTooLarge { component })
}

fn join<T: fmt::Display>(ids: &[T]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(".")
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version())?;
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SemverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s, Options::default())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre.hash(state);
    }
}
