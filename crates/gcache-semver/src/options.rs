//! Parse options shared by every operation

/// Flags recognized by parsing and matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Accept the relaxed grammar (leading `v`/`=`, leading zeros, missing `-`)
    pub loose: bool,
    /// Let prerelease versions satisfy ranges without a matching prerelease pin
    pub include_prerelease: bool,
    /// Coercion only: prefer the right-most coercible run
    pub rtl: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loose() -> Self {
        Options {
            loose: true,
            ..Self::default()
        }
    }

    pub fn include_prerelease() -> Self {
        Options {
            include_prerelease: true,
            ..Self::default()
        }
    }

    pub fn with_loose(mut self, loose: bool) -> Self {
        self.loose = loose;
        self
    }

    pub fn with_include_prerelease(mut self, include_prerelease: bool) -> Self {
        self.include_prerelease = include_prerelease;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Only the flags that change how a range segment parses
    pub(crate) fn parse_flags(&self) -> u8 {
        (self.include_prerelease as u8) | ((self.loose as u8) << 1)
    }
}

impl From<bool> for Options {
    /// `true` means loose, matching the shorthand most call sites use
    fn from(loose: bool) -> Self {
        Options {
            loose,
            ..Self::default()
        }
    }
}
