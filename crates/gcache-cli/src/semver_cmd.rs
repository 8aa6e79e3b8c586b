//! Semver command - filter, sort and increment versions from the command line.

use anyhow::Result;
use clap::Args;
use console::style;
use gcache_semver::{Options, PrereleaseBase, ReleaseType, Semver, Version};

use crate::config::GcacheConfig;

#[derive(Args, Debug)]
pub struct SemverArgs {
    /// Versions to check
    #[arg(value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Keep only versions satisfying the range (can be used multiple times)
    #[arg(short = 'r', long = "range", value_name = "RANGE", action = clap::ArgAction::Append)]
    pub ranges: Vec<String>,

    /// Increment a single version by the given level (default: patch)
    #[arg(
        short = 'i',
        long = "increment",
        value_name = "LEVEL",
        num_args = 0..=1,
        default_missing_value = "patch"
    )]
    pub increment: Option<String>,

    /// Identifier used by prerelease increments
    #[arg(long = "preid", value_name = "ID")]
    pub preid: Option<String>,

    /// Base number for the prerelease identifier: 0, 1 or false
    #[arg(short = 'n', value_name = "BASE")]
    pub identifier_base: Option<PrereleaseBase>,

    /// Interpret versions and ranges loosely
    #[arg(short = 'l', long)]
    pub loose: bool,

    /// Let prerelease versions satisfy ranges
    #[arg(short = 'p', long)]
    pub include_prerelease: bool,

    /// Coerce each argument into a version before checking it
    #[arg(short = 'c', long)]
    pub coerce: bool,

    /// Coerce from the right-most match
    #[arg(long, overrides_with = "ltr")]
    pub rtl: bool,

    /// Coerce from the left-most match (default)
    #[arg(long, overrides_with = "rtl")]
    pub ltr: bool,

    /// Print in descending order
    #[arg(long)]
    pub reverse: bool,
}

/// Why no versions were printed
#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    NoneValid,
    NoneSatisfy,
    IncrementNeedsSingleVersion,
}

impl SemverArgs {
    /// Split the `-i` value into a release level and the version list.
    ///
    /// `-i` only consumes its value when it names a release level, so in
    /// `-i 1.2.3` the value is a version and the level is `patch`.
    fn release_and_versions(&self) -> (Option<ReleaseType>, Vec<String>) {
        let Some(value) = &self.increment else {
            return (None, self.versions.clone());
        };
        match value.parse::<ReleaseType>() {
            Ok(release) => (Some(release), self.versions.clone()),
            Err(_) => {
                let mut versions = Vec::with_capacity(self.versions.len() + 1);
                versions.push(value.clone());
                versions.extend(self.versions.iter().cloned());
                (Some(ReleaseType::Patch), versions)
            }
        }
    }
}

/// Run the filter/sort/increment pipeline, returning the lines to print
pub fn select(args: &SemverArgs, options: Options) -> Result<Vec<String>, Rejection> {
    let (increment, versions) = args.release_and_versions();
    let versions: Vec<String> = versions
        .iter()
        .map(|v| {
            if args.coerce {
                Semver::coerce(v, options)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| v.clone())
            } else {
                v.clone()
            }
        })
        // Inputs are always validated strictly; loose only affects ranges
        .filter(|v| Semver::valid(v, Options::default()).is_some())
        .collect();

    if versions.is_empty() {
        return Err(Rejection::NoneValid);
    }
    if increment.is_some() && (versions.len() != 1 || !args.ranges.is_empty()) {
        return Err(Rejection::IncrementNeedsSingleVersion);
    }

    let mut survivors = versions;
    for range in &args.ranges {
        survivors.retain(|v| Semver::satisfies(v.as_str(), range.as_str(), options));
        if survivors.is_empty() {
            return Err(Rejection::NoneSatisfy);
        }
    }

    let mut cleaned: Vec<Version> = survivors
        .iter()
        .filter_map(|v| Semver::parse(v.trim().trim_start_matches(['=', 'v']), options))
        .collect();
    cleaned.sort_by(|a, b| {
        let ord = a.compare(b);
        if args.reverse {
            ord.reverse()
        } else {
            ord
        }
    });

    let Some(release) = increment else {
        return Ok(cleaned.iter().map(Version::version).collect());
    };

    let base = args.identifier_base.unwrap_or_default();
    let mut lines = Vec::with_capacity(cleaned.len());
    for mut version in cleaned {
        // A failed increment prints nothing for that version
        if version.inc_with(release, args.preid.as_deref(), base, options).is_ok() {
            lines.push(version.version());
        }
    }
    Ok(lines)
}

pub fn execute(args: SemverArgs, config: &GcacheConfig) -> Result<i32> {
    let options = config
        .semver
        .options(args.loose, args.include_prerelease)
        .with_rtl(args.rtl && !args.ltr);

    match select(&args, options) {
        Ok(lines) => {
            for line in &lines {
                println!("{}", line);
            }
            Ok(if lines.is_empty() { 1 } else { 0 })
        }
        Err(Rejection::IncrementNeedsSingleVersion) => {
            eprintln!(
                "{} --increment can only be used on a single version with no range",
                style("Error:").red().bold()
            );
            Ok(1)
        }
        Err(rejection) => {
            log::debug!("no versions printed: {:?}", rejection);
            Ok(1)
        }
    }
}
