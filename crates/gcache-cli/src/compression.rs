//! Compression method selection for cache archives

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use gcache_semver::{Options, Semver};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::process::Command;
use std::str::FromStr;

use crate::config::{CompressionConfig, GcacheConfig};

lazy_static! {
    // Tool banners look like `*** zstd command line interface 64-bits v1.5.2, by Yann Collet ***`
    static ref BANNER_VERSION: Regex = Regex::new(r"v([0-9]+.[0-9]+\.[0-9]+)").unwrap();
}

/// How a cache archive is compressed
///
/// The string form is what gets stored as the `cache-action-compression-method`
/// object metadata value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Gzip,
    Zstd,
}

impl CompressionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::Gzip => "gzip",
            CompressionMethod::Zstd => "zstd",
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompressionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gzip" => Ok(CompressionMethod::Gzip),
            "zstd" => Ok(CompressionMethod::Zstd),
            _ => Err(format!("unknown compression method '{}' (expected gzip or zstd)", s)),
        }
    }
}

/// First `v<major>.<minor>.<patch>` in a tool's output, without the `v`
pub fn extract_semver(text: &str) -> Option<String> {
    BANNER_VERSION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run `<program> --version` and pull the version out of its banner
pub fn probe(program: &str) -> Option<String> {
    let output = match Command::new(program).arg("--version").output() {
        Ok(output) => output,
        Err(e) => {
            log::warn!("{} not found: {}", program, e);
            return None;
        }
    };

    if !output.status.success() {
        log::warn!("{} --version exited with {}", program, output.status);
        return None;
    }

    let version = extract_semver(&String::from_utf8_lossy(&output.stdout));
    log::debug!("{} reports version {:?}", program, version);
    version
}

/// Pick zstd when the detected release supports `--long`, gzip otherwise
///
/// `minimum` must be a valid version; a detected version that does not
/// parse is treated like a missing tool.
pub fn select_compression(zstd_version: Option<&str>, minimum: &str) -> Result<CompressionMethod> {
    if Semver::valid(minimum, Options::default()).is_none() {
        bail!("Invalid minimum zstd version '{}'", minimum);
    }

    let Some(version) = zstd_version else {
        log::warn!("zstd not available");
        return Ok(CompressionMethod::Gzip);
    };

    match Semver::lt(version, minimum, Options::default()) {
        Ok(false) => Ok(CompressionMethod::Zstd),
        Ok(true) => {
            log::warn!("zstd {} does not support long (needs {})", version, minimum);
            Ok(CompressionMethod::Gzip)
        }
        Err(e) => {
            log::warn!("zstd reported an unusable version '{}': {}", version, e);
            Ok(CompressionMethod::Gzip)
        }
    }
}

/// Probe the configured program and select a method
pub fn detect(config: &CompressionConfig) -> Result<(CompressionMethod, Option<String>)> {
    let version = probe(&config.program);
    let method = select_compression(version.as_deref(), &config.minimum_version)?;
    Ok((method, version))
}

#[derive(Args, Debug)]
pub struct CompressionArgs {
    /// Compression program to probe (overrides gcache.toml)
    #[arg(long)]
    pub program: Option<String>,

    /// Oldest acceptable zstd release (overrides gcache.toml)
    #[arg(long, value_name = "VERSION")]
    pub minimum_version: Option<String>,
}

pub fn execute(args: CompressionArgs, config: &GcacheConfig) -> Result<i32> {
    let compression = CompressionConfig {
        program: args.program.unwrap_or_else(|| config.compression.program.clone()),
        minimum_version: args
            .minimum_version
            .unwrap_or_else(|| config.compression.minimum_version.clone()),
        level_args: config.compression.level_args.clone(),
    };

    let (method, version) = detect(&compression)?;

    println!("{} {}", style("Method:").cyan().bold(), method);
    match version {
        Some(version) => println!("{} {}", style("zstd:").cyan().bold(), version),
        None => println!("{} {}", style("zstd:").cyan().bold(), style("not available").dim()),
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_semver() {
        assert_eq!(extract_semver("v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(
            extract_semver("*** zstd command line interface 64-bits v1.5.2, by Yann Collet ***\n"),
            Some("1.5.2".to_string())
        );
        assert_eq!(extract_semver("foo"), None);
        assert_eq!(extract_semver("1.5.2"), None);
    }

    #[test]
    fn test_select_compression() {
        assert_eq!(select_compression(None, "1.3.2").unwrap(), CompressionMethod::Gzip);
        assert_eq!(select_compression(Some("1.3.1"), "1.3.2").unwrap(), CompressionMethod::Gzip);
        assert_eq!(select_compression(Some("1.3.2"), "1.3.2").unwrap(), CompressionMethod::Zstd);
        assert_eq!(select_compression(Some("1.5.2"), "1.3.2").unwrap(), CompressionMethod::Zstd);
        assert_eq!(select_compression(Some("1x5.2"), "1.3.2").unwrap(), CompressionMethod::Gzip);
        assert!(select_compression(Some("1.5.2"), "latest").is_err());
    }

    #[test]
    fn test_method_strings() {
        assert_eq!(CompressionMethod::Gzip.to_string(), "gzip");
        assert_eq!("zstd".parse::<CompressionMethod>(), Ok(CompressionMethod::Zstd));
        assert!("xz".parse::<CompressionMethod>().is_err());
    }

    #[test]
    fn test_probe_missing_program() {
        assert_eq!(probe("gcache-test-no-such-program"), None);
    }
}
