use anyhow::{Context, Result};
use gcache_semver::Options;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "gcache.toml";

/// The gcache configuration file structure (gcache.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GcacheConfig {
    /// Defaults for version parsing and matching
    pub semver: SemverConfig,

    /// Compression tool settings
    pub compression: CompressionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SemverConfig {
    pub loose: bool,
    pub include_prerelease: bool,
}

/// Compression tool configuration
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompressionConfig {
    /// Program probed with `--version` and used by tar
    pub program: String,

    /// Oldest release that understands `--long`
    pub minimum_version: String,

    /// Extra arguments passed when compressing
    pub level_args: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            program: "zstd".to_string(),
            minimum_version: "1.3.2".to_string(),
            level_args: "-T0 --long=30".to_string(),
        }
    }
}

impl SemverConfig {
    /// Merge with command line flags; a flag can only switch an option on
    pub fn options(&self, loose: bool, include_prerelease: bool) -> Options {
        Options::new()
            .with_loose(self.loose || loose)
            .with_include_prerelease(self.include_prerelease || include_prerelease)
    }
}

impl GcacheConfig {
    /// Load configuration from gcache.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let Some(config_path) = Self::find(start_dir) else {
            return Ok(None);
        };

        log::debug!("Reading {}", config_path.display());
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: GcacheConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(Some(config))
    }

    /// Load configuration by searching upward from the current working directory
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }

    fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: GcacheConfig = toml::from_str("").unwrap();
        assert!(!config.semver.loose);
        assert!(!config.semver.include_prerelease);
        assert_eq!(config.compression.program, "zstd");
        assert_eq!(config.compression.minimum_version, "1.3.2");
        assert_eq!(config.compression.level_args, "-T0 --long=30");
    }

    #[test]
    fn test_parse_semver_section() {
        let toml = r#"
[semver]
loose = true
include-prerelease = true
"#;
        let config: GcacheConfig = toml::from_str(toml).unwrap();
        assert!(config.semver.loose);
        assert!(config.semver.include_prerelease);
    }

    #[test]
    fn test_parse_compression_section() {
        let toml = r#"
[compression]
program = "/usr/local/bin/zstd"
minimum-version = "1.4.0"
"#;
        let config: GcacheConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.compression.program, "/usr/local/bin/zstd");
        assert_eq!(config.compression.minimum_version, "1.4.0");
        assert_eq!(config.compression.level_args, "-T0 --long=30");
    }

    #[test]
    fn test_flags_switch_options_on() {
        let config = SemverConfig::default();
        assert_eq!(config.options(false, false), Options::default());
        assert!(config.options(true, false).loose);

        let config = SemverConfig {
            loose: true,
            include_prerelease: false,
        };
        let options = config.options(false, true);
        assert!(options.loose);
        assert!(options.include_prerelease);
    }

    #[test]
    fn test_load_searches_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[semver]\nloose = true\n").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = GcacheConfig::load(&nested).unwrap().unwrap();
        assert!(config.semver.loose);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[semver\n").unwrap();

        let err = GcacheConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
