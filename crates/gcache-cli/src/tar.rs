//! Archive creation and extraction by shelling out to `tar`

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::compression::{self, CompressionMethod};
use crate::config::{CompressionConfig, GcacheConfig};

#[derive(Subcommand, Debug)]
pub enum TarCommands {
    /// Pack paths into an archive, picking the compression method
    Create(CreateArgs),

    /// Unpack an archive
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Archive file to write
    #[arg(long)]
    pub archive: PathBuf,

    /// Directory the paths are relative to
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Paths to include
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Archive file to read
    #[arg(long)]
    pub archive: PathBuf,

    /// Directory to extract into
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Method the archive was created with (detected when omitted)
    #[arg(long)]
    pub method: Option<CompressionMethod>,
}

fn compress_args(method: CompressionMethod, config: &CompressionConfig) -> Vec<String> {
    match method {
        CompressionMethod::Gzip => vec!["-z".to_string()],
        CompressionMethod::Zstd => vec![
            "--use-compress-program".to_string(),
            format!("{} {}", config.program, config.level_args),
        ],
    }
}

/// The `--long[=N]` window from the compression arguments, which the
/// decompressor must be given too
fn long_window(level_args: &str) -> Option<&str> {
    level_args
        .split_whitespace()
        .filter(|arg| *arg == "--long" || arg.starts_with("--long="))
        .last()
}

fn decompress_args(method: CompressionMethod, config: &CompressionConfig) -> Vec<String> {
    match method {
        CompressionMethod::Gzip => vec!["-z".to_string()],
        CompressionMethod::Zstd => {
            let program = match long_window(&config.level_args) {
                Some(window) => format!("{} -d {}", config.program, window),
                None => format!("{} -d", config.program),
            };
            vec!["--use-compress-program".to_string(), program]
        }
    }
}

pub fn create_args(
    archive: &Path,
    paths: &[String],
    cwd: &Path,
    method: CompressionMethod,
    config: &CompressionConfig,
) -> Vec<String> {
    let mut args = vec!["-c".to_string()];
    args.extend(compress_args(method, config));
    args.extend([
        "--posix".to_string(),
        "-P".to_string(),
        "-f".to_string(),
        archive.display().to_string(),
        "-C".to_string(),
        cwd.display().to_string(),
    ]);
    args.extend(paths.iter().cloned());
    args
}

pub fn extract_args(archive: &Path, cwd: &Path, method: CompressionMethod, config: &CompressionConfig) -> Vec<String> {
    let mut args = vec!["-x".to_string()];
    args.extend(decompress_args(method, config));
    args.extend([
        "-P".to_string(),
        "-f".to_string(),
        archive.display().to_string(),
        "-C".to_string(),
        cwd.display().to_string(),
    ]);
    args
}

fn run_tar(args: &[String]) -> Result<()> {
    log::debug!("tar {}", args.join(" "));

    let status = Command::new("tar")
        .args(args)
        .status()
        .context("Failed to execute tar")?;

    if !status.success() {
        bail!("tar exited with {}", status);
    }
    Ok(())
}

pub fn execute(command: TarCommands, config: &GcacheConfig) -> Result<i32> {
    let compression = &config.compression;

    match command {
        TarCommands::Create(args) => {
            let (method, _) = compression::detect(compression)?;
            println!("{} Using '{}' compression method.", style(">").green().bold(), method);
            run_tar(&create_args(&args.archive, &args.paths, &args.cwd, method, compression))?;
        }
        TarCommands::Extract(args) => {
            let method = match args.method {
                Some(method) => method,
                None => compression::detect(compression)?.0,
            };
            println!("{} Using '{}' compression method.", style(">").green().bold(), method);
            run_tar(&extract_args(&args.archive, &args.cwd, method, compression))?;
        }
    }

    Ok(0)
}
