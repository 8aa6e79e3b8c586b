mod compression;
mod config;
mod semver_cmd;
mod tar;

use config::GcacheConfig;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "gcache")]
#[command(about = "Cache build paths as tar archives, choosing gzip or zstd")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print, filter, sort and increment semantic versions
    Semver(semver_cmd::SemverArgs),

    /// Show which compression method archives would use
    Compression(compression::CompressionArgs),

    /// Create or extract cache archives
    Tar {
        #[command(subcommand)]
        command: tar::TarCommands,
    },
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run() -> Result<i32> {
    let args = Args::parse();
    init_logger(args.verbose);

    // Load gcache.toml config if present
    let config = GcacheConfig::load_from_cwd()?.unwrap_or_default();

    match args.command {
        Commands::Semver(semver_args) => semver_cmd::execute(semver_args, &config),
        Commands::Compression(compression_args) => compression::execute(compression_args, &config),
        Commands::Tar { command } => tar::execute(command, &config),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            // Print the error chain for debugging
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
