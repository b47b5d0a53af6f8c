//! Maintainer CLI for the model registry.
//!
//! Wraps the `mods-registry` library with the commands registry maintainers
//! run by hand and in CI: manifest validation, index building, link-rot
//! checking, and hash verification/resolution.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mods-registry")]
#[command(about = "Model registry maintenance tools")]
struct Cli {
    /// Registry checkout root (the directory containing manifests/)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate manifest files against the registry schema
    Validate {
        /// Specific manifest files (default: the whole corpus)
        files: Vec<PathBuf>,
    },
    /// Build index.json from all manifests
    Build {
        /// Output path (default: <root>/index.json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Treat placeholder hashes as errors (implied by CI environments)
        #[arg(long)]
        strict: bool,
    },
    /// Check all manifest URLs for link rot
    CheckLinks {
        /// Write a JSON report to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Download a manifest's files and verify their SHA256 hashes
    VerifyHashes {
        /// Manifest file to verify
        manifest: PathBuf,
        /// Only verify this variant id
        #[arg(long)]
        variant: Option<String>,
    },
    /// Resolve VERIFY_ placeholders from HuggingFace metadata
    FetchHashes {
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Specific manifest files (default: the whole corpus)
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let exit_code = match cli.command {
        Command::Validate { files } => commands::validate::run(&cli.root, &files)?,
        Command::Build { output, strict } => {
            // CI marker or explicit flag both opt in to the strict policy.
            let strict = strict
                || std::env::var_os("CI").is_some()
                || std::env::var_os("GITHUB_ACTIONS").is_some();
            commands::build::run(&cli.root, output.as_deref(), strict)?
        }
        Command::CheckLinks { output } => {
            commands::links::run(&cli.root, output.as_deref()).await?
        }
        Command::VerifyHashes { manifest, variant } => {
            commands::hashes::verify(&manifest, variant.as_deref()).await?
        }
        Command::FetchHashes { dry_run, files } => {
            commands::hashes::fetch(&cli.root, &files, dry_run).await?
        }
    };

    std::process::exit(exit_code);
}
