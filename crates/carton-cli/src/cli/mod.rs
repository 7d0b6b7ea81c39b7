//! CLI for the carton static asset cache.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_checksum, run_clean, run_completions, run_ensure, run_hash_archive};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carton")]
#[command(about = "carton: integrity-verified static assets for WebAssembly apps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Make sure static assets are cached and match their pinned SHA-256.
    Ensure {
        /// Asset file name inside `static/` (or an entrypoint name such as `dev`).
        /// Without it, every asset listed in config.toml is checked.
        #[arg(requires = "sha256")]
        file: Option<String>,

        /// Expected SHA-256 of FILE as 64 hex characters.
        #[arg(long, requires = "file")]
        sha256: Option<String>,
    },

    /// Delete the cache directory.
    Clean,

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Pack built static files into an archive and print the digests to pin.
    HashArchive {
        /// Directory containing the built bundles.
        #[arg(default_value = "static")]
        dir: PathBuf,

        /// Where to write the archive.
        #[arg(long, short, default_value = "static.zip")]
        output: PathBuf,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Ensure { file, sha256 } => run_ensure(file, sha256).await?,
            CliCommand::Clean => run_clean().await?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::HashArchive { dir, output } => run_hash_archive(&dir, &output).await?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
