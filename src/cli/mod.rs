//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::store::sqlite::DEFAULT_TABLE;

/// OtpVault CLI: at-rest encryption for stored TOTP secrets.
#[derive(Parser)]
#[command(
    name = "otpvault",
    about = "Encrypt stored TOTP secrets and backup codes at rest",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt legacy plaintext TOTP fields in place
    Migrate {
        /// Path to the application SQLite database
        #[arg(long, env = "OTPVAULT_DB")]
        db: PathBuf,

        /// Table holding the TOTP columns
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,

        /// Classify and transform without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Print the summary as JSON (for CI)
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and run the encryption self-test
    Check,

    /// Generate a passphrase suitable for OTPVAULT_PASSPHRASE
    Keygen,

    /// Show past migration runs
    History {
        /// Path to the application SQLite database
        #[arg(long, env = "OTPVAULT_DB")]
        db: PathBuf,

        /// Number of runs to show
        #[arg(long, default_value = "20")]
        last: usize,
    },
}
