//! Command-line interface for check-oldies
//!
//! Provides `fixmes`, `future-tags`, `branches` and `forget-me-not`
//! subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod branches;
mod common;
mod fixmes;
mod forget_me_not;
mod future_tags;

/// Report old annotations, orphan FUTURE tags and unattended branches
#[derive(Parser)]
#[command(name = "check-oldies")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check your code for unattended annotations and orphan FUTURE tags
    Fixmes(fixmes::FixmesArgs),

    /// Check your code for orphan FUTURE tags
    FutureTags(future_tags::FutureTagsArgs),

    /// Check your repository for unattended branches
    Branches(branches::BranchesArgs),

    /// Warn about annotations and branches that will soon be too old
    ForgetMeNot(forget_me_not::ForgetMeNotArgs),
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Fixmes(args) => fixmes::run(args),
        Commands::FutureTags(args) => future_tags::run(args),
        Commands::Branches(args) => branches::run(args),
        Commands::ForgetMeNot(args) => forget_me_not::run(args),
    }
}
