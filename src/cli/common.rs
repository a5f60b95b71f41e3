//! Arguments and helpers shared by the checks.

use crate::config::{CliOverrides, ReportSettings};
use crate::domain::{OutputFormat, EXIT_DATA_ERROR};
use crate::render::{listing, render, write_xunit_file, Finding, Summary};
use crate::vcs::GitCli;
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Git-managed path where search should happen
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Path of the configuration file (defaults to check-oldies.toml,
    /// .check-oldies.toml, pyproject.toml or check-oldies.y[a]ml in PATH)
    #[arg(long, value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Only list items that are too old
    #[arg(long)]
    pub only_old: bool,

    /// Do not colorize errors
    #[arg(long)]
    pub no_color: bool,

    /// Also write an xUnit report to this file
    #[arg(long, value_name = "FILE")]
    pub xunit_file: Option<PathBuf>,
}

impl CheckArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_format: self.format,
            only_old: self.only_old,
            no_color: self.no_color,
            xunit_file: self.xunit_file.clone(),
            ..Default::default()
        }
    }

    pub fn conf(&self) -> Option<&Path> {
        self.conf.as_deref()
    }
}

pub fn open_repository(path: &Path) -> Result<GitCli> {
    Ok(GitCli::open(path)?)
}

/// Print the findings in the configured format, then write the xUnit file
/// if one is configured.
pub fn emit(findings: &[&dyn Finding], report: &ReportSettings, summary: &Summary<'_>) -> Result<()> {
    let rendered = render(findings, report.output_format, summary, report.colorize_errors)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    if let Some(path) = &report.xunit_file {
        write_xunit_file(path, &summary.xunit, summary.error_message, &listing(findings))?;
    }
    Ok(())
}

pub fn exit_code(has_errors: bool) -> ExitCode {
    if has_errors {
        ExitCode::from(EXIT_DATA_ERROR)
    } else {
        ExitCode::SUCCESS
    }
}
