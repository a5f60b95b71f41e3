//! Configuration loading and merging
//!
//! Each tool reads its own table from a config file; command-line flags
//! override file values, which override built-in defaults. Patterns and
//! credentials are resolved once, when the typed configuration is built.

use crate::domain::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;

pub mod annotations;
pub mod branches;
pub mod loader;
pub mod merge;
pub mod notifier;

pub use annotations::{AnnotationConfig, AnnotationOptions};
pub use branches::{BranchConfig, BranchOptions, HostApiAccess, HostApiAccessOptions};
pub use loader::{load_document, load_tool_options};
pub use merge::CliOverrides;
pub use notifier::{NotifierConfig, NotifierOptions, Output, RecipientConfig};

/// Presentation options shared by every check, as read from a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub colorize_errors: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub only_old: Option<bool>,
    pub xunit_file: Option<PathBuf>,
}

/// Resolved presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub colorize_errors: bool,
    pub output_format: OutputFormat,
    pub only_old: bool,
    pub xunit_file: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            colorize_errors: true,
            output_format: OutputFormat::Text,
            only_old: false,
            xunit_file: None,
        }
    }
}

impl From<ReportOptions> for ReportSettings {
    fn from(options: ReportOptions) -> Self {
        let defaults = ReportSettings::default();
        Self {
            colorize_errors: options.colorize_errors.unwrap_or(defaults.colorize_errors),
            output_format: options.output_format.unwrap_or(defaults.output_format),
            only_old: options.only_old.unwrap_or(defaults.only_old),
            xunit_file: options.xunit_file,
        }
    }
}
