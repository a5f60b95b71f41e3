//! Command-line overrides layered on top of file options.

use super::{AnnotationOptions, BranchOptions, ReportOptions};
use crate::domain::OutputFormat;
use std::path::PathBuf;

/// Values given on the command line. `None`/`false` leave the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_age: Option<i64>,
    pub output_format: Option<OutputFormat>,
    pub only_old: bool,
    pub no_color: bool,
    pub xunit_file: Option<PathBuf>,
    pub ignore_branches_without_pull_request: bool,
}

impl CliOverrides {
    fn apply_report(&self, report: &mut ReportOptions) {
        if let Some(format) = self.output_format {
            report.output_format = Some(format);
        }
        if self.only_old {
            report.only_old = Some(true);
        }
        if self.no_color {
            report.colorize_errors = Some(false);
        }
        if let Some(path) = &self.xunit_file {
            report.xunit_file = Some(path.clone());
        }
    }

    pub fn apply_to_annotations(&self, mut options: AnnotationOptions) -> AnnotationOptions {
        if let Some(max_age) = self.max_age {
            options.max_age = Some(max_age);
        }
        self.apply_report(&mut options.report);
        options
    }

    pub fn apply_to_branches(&self, mut options: BranchOptions) -> BranchOptions {
        if let Some(max_age) = self.max_age {
            options.max_age = Some(max_age);
        }
        if self.ignore_branches_without_pull_request {
            options.ignore_branches_without_pull_request = Some(true);
        }
        self.apply_report(&mut options.report);
        options
    }
}
