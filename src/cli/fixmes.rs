//! `fixmes` command implementation

use super::common::{emit, exit_code, open_repository, CheckArgs};
use crate::config::{load_tool_options, AnnotationConfig, AnnotationOptions};
use crate::render::{Finding, Summary, XunitNames};
use crate::scan::{get_annotations, get_orphan_future_tags, sort_annotations};
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct FixmesArgs {
    #[command(flatten)]
    pub common: CheckArgs,

    /// Maximum age in days allowed for an annotation (default: 180)
    #[arg(long, value_name = "DAYS")]
    pub max_age: Option<i64>,
}

const XUNIT: XunitNames = XunitNames { suite: "check-fixmes", case: "fixmes", class: "CheckFixmes" };

pub fn run(args: FixmesArgs) -> Result<ExitCode> {
    let vcs = open_repository(&args.common.path)?;
    let options: AnnotationOptions =
        load_tool_options(&args.common.path, args.common.conf(), "check-fixmes")?;
    let mut overrides = args.common.overrides();
    overrides.max_age = args.max_age;
    let config = AnnotationConfig::build(overrides.apply_to_annotations(options))?;

    let mut annotations = get_annotations(&vcs, &config, Utc::now())?;
    sort_annotations(&mut annotations);
    let orphans = get_orphan_future_tags(&vcs, &config)?;

    let has_old_annotations = annotations.iter().any(|annotation| annotation.is_old);
    let has_errors = has_old_annotations || !orphans.is_empty();
    let summary = Summary {
        ok_message: match (has_errors, annotations.is_empty()) {
            (true, _) => None,
            (false, true) => Some("OK: No annotations were found."),
            (false, false) => Some("OK: All annotations are fresh."),
        },
        error_message: has_errors
            .then_some("NOK: Some annotations are too old, or there are orphan FUTURE tags."),
        xunit: XUNIT,
    };

    if config.report.only_old {
        annotations.retain(|annotation| annotation.is_old);
    }
    let findings: Vec<&dyn Finding> = annotations
        .iter()
        .map(|annotation| annotation as &dyn Finding)
        .chain(orphans.iter().map(|orphan| orphan as &dyn Finding))
        .collect();
    emit(&findings, &config.report, &summary)?;

    Ok(exit_code(has_errors))
}
