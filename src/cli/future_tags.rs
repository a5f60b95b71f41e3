//! `future-tags` command implementation

use super::common::{emit, exit_code, open_repository, CheckArgs};
use crate::config::{load_tool_options, AnnotationConfig, AnnotationOptions};
use crate::render::{Finding, Summary, XunitNames};
use crate::scan::get_orphan_future_tags;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct FutureTagsArgs {
    #[command(flatten)]
    pub common: CheckArgs,
}

const XUNIT: XunitNames =
    XunitNames { suite: "check-future-tags", case: "future-tags", class: "CheckFutureTags" };

pub fn run(args: FutureTagsArgs) -> Result<ExitCode> {
    let vcs = open_repository(&args.common.path)?;
    let options: AnnotationOptions =
        load_tool_options(&args.common.path, args.common.conf(), "check-future-tags")?;
    let config = AnnotationConfig::build(args.common.overrides().apply_to_annotations(options))?;

    let orphans = get_orphan_future_tags(&vcs, &config)?;
    let has_errors = !orphans.is_empty();
    let summary = Summary {
        ok_message: (!has_errors).then_some("OK: No orphan FUTURE tags were found."),
        error_message: has_errors.then_some("NOK: There are orphan FUTURE tags."),
        xunit: XUNIT,
    };

    let findings: Vec<&dyn Finding> = orphans.iter().map(|orphan| orphan as &dyn Finding).collect();
    emit(&findings, &config.report, &summary)?;

    Ok(exit_code(has_errors))
}
