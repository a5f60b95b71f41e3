//! `branches` command implementation

use super::common::{emit, exit_code, open_repository, CheckArgs};
use crate::config::{load_tool_options, BranchConfig, BranchOptions};
use crate::render::{Finding, Summary, XunitNames};
use crate::scan::{get_branches, sort_branches};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct BranchesArgs {
    #[command(flatten)]
    pub common: CheckArgs,

    /// Maximum age in days allowed for a branch (default: 90)
    #[arg(long, value_name = "DAYS")]
    pub max_age: Option<i64>,

    /// Ignore branches that have no pull/merge request (needs host API access)
    #[arg(long)]
    pub ignore_branches_without_pull_request: bool,
}

const XUNIT: XunitNames =
    XunitNames { suite: "check-branches", case: "branches", class: "CheckBranches" };

pub fn run(args: BranchesArgs) -> Result<ExitCode> {
    let vcs = open_repository(&args.common.path)?;
    let options: BranchOptions =
        load_tool_options(&args.common.path, args.common.conf(), "check-branches")?;
    let mut overrides = args.common.overrides();
    overrides.max_age = args.max_age;
    overrides.ignore_branches_without_pull_request = args.ignore_branches_without_pull_request;
    let config = BranchConfig::build(overrides.apply_to_branches(options))?;

    let mut branches = get_branches(&vcs, &config, Local::now().date_naive())?;
    sort_branches(&mut branches);

    let has_errors = branches.iter().any(|branch| branch.is_old);
    let summary = Summary {
        ok_message: (!has_errors).then_some("OK: All branches are fresh."),
        error_message: has_errors.then_some("NOK: Some branches are too old."),
        xunit: XUNIT,
    };

    if config.report.only_old {
        branches.retain(|branch| branch.is_old);
    }
    let findings: Vec<&dyn Finding> = branches.iter().map(|branch| branch as &dyn Finding).collect();
    emit(&findings, &config.report, &summary)?;

    Ok(exit_code(has_errors))
}
