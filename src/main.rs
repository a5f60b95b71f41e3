//! check-oldies: keep an eye on aging TODOs, FUTURE tags and branches
//!
//! Scans a Git working copy for annotations that have been around for too
//! long, FUTURE tags that nothing declares, and remote branches nobody
//! touched in a while.

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    check_oldies::cli::run()
}
