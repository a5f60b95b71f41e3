//! Core data types shared by the scanners, renderers and the notifier.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

/// Lines carrying this token are never reported, whatever they contain.
pub const IGNORE_PRAGMA: &str = "no-check-fixmes";

/// Exit status used when stale items are found (`EX_DATAERR` from sysexits.h).
pub const EXIT_DATA_ERROR: u8 = 65;

/// Output format selected on the command line or in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Xunit,
}

/// An annotation (TODO, FIXME, ...) found on a line of a tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub path: String,
    pub line_no: u32,
    pub line_content: String,
    pub age: i64,
    pub assignee: String,
    pub is_old: bool,
}

/// An occurrence of a future tag that is never declared next to an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureTag {
    pub path: String,
    pub line_no: u32,
    pub tag: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub state: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub repo: String,
    pub name: String,
    pub url: String,
    pub author: String,
    pub age: i64,
    pub is_old: bool,
    pub pull_request: Option<PullRequestInfo>,
}

impl BranchInfo {
    /// Branch name, browse URL and, if any, the linked pull/merge request.
    pub fn name_and_details(&self) -> String {
        let mut details = format!("{} ({})", self.name, self.url);
        if let Some(pr) = &self.pull_request {
            details.push_str(&format!(
                ", linked to {} PR/MR #{} ({})",
                pr.state, pr.number, pr.url
            ));
        }
        details
    }
}

/// Whole days elapsed between `then` and `now`, rounded towards the past.
pub fn age_in_days(now: DateTime<Utc>, then: DateTime<FixedOffset>) -> i64 {
    let seconds = (now - then.with_timezone(&Utc)).num_seconds();
    seconds.div_euclid(86_400)
}

/// Calendar days between the commit's own date and today.
pub fn age_in_calendar_days(today: NaiveDate, then: DateTime<FixedOffset>) -> i64 {
    (today - then.date_naive()).num_days()
}
