//! Version-control queries.
//!
//! The scanners only talk to a [`Vcs`]; [`GitCli`] answers those queries
//! against a Git working copy.

use crate::error::VcsError;
use chrono::{DateTime, FixedOffset};

pub mod command;
pub mod git;

#[cfg(test)]
pub mod fake;

pub use git::GitCli;

/// A `git grep`-like search over tracked, non-binary files.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    /// POSIX extended regular expression.
    pub pattern: &'a str,
    pub ignore_case: bool,
    /// Return each matched substring instead of the whole line.
    pub only_matching: bool,
    /// Drop lines that contain the ignore pragma.
    pub skip_ignore_pragma: bool,
    /// Path globs excluded from the search.
    pub excludes: &'a [String],
}

/// One matching line (or one matched substring with `only_matching`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub line_no: u32,
    pub text: String,
}

/// Last committer of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blame {
    pub committer_email: String,
    pub committed_at: DateTime<FixedOffset>,
}

/// Most recent commit of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCommit {
    pub author_email: String,
    pub committed_at: DateTime<FixedOffset>,
}

pub trait Vcs: Sync {
    /// Search tracked files. No match is an empty result, not an error.
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, VcsError>;

    fn blame(&self, path: &str, line_no: u32) -> Result<Blame, VcsError>;

    /// Remote-tracking branches as `remote/name`. Symbolic refs are
    /// reported as `remote/name -> target`.
    fn list_remote_branches(&self) -> Result<Vec<String>, VcsError>;

    fn last_commit(&self, branch_ref: &str) -> Result<LastCommit, VcsError>;

    fn remote_url(&self, remote: &str) -> Result<String, VcsError>;

    /// Whether `search` can honor `only_matching`.
    fn supports_only_matching(&self) -> Result<bool, VcsError>;
}

/// Login part (before `@`) of a committer email, or the whole value when
/// there is none.
pub fn login_from_email(email: &str) -> String {
    let email = email.trim_start_matches('<').trim_end_matches('>');
    match email.rsplit_once('@') {
        Some((login, _)) if !login.is_empty() => login.to_string(),
        _ => email.to_string(),
    }
}
