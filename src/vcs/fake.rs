//! In-memory [`Vcs`] for unit tests.

use super::{Blame, LastCommit, SearchHit, SearchQuery, Vcs};
use crate::domain::IGNORE_PRAGMA;
use crate::error::VcsError;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use regex::RegexBuilder;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct FakeVcs {
    pub files: Vec<(String, Vec<String>)>,
    pub blames: HashMap<(String, u32), Blame>,
    pub default_blame: Blame,
    pub branches: Vec<String>,
    pub last_commits: HashMap<String, LastCommit>,
    pub remote_url: String,
    pub only_matching: bool,
    pub blame_calls: Mutex<Vec<(String, u32)>>,
}

impl FakeVcs {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            files: Vec::new(),
            blames: HashMap::new(),
            default_blame: Blame {
                committer_email: "jane.doe@example.com".to_string(),
                committed_at: days_ago(now, 2),
            },
            branches: Vec::new(),
            last_commits: HashMap::new(),
            remote_url: "git@github.com:TestOrg/project_name.git".to_string(),
            only_matching: true,
            blame_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.lines().map(str::to_string).collect()));
        self
    }

    pub fn with_blame(mut self, path: &str, line_no: u32, email: &str, at: DateTime<FixedOffset>) -> Self {
        self.blames.insert(
            (path.to_string(), line_no),
            Blame { committer_email: email.to_string(), committed_at: at },
        );
        self
    }

    pub fn with_branch(mut self, name: &str, email: &str, at: DateTime<FixedOffset>) -> Self {
        self.branches.push(name.to_string());
        self.last_commits.insert(
            name.to_string(),
            LastCommit { author_email: email.to_string(), committed_at: at },
        );
        self
    }

    pub fn blame_count(&self) -> usize {
        self.blame_calls.lock().expect("lock").len()
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<FixedOffset> {
    (now - Duration::days(days)).fixed_offset()
}

impl Vcs for FakeVcs {
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, VcsError> {
        let pattern = RegexBuilder::new(query.pattern)
            .case_insensitive(query.ignore_case)
            .build()
            .expect("test patterns are valid Rust regexes");
        let mut hits = Vec::new();
        for (path, lines) in &self.files {
            if query.excludes.iter().any(|glob| glob_matches(glob, path)) {
                continue;
            }
            for (index, line) in lines.iter().enumerate() {
                let line_no = index as u32 + 1;
                if query.skip_ignore_pragma && line.contains(IGNORE_PRAGMA) {
                    continue;
                }
                if query.only_matching {
                    for m in pattern.find_iter(line) {
                        hits.push(SearchHit { path: path.clone(), line_no, text: m.as_str().to_string() });
                    }
                } else if pattern.is_match(line) {
                    hits.push(SearchHit { path: path.clone(), line_no, text: line.clone() });
                }
            }
        }
        Ok(hits)
    }

    fn blame(&self, path: &str, line_no: u32) -> Result<Blame, VcsError> {
        self.blame_calls.lock().expect("lock").push((path.to_string(), line_no));
        Ok(self
            .blames
            .get(&(path.to_string(), line_no))
            .cloned()
            .unwrap_or_else(|| self.default_blame.clone()))
    }

    fn list_remote_branches(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.branches.clone())
    }

    fn last_commit(&self, branch_ref: &str) -> Result<LastCommit, VcsError> {
        self.last_commits.get(branch_ref).cloned().ok_or_else(|| VcsError::UnexpectedStatus {
            command: format!("git log {branch_ref}"),
            status: 128,
            stderr: "unknown revision".to_string(),
        })
    }

    fn remote_url(&self, _remote: &str) -> Result<String, VcsError> {
        Ok(self.remote_url.clone())
    }

    fn supports_only_matching(&self) -> Result<bool, VcsError> {
        Ok(self.only_matching)
    }
}

/// Just enough of pathspec globbing for tests: exact paths and `prefix*`.
fn glob_matches(glob: &str, path: &str) -> bool {
    match glob.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => glob == path,
    }
}
