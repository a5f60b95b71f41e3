//! Git implementation of [`Vcs`]: `git grep` and `git blame` through the
//! command line, references and remotes through libgit2.

use super::command::get_output;
use super::{Blame, LastCommit, SearchHit, SearchQuery, Vcs};
use crate::domain::IGNORE_PRAGMA;
use crate::error::{ConfigError, VcsError};
use chrono::{DateTime, FixedOffset};
use git2::{BranchType, ReferenceType, Repository};
use std::path::{Path, PathBuf};

/// `git grep --only-matching` appeared in Git 2.19.
const ONLY_MATCHING_MIN_VERSION: (u32, u32) = (2, 19);

pub struct GitCli {
    cwd: PathBuf,
}

impl GitCli {
    /// Open the working copy that contains `path`.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        if Repository::discover(path).is_err() {
            return Err(ConfigError::NotAGitRepository(path.to_path_buf()));
        }
        Ok(Self { cwd: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.cwd
    }

    fn repository(&self) -> Result<Repository, VcsError> {
        Ok(Repository::discover(&self.cwd)?)
    }

    fn git(&self, args: Vec<String>, valid_codes: &[i32]) -> Result<Vec<String>, VcsError> {
        get_output("git", &args, &self.cwd, valid_codes)
    }
}

pub fn is_git_directory(path: &Path) -> bool {
    Repository::discover(path).is_ok()
}

impl Vcs for GitCli {
    fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<SearchHit>, VcsError> {
        let mut args: Vec<String> =
            ["grep", "-I", "--null", "--line-number", "--extended-regexp"]
                .map(String::from)
                .to_vec();
        if query.ignore_case {
            args.push("--ignore-case".to_string());
        }
        if query.only_matching {
            args.push("--only-matching".to_string());
        }
        args.extend(["-e".to_string(), query.pattern.to_string()]);
        if query.skip_ignore_pragma {
            args.extend(["--and", "--not", "-e", IGNORE_PRAGMA].map(String::from));
        }
        args.extend(["--".to_string(), ".".to_string()]);
        args.extend(query.excludes.iter().map(|glob| format!(":(exclude){glob}")));

        // Exit status 1 means "nothing found".
        let lines = self.git(args, &[0, 1])?;
        lines.iter().map(|line| parse_grep_line(line)).collect()
    }

    fn blame(&self, path: &str, line_no: u32) -> Result<Blame, VcsError> {
        let args = vec![
            "blame".to_string(),
            "-L".to_string(),
            format!("{line_no},{line_no}"),
            "--porcelain".to_string(),
            "--".to_string(),
            path.to_string(),
        ];
        let lines = self.git(args, &[0])?;
        parse_porcelain_blame(&lines).map_err(|detail| VcsError::MalformedOutput {
            command: format!("git blame {path}:{line_no}"),
            detail,
        })
    }

    fn list_remote_branches(&self) -> Result<Vec<String>, VcsError> {
        let repo = self.repository()?;
        let mut names = Vec::new();
        for entry in repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()? else {
                continue;
            };
            let reference = branch.get();
            if reference.kind() == Some(ReferenceType::Symbolic) {
                let target = reference
                    .symbolic_target()
                    .unwrap_or_default()
                    .trim_start_matches("refs/remotes/");
                names.push(format!("{name} -> {target}"));
            } else {
                names.push(name.to_string());
            }
        }
        names.sort();
        tracing::debug!("found {} remote branches in {}", names.len(), self.cwd.display());
        Ok(names)
    }

    fn last_commit(&self, branch_ref: &str) -> Result<LastCommit, VcsError> {
        let repo = self.repository()?;
        let commit = repo.revparse_single(branch_ref)?.peel_to_commit()?;
        let author = commit.author();
        let author_email = author.email().unwrap_or_default().to_string();
        let time = commit.time();
        let committed_at = git_time_to_datetime(time.seconds(), time.offset_minutes()).ok_or_else(
            || VcsError::MalformedOutput {
                command: format!("git log {branch_ref} -1"),
                detail: format!("invalid commit time {}", time.seconds()),
            },
        )?;
        Ok(LastCommit { author_email, committed_at })
    }

    fn remote_url(&self, remote: &str) -> Result<String, VcsError> {
        let repo = self.repository()?;
        let remote_handle = repo.find_remote(remote)?;
        remote_handle.url().map(str::to_string).ok_or_else(|| VcsError::MalformedOutput {
            command: format!("git remote get-url {remote}"),
            detail: "remote URL is not valid UTF-8".to_string(),
        })
    }

    fn supports_only_matching(&self) -> Result<bool, VcsError> {
        let lines = self.git(vec!["--version".to_string()], &[0])?;
        let version = lines.first().and_then(|line| parse_git_version(line)).ok_or_else(|| {
            VcsError::MalformedOutput {
                command: "git --version".to_string(),
                detail: lines.join(" "),
            }
        })?;
        Ok(version >= ONLY_MATCHING_MIN_VERSION)
    }
}

/// Split a `path\0line\0text` line as printed by `git grep --null --line-number`.
///
/// The path is verbatim, so it can be handed back to `git blame`.
fn parse_grep_line(line: &str) -> Result<SearchHit, VcsError> {
    let malformed = || VcsError::MalformedOutput {
        command: "git grep".to_string(),
        detail: line.to_string(),
    };
    let (path, rest) = line.split_once('\0').ok_or_else(malformed)?;
    let (line_no, text) = rest.split_once(['\0', ':']).ok_or_else(malformed)?;
    let line_no = line_no.parse().map_err(|_| malformed())?;
    Ok(SearchHit { path: path.to_string(), line_no, text: text.to_string() })
}

fn parse_porcelain_blame(lines: &[String]) -> Result<Blame, String> {
    let field = |name: &str| -> Result<&str, String> {
        let prefix = format!("{name} ");
        lines
            .iter()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .map(str::trim)
            .ok_or_else(|| format!("missing {name}"))
    };

    let committer_email =
        field("committer-mail")?.trim_start_matches('<').trim_end_matches('>').to_string();
    let timestamp: i64 = field("committer-time")?
        .parse()
        .map_err(|e| format!("invalid committer-time: {e}"))?;
    let offset_minutes = parse_tz_offset(field("committer-tz")?)?;
    let committed_at = git_time_to_datetime(timestamp, offset_minutes)
        .ok_or_else(|| format!("invalid committer timestamp {timestamp}"))?;
    Ok(Blame { committer_email, committed_at })
}

/// Parse a `+0100` / `-0430` offset into minutes east of UTC.
fn parse_tz_offset(tz: &str) -> Result<i32, String> {
    let invalid = || format!("invalid timezone {tz:?}");
    if tz.len() != 5 || !tz.is_ascii() {
        return Err(invalid());
    }
    let sign = match &tz[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(invalid()),
    };
    let hours: i32 = tz[1..3].parse().map_err(|_| invalid())?;
    let minutes: i32 = tz[3..5].parse().map_err(|_| invalid())?;
    Ok(sign * (hours * 60 + minutes))
}

fn git_time_to_datetime(seconds: i64, offset_minutes: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_minutes * 60)?;
    Some(DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset))
}

/// `git version 2.39.2` (possibly with a vendor suffix) → `(2, 39)`.
fn parse_git_version(line: &str) -> Option<(u32, u32)> {
    let version = line.split_whitespace().nth(2)?;
    let mut numbers = version.split('.').map(|part| part.parse::<u32>().ok());
    let major = numbers.next()??;
    let minor = numbers.next()??;
    Some((major, minor))
}
