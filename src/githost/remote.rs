//! Repository identity from a remote URL.

use super::Platform;
use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;

static SCP_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[^@/:]+@)?(?P<host>[^/:]+):(?P<path>[^/].*)$").expect("valid regex")
});

/// Host, owner and name of a repository, as found in its remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    pub host: String,
    /// May contain slashes for nested groups (`group/subgroup`).
    pub owner: String,
    pub name: String,
}

impl RepositoryIdentity {
    /// Parse `https://host/owner/repo[.git]`, `ssh://user@host[:port]/owner/repo[.git]`
    /// or `user@host:owner/repo[.git]`.
    pub fn from_remote_url(url: &str) -> Result<Self, ConfigError> {
        let unsupported = || ConfigError::UnsupportedRemoteUrl(url.to_string());
        let trimmed = url.trim();

        let (host, path) = if let Some(rest) = strip_scheme(trimmed) {
            let (authority, path) = rest.split_once('/').ok_or_else(unsupported)?;
            let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
            let host = host.split_once(':').map_or(host, |(host, _port)| host);
            (host, path)
        } else if trimmed.contains("://") {
            return Err(unsupported());
        } else {
            let captures = SCP_LIKE.captures(trimmed).ok_or_else(unsupported)?;
            let host = captures.name("host").map(|m| m.as_str()).ok_or_else(unsupported)?;
            let path = captures.name("path").map(|m| m.as_str()).ok_or_else(unsupported)?;
            (host, path)
        };

        let path = path.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, name) = path.rsplit_once('/').ok_or_else(unsupported)?;
        if host.is_empty() || owner.is_empty() || name.is_empty() {
            return Err(unsupported());
        }
        Ok(Self { host: host.to_string(), owner: owner.to_string(), name: name.to_string() })
    }

    /// Platform guessed from the host name.
    pub fn guess_platform(&self) -> Platform {
        if self.host.contains("gitlab") {
            Platform::GitLab
        } else {
            Platform::GitHub
        }
    }

    /// Browse URL of a branch on the given platform.
    pub fn branch_url(&self, platform: Platform, owner: &str, branch: &str) -> String {
        match platform {
            Platform::GitHub => {
                format!("https://{}/{}/{}/tree/{}", self.host, owner, self.name, branch)
            }
            Platform::GitLab => {
                format!("https://{}/{}/{}/-/tree/{}", self.host, owner, self.name, branch)
            }
        }
    }
}

fn strip_scheme(url: &str) -> Option<&str> {
    ["https://", "http://", "ssh://", "git+ssh://"]
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
}
