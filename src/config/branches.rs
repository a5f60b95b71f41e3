//! Options of the branch check.

use super::{ReportOptions, ReportSettings};
use crate::error::ConfigError;
use crate::githost::Platform;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_AGE: i64 = 90;
pub const DEFAULT_CALM_BRANCHES: [&str; 5] =
    ["gh-pages", "main", "master", "prod", "maint(enance)?/.*"];
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch options as read from a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BranchOptions {
    pub max_age: Option<i64>,
    pub calm_branches: Option<Vec<String>>,
    pub ignore_branches_without_pull_request: Option<bool>,
    pub remote: Option<String>,
    pub platform: Option<String>,
    pub host_owner: Option<String>,
    pub host_url: Option<String>,
    pub host_api_access: Option<HostApiAccessOptions>,
    #[serde(flatten)]
    pub report: ReportOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostApiAccessOptions {
    pub api_base_url: Option<String>,
    pub auth_token_file: Option<PathBuf>,
    pub auth_token_env_var: Option<String>,
}

/// Credentials for the code host API, resolved at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct HostApiAccess {
    pub api_base_url: Option<String>,
    pub auth_token: String,
}

impl std::fmt::Debug for HostApiAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostApiAccess")
            .field("api_base_url", &self.api_base_url)
            .field("auth_token", &"***")
            .finish()
    }
}

impl HostApiAccess {
    pub fn resolve(options: HostApiAccessOptions) -> Result<Self, ConfigError> {
        let auth_token = if let Some(path) = &options.auth_token_file {
            let path = expand_home(path);
            std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::UnreadableTokenFile { path: path.clone(), source })?
                .trim()
                .to_string()
        } else if let Some(var) = &options.auth_token_env_var {
            std::env::var(var).map_err(|_| ConfigError::MissingTokenVariable(var.clone()))?
        } else {
            return Err(ConfigError::MissingAuthToken);
        };
        Ok(Self { api_base_url: options.api_base_url, auth_token })
    }
}

/// Resolved branch configuration.
#[derive(Debug, Clone)]
pub struct BranchConfig {
    pub max_age: i64,
    /// Anchored at the start of the branch name.
    pub calm_branches: Vec<Regex>,
    pub ignore_branches_without_pull_request: bool,
    pub remote: String,
    pub platform: Option<Platform>,
    pub host_owner: Option<String>,
    /// Template with `{host}`, `{owner}`, `{repo}` and `{branch}` placeholders.
    pub host_url: Option<String>,
    pub host_api_access: Option<HostApiAccess>,
    pub report: ReportSettings,
}

impl BranchConfig {
    pub fn build(options: BranchOptions) -> Result<Self, ConfigError> {
        let calm_branches = options
            .calm_branches
            .unwrap_or_else(|| DEFAULT_CALM_BRANCHES.map(String::from).to_vec())
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                    ConfigError::InvalidPattern { pattern: pattern.clone(), source }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let platform = options.platform.as_deref().map(str::parse::<Platform>).transpose()?;
        let host_api_access = options.host_api_access.map(HostApiAccess::resolve).transpose()?;

        Ok(Self {
            max_age: options.max_age.unwrap_or(DEFAULT_MAX_AGE),
            calm_branches,
            ignore_branches_without_pull_request: options
                .ignore_branches_without_pull_request
                .unwrap_or(false),
            remote: options.remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            platform,
            host_owner: options.host_owner,
            host_url: options.host_url,
            host_api_access,
            report: options.report.into(),
        })
    }

    /// Whether `branch` is exempt from staleness checks.
    pub fn is_calm(&self, branch: &str) -> bool {
        self.calm_branches.iter().any(|pattern| pattern.is_match(branch))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = BranchConfig::build(BranchOptions::default()).expect("config");
        assert_eq!(config.max_age, 90);
        assert_eq!(config.remote, "origin");
        assert!(config.platform.is_none());
        assert!(config.host_api_access.is_none());
        assert!(!config.ignore_branches_without_pull_request);
    }

    #[test]
    fn calm_branches_are_anchored_at_start() {
        let config = BranchConfig::build(BranchOptions::default()).expect("config");
        assert!(config.is_calm("master"));
        assert!(config.is_calm("gh-pages"));
        assert!(config.is_calm("maint/1.x"));
        assert!(config.is_calm("maintenance/2.x"));
        assert!(!config.is_calm("jsmith/old"));
        assert!(!config.is_calm("fix-master"));
    }

    #[test]
    fn unsupported_platform_fails_at_construction() {
        let err = BranchConfig::build(BranchOptions {
            platform: Some("svn-host".to_string()),
            ..Default::default()
        })
        .expect_err("unsupported");
        assert!(matches!(err, ConfigError::UnsupportedPlatform(_)));
    }

    #[test]
    fn token_from_file_is_trimmed() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("token");
        fs::write(&path, "s3cr3t\n").expect("write");
        let access = HostApiAccess::resolve(HostApiAccessOptions {
            auth_token_file: Some(path),
            ..Default::default()
        })
        .expect("access");
        assert_eq!(access.auth_token, "s3cr3t");
        assert!(!format!("{access:?}").contains("s3cr3t"));
    }

    #[test]
    fn token_from_unset_variable_is_an_error() {
        let err = HostApiAccess::resolve(HostApiAccessOptions {
            auth_token_env_var: Some("CHECK_OLDIES_SURELY_UNSET_VARIABLE".to_string()),
            ..Default::default()
        })
        .expect_err("unset");
        assert!(matches!(err, ConfigError::MissingTokenVariable(_)));
    }

    #[test]
    fn missing_token_source_is_an_error() {
        let err = HostApiAccess::resolve(HostApiAccessOptions::default()).expect_err("missing");
        assert!(matches!(err, ConfigError::MissingAuthToken));
    }
}
