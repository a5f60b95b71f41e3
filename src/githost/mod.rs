//! Code host APIs (GitHub, GitLab) used to find the pull or merge request
//! linked to a branch.

use crate::domain::PullRequestInfo;
use crate::error::{ConfigError, HostError};
use std::fmt;
use std::str::FromStr;

pub mod github;
pub mod gitlab;
pub mod remote;

pub use github::GitHubApi;
pub use gitlab::GitLabApi;
pub use remote::RepositoryIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    GitLab,
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "github" => Ok(Platform::GitHub),
            "gitlab" => Ok(Platform::GitLab),
            _ => Err(ConfigError::UnsupportedPlatform(value.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::GitHub => f.write_str("github"),
            Platform::GitLab => f.write_str("gitlab"),
        }
    }
}

impl Platform {
    /// API root used when none is configured.
    pub fn default_api_base_url(self, host: &str) -> String {
        match self {
            Platform::GitHub if host == "github.com" => "https://api.github.com".to_string(),
            Platform::GitHub => format!("https://{host}/api/v3"),
            Platform::GitLab => format!("https://{host}/api/v4"),
        }
    }
}

/// A code host able to tell which request was opened from a branch.
pub trait CodeHost {
    /// Most recently created pull/merge request whose source is `branch`.
    fn find_request(&self, repo: &str, branch: &str) -> Result<Option<PullRequestInfo>, HostError>;
}

/// Build the API client matching `platform`.
pub fn build_code_host(
    platform: Platform,
    api_base_url: &str,
    owner: &str,
    auth_token: &str,
) -> Result<Box<dyn CodeHost>, HostError> {
    let client: Box<dyn CodeHost> = match platform {
        Platform::GitHub => Box::new(GitHubApi::new(api_base_url, owner, auth_token)?),
        Platform::GitLab => Box::new(GitLabApi::new(api_base_url, owner, auth_token)?),
    };
    Ok(client)
}

pub(crate) fn http_client(api_base_url: &str) -> Result<reqwest::blocking::Client, HostError> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("check-oldies/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| HostError::Transport { url: api_base_url.to_string(), source })
}

/// GET `url` and decode its JSON body.
pub(crate) fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::blocking::Client,
    url: &str,
    query: &[(&str, String)],
    authorization: &str,
) -> Result<T, HostError> {
    tracing::debug!("GET {} {:?}", url, query);
    let transport = |source| HostError::Transport { url: url.to_string(), source };
    let response = client
        .get(url)
        .query(query)
        .header(reqwest::header::AUTHORIZATION, authorization)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(HostError::Response { url: url.to_string(), detail: format!("HTTP {status}") });
    }
    response.json().map_err(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_from_str() {
        assert_eq!("github".parse::<Platform>().expect("github"), Platform::GitHub);
        assert_eq!("GitLab".parse::<Platform>().expect("gitlab"), Platform::GitLab);
        let err = "bitbucket".parse::<Platform>().expect_err("unsupported");
        assert!(matches!(err, ConfigError::UnsupportedPlatform(p) if p == "bitbucket"));
    }

    #[test]
    fn default_api_urls() {
        assert_eq!(Platform::GitHub.default_api_base_url("github.com"), "https://api.github.com");
        assert_eq!(
            Platform::GitHub.default_api_base_url("github.example.com"),
            "https://github.example.com/api/v3"
        );
        assert_eq!(
            Platform::GitLab.default_api_base_url("gitlab.example.com"),
            "https://gitlab.example.com/api/v4"
        );
    }
}
