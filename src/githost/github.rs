//! GitHub pull requests.

use super::{get_json, http_client, CodeHost};
use crate::domain::PullRequestInfo;
use crate::error::HostError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GitHubPull {
    number: u64,
    state: String,
    html_url: String,
}

pub struct GitHubApi {
    client: reqwest::blocking::Client,
    api_base_url: String,
    owner: String,
    auth_token: String,
}

impl GitHubApi {
    pub fn new(api_base_url: &str, owner: &str, auth_token: &str) -> Result<Self, HostError> {
        Ok(Self {
            client: http_client(api_base_url)?,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            auth_token: auth_token.to_string(),
        })
    }

    fn pulls_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_base_url, self.owner, repo)
    }

    /// Newest first, so that the first result is the most recent request.
    fn pulls_query(&self, branch: &str) -> Vec<(&'static str, String)> {
        vec![
            ("head", format!("{}:{}", self.owner, branch)),
            ("state", "all".to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
        ]
    }
}

impl CodeHost for GitHubApi {
    fn find_request(&self, repo: &str, branch: &str) -> Result<Option<PullRequestInfo>, HostError> {
        let pulls: Vec<GitHubPull> = get_json(
            &self.client,
            &self.pulls_url(repo),
            &self.pulls_query(branch),
            &format!("token {}", self.auth_token),
        )?;
        Ok(first_request(pulls))
    }
}

fn first_request(pulls: Vec<GitHubPull>) -> Option<PullRequestInfo> {
    pulls.into_iter().next().map(|pull| PullRequestInfo {
        number: pull.number,
        state: pull.state,
        url: pull.html_url,
    })
}
