//! GitLab merge requests.

use super::{get_json, http_client, CodeHost};
use crate::domain::PullRequestInfo;
use crate::error::HostError;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: u64,
    name: String,
    #[serde(default)]
    path_with_namespace: String,
}

#[derive(Debug, Deserialize)]
struct GitLabMergeRequest {
    iid: u64,
    state: String,
    web_url: String,
}

pub struct GitLabApi {
    client: reqwest::blocking::Client,
    api_base_url: String,
    owner: String,
    auth_token: String,
    project_ids: RefCell<HashMap<String, Option<u64>>>,
}

impl GitLabApi {
    pub fn new(api_base_url: &str, owner: &str, auth_token: &str) -> Result<Self, HostError> {
        Ok(Self {
            client: http_client(api_base_url)?,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            auth_token: auth_token.to_string(),
            project_ids: RefCell::new(HashMap::new()),
        })
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.auth_token)
    }

    fn project_id(&self, repo: &str) -> Result<Option<u64>, HostError> {
        if let Some(id) = self.project_ids.borrow().get(repo) {
            return Ok(*id);
        }
        let url = format!("{}/projects", self.api_base_url);
        let query = [("search", repo.to_string()), ("simple", "true".to_string())];
        let projects: Vec<GitLabProject> =
            get_json(&self.client, &url, &query, &self.authorization())?;
        let id = pick_project(&projects, &self.owner, repo);
        if id.is_none() {
            tracing::debug!("no GitLab project named {} under {}", repo, self.owner);
        }
        self.project_ids.borrow_mut().insert(repo.to_string(), id);
        Ok(id)
    }

    fn merge_requests_url(&self, project_id: u64) -> String {
        format!("{}/projects/{}/merge_requests", self.api_base_url, project_id)
    }

    fn merge_requests_query(branch: &str) -> Vec<(&'static str, String)> {
        vec![
            ("source_branch", branch.to_string()),
            ("state", "all".to_string()),
            ("order_by", "created_at".to_string()),
            ("sort", "desc".to_string()),
        ]
    }
}

impl CodeHost for GitLabApi {
    fn find_request(&self, repo: &str, branch: &str) -> Result<Option<PullRequestInfo>, HostError> {
        let Some(project_id) = self.project_id(repo)? else {
            return Ok(None);
        };
        let requests: Vec<GitLabMergeRequest> = get_json(
            &self.client,
            &self.merge_requests_url(project_id),
            &Self::merge_requests_query(branch),
            &self.authorization(),
        )?;
        Ok(requests.into_iter().next().map(|mr| PullRequestInfo {
            number: mr.iid,
            state: mr.state,
            url: mr.web_url,
        }))
    }
}

/// Project whose name is exactly `repo`, preferring the one under `owner`.
fn pick_project(projects: &[GitLabProject], owner: &str, repo: &str) -> Option<u64> {
    let full_path = format!("{owner}/{repo}");
    projects
        .iter()
        .find(|p| p.path_with_namespace == full_path)
        .or_else(|| projects.iter().find(|p| p.name == repo))
        .map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<GitLabProject> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "project-extra", "path_with_namespace": "team/project-extra"},
                {"id": 2, "name": "project", "path_with_namespace": "other/project"},
                {"id": 3, "name": "project", "path_with_namespace": "team/project"}
            ]"#,
        )
        .expect("json")
    }

    #[test]
    fn project_under_owner_is_preferred() {
        assert_eq!(pick_project(&projects(), "team", "project"), Some(3));
    }

    #[test]
    fn project_matched_on_exact_name() {
        assert_eq!(pick_project(&projects(), "someone", "project"), Some(2));
        assert_eq!(pick_project(&projects(), "team", "proj"), None);
    }

    #[test]
    fn request_shape() {
        let api = GitLabApi::new("https://gitlab.example.com/api/v4/", "team", "secret")
            .expect("api");
        assert_eq!(
            api.merge_requests_url(3),
            "https://gitlab.example.com/api/v4/projects/3/merge_requests"
        );
        assert_eq!(api.authorization(), "Bearer secret");
        let query = GitLabApi::merge_requests_query("feature");
        assert_eq!(query[0], ("source_branch", "feature".to_string()));
        assert!(query.contains(&("order_by", "created_at".to_string())));
    }

    #[test]
    fn merge_request_payload() {
        let requests: Vec<GitLabMergeRequest> = serde_json::from_str(
            r#"[{"iid": 42, "id": 9000, "state": "merged", "web_url": "https://gitlab.example.com/team/project/-/merge_requests/42"}]"#,
        )
        .expect("json");
        assert_eq!(requests[0].iid, 42);
        assert_eq!(requests[0].state, "merged");
    }
}
