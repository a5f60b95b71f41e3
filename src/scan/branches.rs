//! Branch ages and their pull/merge requests.

use crate::config::BranchConfig;
use crate::domain::{age_in_calendar_days, BranchInfo};
use crate::error::ScanError;
use crate::githost::{build_code_host, CodeHost, Platform, RepositoryIdentity};
use crate::vcs::Vcs;
use chrono::NaiveDate;

/// Where branches live on the code host.
#[derive(Debug, Clone)]
pub struct HostTarget {
    pub identity: RepositoryIdentity,
    pub platform: Platform,
    pub owner: String,
}

impl HostTarget {
    pub fn resolve(vcs: &dyn Vcs, config: &BranchConfig) -> Result<Self, ScanError> {
        let url = vcs.remote_url(&config.remote)?;
        let identity = RepositoryIdentity::from_remote_url(&url)?;
        let platform = config.platform.unwrap_or_else(|| identity.guess_platform());
        let owner = config.host_owner.clone().unwrap_or_else(|| identity.owner.clone());
        tracing::debug!(
            "repository {} on {} ({}), owner {}",
            identity.name,
            identity.host,
            platform,
            owner
        );
        Ok(Self { identity, platform, owner })
    }

    fn branch_url(&self, template: Option<&str>, branch: &str) -> String {
        match template {
            Some(template) => template
                .replace("{host}", &self.identity.host)
                .replace("{owner}", &self.owner)
                .replace("{repo}", &self.identity.name)
                .replace("{branch}", branch),
            None => self.identity.branch_url(self.platform, &self.owner, branch),
        }
    }
}

/// Remote branches that are not calm, with their age and, when the code
/// host API is configured, their most recent pull/merge request.
pub fn get_branches(
    vcs: &dyn Vcs,
    config: &BranchConfig,
    today: NaiveDate,
) -> Result<Vec<BranchInfo>, ScanError> {
    let target = HostTarget::resolve(vcs, config)?;
    let code_host = match &config.host_api_access {
        Some(access) => {
            let api_base_url = access
                .api_base_url
                .clone()
                .unwrap_or_else(|| target.platform.default_api_base_url(&target.identity.host));
            Some(build_code_host(target.platform, &api_base_url, &target.owner, &access.auth_token)?)
        }
        None => None,
    };
    collect_branches(vcs, config, &target, today, code_host.as_deref())
}

pub(crate) fn collect_branches(
    vcs: &dyn Vcs,
    config: &BranchConfig,
    target: &HostTarget,
    today: NaiveDate,
    code_host: Option<&dyn CodeHost>,
) -> Result<Vec<BranchInfo>, ScanError> {
    let prefix = format!("{}/", config.remote);
    let mut branches = Vec::new();

    for listed in vcs.list_remote_branches()? {
        let Some(name) = listed.trim().strip_prefix(&prefix) else {
            continue;
        };
        if name.contains("->") || config.is_calm(name) {
            continue;
        }
        let last_commit = vcs.last_commit(&format!("{prefix}{name}"))?;
        let age = age_in_calendar_days(today, last_commit.committed_at);
        branches.push(BranchInfo {
            repo: target.identity.name.clone(),
            name: name.to_string(),
            url: target.branch_url(config.host_url.as_deref(), name),
            author: last_commit.author_email,
            age,
            is_old: age > config.max_age,
            pull_request: None,
        });
    }

    let Some(code_host) = code_host else {
        return Ok(branches);
    };
    for branch in &mut branches {
        branch.pull_request = code_host.find_request(&target.identity.name, &branch.name)?;
    }
    if config.ignore_branches_without_pull_request {
        branches.retain(|branch| branch.pull_request.is_some());
    }
    Ok(branches)
}

/// By author, then oldest first, then by name.
pub fn sort_branches(branches: &mut [BranchInfo]) {
    branches.sort_by(|a, b| {
        a.author.cmp(&b.author).then_with(|| b.age.cmp(&a.age)).then_with(|| a.name.cmp(&b.name))
    });
}
