//! forget-me-not: warn people about annotations and branches that are
//! about to become old, across every repository of a directory.

pub mod email;
pub mod recipients;

use crate::config::{
    load_tool_options, AnnotationConfig, AnnotationOptions, BranchConfig, BranchOptions,
    NotifierConfig,
};
use crate::domain::{Annotation, BranchInfo};
use crate::scan::{get_annotations, get_branches};
use crate::vcs::git::is_git_directory;
use crate::vcs::{GitCli, Vcs};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use walkdir::WalkDir;

pub use email::{generate_emails, Email, Outbox, PrintOutbox, SmtpOutbox};
pub use recipients::{AddressBook, Recipient};

/// An annotation that is about to become old, with its repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldAnnotation {
    pub repo: String,
    pub annotation: Annotation,
}

/// Findings of one or many repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reports {
    pub annotations: Vec<OldAnnotation>,
    pub branches: Vec<BranchInfo>,
}

impl Reports {
    fn extend(&mut self, other: Reports) {
        self.annotations.extend(other.annotations);
        self.branches.extend(other.branches);
    }
}

/// What one recipient is told about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mailbox {
    pub annotations: Vec<OldAnnotation>,
    pub branches: Vec<BranchInfo>,
}

/// Check every Git repository directly under `config.path`, in name order.
///
/// Annotation ages are counted from `now`, branch ages from the local `today`.
pub fn check_repositories(
    config: &NotifierConfig,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<Reports> {
    let mut reports = Reports::default();
    let entries = WalkDir::new(&config.path).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed listing {}", config.path.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if config.ignored_repositories.contains(&name) {
            tracing::debug!("skipping ignored repository {}", name);
            continue;
        }
        if !is_git_directory(entry.path()) {
            tracing::debug!("skipping {}: not a Git repository", entry.path().display());
            continue;
        }
        tracing::info!("checking {}", name);
        let vcs = GitCli::open(entry.path())?;
        let (annotation_config, branch_config) =
            repository_configs(entry.path(), config.warning_delay)?;
        let repo_reports =
            check_repository(&vcs, &name, &annotation_config, &branch_config, now, today)
                .with_context(|| format!("Failed checking repository {name}"))?;
        reports.extend(repo_reports);
    }
    Ok(reports)
}

/// Each repository's own options, with maximum ages brought forward by
/// `warning_delay`.
fn repository_configs(path: &Path, warning_delay: i64) -> Result<(AnnotationConfig, BranchConfig)> {
    let annotation_options: AnnotationOptions = load_tool_options(path, None, "check-fixmes")?;
    let branch_options: BranchOptions = load_tool_options(path, None, "check-branches")?;
    let mut annotation_config = AnnotationConfig::build(annotation_options)?;
    let mut branch_config = BranchConfig::build(branch_options)?;
    annotation_config.max_age -= warning_delay;
    branch_config.max_age -= warning_delay;
    Ok((annotation_config, branch_config))
}

/// Old annotations and branches of a single repository.
pub fn check_repository(
    vcs: &dyn Vcs,
    name: &str,
    annotation_config: &AnnotationConfig,
    branch_config: &BranchConfig,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<Reports> {
    let annotations = get_annotations(vcs, annotation_config, now)?
        .into_iter()
        .filter(|annotation| annotation.is_old)
        .map(|annotation| OldAnnotation { repo: name.to_string(), annotation })
        .collect();
    let branches = get_branches(vcs, branch_config, today)?
        .into_iter()
        .filter(|branch| branch.is_old)
        .collect();
    Ok(Reports { annotations, branches })
}

/// Split findings by recipient. Also returns the identities that could
/// not be mapped to an email.
pub fn group_reports_by_email(
    reports: Reports,
    book: &AddressBook,
) -> (BTreeMap<Recipient, Mailbox>, BTreeSet<String>) {
    let mut mailboxes: BTreeMap<Recipient, Mailbox> = BTreeMap::new();
    let mut unknown_users = BTreeSet::new();
    let mut recipient_of = |identity: &str| {
        let recipient = book.recipient_for(identity);
        if recipient == Recipient::CatchAll {
            unknown_users.insert(identity.to_string());
        }
        recipient
    };

    for old in reports.annotations {
        let recipient = recipient_of(&old.annotation.assignee);
        mailboxes.entry(recipient).or_default().annotations.push(old);
    }
    for branch in reports.branches {
        let recipient = recipient_of(&branch.author);
        mailboxes.entry(recipient).or_default().branches.push(branch);
    }
    (mailboxes, unknown_users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecipientConfig;
    use crate::vcs::fake::{days_ago, FakeVcs};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn book() -> AddressBook {
        AddressBook::new(&RecipientConfig {
            catch_all: "boss@example.com".to_string(),
            list: vec!["john.smith@example.com".to_string()],
            ..Default::default()
        })
    }

    #[test]
    fn only_soon_old_items_are_kept() {
        let vcs = FakeVcs::new(now())
            .with_file("a.py", "# TODO: soon old\n# TODO: fresh\n")
            .with_blame("a.py", 1, "jsmith@example.com", days_ago(now(), 170))
            .with_blame("a.py", 2, "jsmith@example.com", days_ago(now(), 10))
            .with_branch("origin/jsmith/old", "john.smith@example.com", days_ago(now(), 80))
            .with_branch("origin/jsmith/new", "john.smith@example.com", days_ago(now(), 5));
        let mut annotation_config =
            AnnotationConfig::build(AnnotationOptions::default()).expect("annotations");
        let mut branch_config = BranchConfig::build(BranchOptions::default()).expect("branches");
        annotation_config.max_age -= 15;
        branch_config.max_age -= 15;

        let reports = check_repository(
            &vcs,
            "project",
            &annotation_config,
            &branch_config,
            now(),
            today(),
        )
        .expect("reports");
        assert_eq!(reports.annotations.len(), 1);
        assert_eq!(reports.annotations[0].repo, "project");
        assert_eq!(reports.annotations[0].annotation.line_no, 1);
        assert_eq!(reports.branches.len(), 1);
        assert_eq!(reports.branches[0].name, "jsmith/old");
    }

    #[test]
    fn branch_ages_count_from_the_given_day() {
        let late_evening = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let vcs = FakeVcs::new(late_evening).with_branch(
            "origin/jsmith/edge",
            "john.smith@example.com",
            days_ago(late_evening, 75),
        );
        let mut branch_config = BranchConfig::build(BranchOptions::default()).expect("branches");
        branch_config.max_age = 75;
        let annotation_config =
            AnnotationConfig::build(AnnotationOptions::default()).expect("annotations");

        let same_day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let reports = check_repository(
            &vcs,
            "project",
            &annotation_config,
            &branch_config,
            late_evening,
            same_day,
        )
        .expect("reports");
        assert!(reports.branches.is_empty());

        let next_day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let reports = check_repository(
            &vcs,
            "project",
            &annotation_config,
            &branch_config,
            late_evening,
            next_day,
        )
        .expect("reports");
        assert_eq!(reports.branches.len(), 1);
        assert_eq!(reports.branches[0].age, 76);
    }

    #[test]
    fn grouping_collects_unknown_users() {
        let vcs = FakeVcs::new(now())
            .with_file("a.py", "# TODO: one\n# TODO (ghost): two\n")
            .with_blame("a.py", 1, "jsmith@example.com", days_ago(now(), 400))
            .with_blame("a.py", 2, "jsmith@example.com", days_ago(now(), 400))
            .with_branch("origin/feature", "john.smith@example.com", days_ago(now(), 400));
        let reports = check_repository(
            &vcs,
            "project",
            &AnnotationConfig::build(AnnotationOptions::default()).expect("annotations"),
            &BranchConfig::build(BranchOptions::default()).expect("branches"),
            now(),
            today(),
        )
        .expect("reports");

        let (mailboxes, unknown_users) = group_reports_by_email(reports, &book());
        assert_eq!(unknown_users, BTreeSet::from(["ghost".to_string()]));
        let recipients: Vec<_> = mailboxes.keys().cloned().collect();
        assert_eq!(
            recipients,
            vec![Recipient::CatchAll, Recipient::Email("john.smith@example.com".to_string())]
        );
        let john = &mailboxes[&Recipient::Email("john.smith@example.com".to_string())];
        assert_eq!(john.annotations.len(), 1);
        assert_eq!(john.branches.len(), 1);
        assert_eq!(mailboxes[&Recipient::CatchAll].annotations[0].annotation.assignee, "ghost");
    }
}
