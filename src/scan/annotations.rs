//! Annotation extraction.

use crate::config::AnnotationConfig;
use crate::domain::{age_in_days, Annotation};
use crate::error::VcsError;
use crate::vcs::{login_from_email, SearchHit, SearchQuery, Vcs};
use chrono::{DateTime, Utc};
use rayon::prelude::*;

/// Lines that carry one of the configured annotations, with their assignee
/// and age.
///
/// `git grep` finds candidate lines; the stricter in-process pattern then
/// rejects keywords that are part of a longer word. Lines are blamed in
/// parallel, the output keeps the search order.
pub fn get_annotations(
    vcs: &dyn Vcs,
    config: &AnnotationConfig,
    now: DateTime<Utc>,
) -> Result<Vec<Annotation>, VcsError> {
    let query = SearchQuery {
        pattern: &config.annotation_pattern,
        ignore_case: true,
        only_matching: false,
        skip_ignore_pragma: true,
        excludes: &config.whitelist,
    };
    let candidates: Vec<SearchHit> = vcs
        .search(&query)?
        .into_iter()
        .filter(|hit| config.annotation_regex.is_match(&hit.text))
        .collect();
    tracing::debug!("found {} annotations", candidates.len());

    candidates
        .into_par_iter()
        .map(|hit| {
            let blame = vcs.blame(&hit.path, hit.line_no)?;
            let assignee = match config.inline_assignee(&hit.text) {
                Some(assignee) => assignee.to_string(),
                None => login_from_email(&blame.committer_email),
            };
            let age = age_in_days(now, blame.committed_at);
            Ok(Annotation {
                path: hit.path,
                line_no: hit.line_no,
                line_content: hit.text,
                age,
                assignee,
                is_old: age > config.max_age,
            })
        })
        .collect()
}

/// By assignee, then oldest first, then by location.
pub fn sort_annotations(annotations: &mut [Annotation]) {
    annotations.sort_by(|a, b| {
        a.assignee
            .cmp(&b.assignee)
            .then_with(|| b.age.cmp(&a.age))
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.line_no.cmp(&b.line_no))
    });
}
