//! Future tags and their orphans.
//!
//! A future tag (`FUTURE-SOMETHING`) is *known* when it appears, anywhere,
//! after an annotation keyword on the same line. Every occurrence of a tag
//! that is never known is an orphan. Knowledge is tracked per tag, not per
//! occurrence: one known line covers all occurrences of that tag.

use crate::config::AnnotationConfig;
use crate::domain::FutureTag;
use crate::error::VcsError;
use crate::vcs::{login_from_email, SearchQuery, Vcs};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Where a tag occurs: path and line number.
type Occurrence = (String, u32);

/// Tags that are declared next to an annotation (or an ignored annotation).
pub fn get_known_future_tags(
    vcs: &dyn Vcs,
    config: &AnnotationConfig,
) -> Result<BTreeSet<String>, VcsError> {
    let pattern = format!("({}).*{}", config.known_tag_pattern, config.future_tag_pattern);
    let query = SearchQuery {
        pattern: &pattern,
        ignore_case: true,
        only_matching: false,
        skip_ignore_pragma: true,
        excludes: &config.whitelist,
    };

    let mut known = BTreeSet::new();
    for hit in vcs.search(&query)? {
        let Some(keyword) = config.known_keyword_regex.find(&hit.text) else {
            continue;
        };
        let rest = &hit.text[keyword.end()..];
        known.extend(config.future_tag_regex.find_iter(rest).map(|m| m.as_str().to_string()));
    }
    tracing::debug!("found {} known future tags", known.len());
    Ok(known)
}

/// Every occurrence of every future tag, grouped by tag.
///
/// Uses `--only-matching` when the VCS supports it, otherwise extracts the
/// tags from whole lines. Both give the same result.
pub fn get_all_future_tags(
    vcs: &dyn Vcs,
    config: &AnnotationConfig,
) -> Result<BTreeMap<String, Vec<Occurrence>>, VcsError> {
    let only_matching = vcs.supports_only_matching()?;
    let query = SearchQuery {
        pattern: &config.future_tag_pattern,
        ignore_case: false,
        only_matching,
        skip_ignore_pragma: true,
        excludes: &config.whitelist,
    };

    let mut occurrences: BTreeMap<String, Vec<Occurrence>> = BTreeMap::new();
    for hit in vcs.search(&query)? {
        let tags: Vec<String> = if only_matching {
            vec![hit.text]
        } else {
            config.future_tag_regex.find_iter(&hit.text).map(|m| m.as_str().to_string()).collect()
        };
        for tag in tags {
            occurrences.entry(tag).or_default().push((hit.path.clone(), hit.line_no));
        }
    }
    for places in occurrences.values_mut() {
        places.sort();
        places.dedup();
    }
    Ok(occurrences)
}

/// Occurrences of tags that are never known, sorted by tag, path and line.
///
/// Only orphans are blamed.
pub fn get_orphan_future_tags(
    vcs: &dyn Vcs,
    config: &AnnotationConfig,
) -> Result<Vec<FutureTag>, VcsError> {
    let known = get_known_future_tags(vcs, config)?;
    let orphans: Vec<(String, Occurrence)> = get_all_future_tags(vcs, config)?
        .into_iter()
        .filter(|(tag, _)| !known.contains(tag))
        .flat_map(|(tag, places)| places.into_iter().map(move |place| (tag.clone(), place)))
        .collect();
    tracing::debug!("found {} orphan future tag occurrences", orphans.len());

    orphans
        .into_par_iter()
        .map(|(tag, (path, line_no))| {
            let blame = vcs.blame(&path, line_no)?;
            Ok(FutureTag { path, line_no, tag, author: login_from_email(&blame.committer_email) })
        })
        .collect()
}
