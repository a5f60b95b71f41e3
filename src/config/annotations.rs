//! Options of the annotation and future-tag checks.

use super::{ReportOptions, ReportSettings};
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

pub const DEFAULT_MAX_AGE: i64 = 180;
pub const DEFAULT_ANNOTATIONS: [&str; 2] = ["todo", "fixme"]; // no-check-fixmes
pub const DEFAULT_ASSIGNEE_REGEX: &str = r"(?:{annotation_regex})\s*\((?P<assignee>[\w._-]+)";
pub const DEFAULT_FUTURE_TAG_REGEX: &str = r"FUTURE-[-[:alnum:]._]+"; // no-check-fixmes

/// Annotation options as read from a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationOptions {
    pub max_age: Option<i64>,
    pub annotations: Option<Vec<String>>,
    /// Keywords that make future tags known without being reported themselves.
    pub ignored_annotations: Option<Vec<String>>,
    pub assignee_regex: Option<String>,
    pub future_tag_regex: Option<String>,
    pub whitelist: Option<Vec<String>>,
    #[serde(flatten)]
    pub report: ReportOptions,
}

/// Resolved annotation configuration with its patterns compiled.
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    pub max_age: i64,
    pub annotations: Vec<String>,
    pub ignored_annotations: Vec<String>,
    pub future_tag_pattern: String,
    pub whitelist: Vec<String>,
    pub report: ReportSettings,

    /// `todo|fixme`, as given to `git grep -E -i`.
    pub annotation_pattern: String,
    /// Annotations and ignored annotations, for future-tag co-occurrence.
    pub known_tag_pattern: String,
    /// Annotation keyword preceded by a comment-like marker.
    pub annotation_regex: Regex,
    pub assignee_regex: Regex,
    pub future_tag_regex: Regex,
    pub known_keyword_regex: Regex,
}

impl AnnotationConfig {
    pub fn build(options: AnnotationOptions) -> Result<Self, ConfigError> {
        let annotations: Vec<String> = options
            .annotations
            .unwrap_or_else(|| DEFAULT_ANNOTATIONS.map(String::from).to_vec())
            .into_iter()
            .map(|a| a.to_lowercase())
            .collect();
        let ignored_annotations: Vec<String> = options
            .ignored_annotations
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.to_lowercase())
            .collect();
        let future_tag_pattern =
            options.future_tag_regex.unwrap_or_else(|| DEFAULT_FUTURE_TAG_REGEX.to_string());
        let assignee_template =
            options.assignee_regex.unwrap_or_else(|| DEFAULT_ASSIGNEE_REGEX.to_string());

        let annotation_pattern = annotations.join("|");
        let known_tag_pattern =
            annotations.iter().chain(&ignored_annotations).cloned().collect::<Vec<_>>().join("|");

        // Only accept keywords at line start or after whitespace, #, /, *, < or {.
        let bounded = annotations.iter().map(|a| format!(r"\b{a}\b")).collect::<Vec<_>>();
        let annotation_regex =
            compile(&format!(r"(?:^|[#\s/*<{{])(?:{})", bounded.join("|")), true)?;
        let assignee_regex =
            compile(&assignee_template.replace("{annotation_regex}", &annotation_pattern), true)?;
        let future_tag_regex = compile(&future_tag_pattern, false)?;
        let known_keyword_regex = compile(&known_tag_pattern, true)?;

        Ok(Self {
            max_age: options.max_age.unwrap_or(DEFAULT_MAX_AGE),
            annotations,
            ignored_annotations,
            future_tag_pattern,
            whitelist: options.whitelist.unwrap_or_default(),
            report: options.report.into(),
            annotation_pattern,
            known_tag_pattern,
            annotation_regex,
            assignee_regex,
            future_tag_regex,
            known_keyword_regex,
        })
    }

    /// Assignee written inline, as in `FIXME (jsmith)`.
    pub fn inline_assignee<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.assignee_regex.captures(line).and_then(|c| c.name("assignee")).map(|m| m.as_str())
    }
}

fn compile(pattern: &str, ignore_case: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|source| ConfigError::InvalidPattern { pattern: pattern.to_string(), source })
}
