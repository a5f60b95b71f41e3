//! How each kind of finding is listed.

use super::{Field, Finding};
use crate::domain::{Annotation, BranchInfo, FutureTag};

impl Finding for Annotation {
    fn to_text(&self) -> String {
        format!(
            "{:<15.15} - {:>4} days - {}:{}: {}",
            self.assignee,
            self.age,
            self.path,
            self.line_no,
            self.line_content.trim()
        )
    }

    fn must_warn(&self) -> bool {
        self.is_old
    }

    fn fields(&self) -> Vec<(&'static str, Field)> {
        vec![
            ("path", Field::Text(self.path.clone())),
            ("line_no", Field::Number(self.line_no.into())),
            ("line_content", Field::Text(self.line_content.clone())),
            ("age", Field::Number(self.age)),
            ("assignee", Field::Text(self.assignee.clone())),
            ("is_old", Field::Flag(self.is_old)),
        ]
    }
}

impl Finding for FutureTag {
    fn to_text(&self) -> String {
        format!(
            "{:<15.15} -   ORPHAN  - {}:{}: Unknown tag {}",
            self.author, self.path, self.line_no, self.tag
        )
    }

    /// Orphans are always errors.
    fn must_warn(&self) -> bool {
        true
    }

    fn fields(&self) -> Vec<(&'static str, Field)> {
        vec![
            ("path", Field::Text(self.path.clone())),
            ("line_no", Field::Number(self.line_no.into())),
            ("tag", Field::Text(self.tag.clone())),
            ("author", Field::Text(self.author.clone())),
        ]
    }
}

impl Finding for BranchInfo {
    fn to_text(&self) -> String {
        format!("{:<30.30} - {:>4} days - {}", self.author, self.age, self.name_and_details())
    }

    fn must_warn(&self) -> bool {
        self.is_old
    }

    fn fields(&self) -> Vec<(&'static str, Field)> {
        let pr = self.pull_request.as_ref();
        vec![
            ("repo", Field::Text(self.repo.clone())),
            ("name", Field::Text(self.name.clone())),
            ("url", Field::Text(self.url.clone())),
            ("author", Field::Text(self.author.clone())),
            ("age", Field::Number(self.age)),
            ("is_old", Field::Flag(self.is_old)),
            ("pull_request_number", pr.map_or(Field::Missing, |pr| Field::Number(pr.number as i64))),
            ("pull_request_state", pr.map_or(Field::Missing, |pr| Field::Text(pr.state.clone()))),
            ("pull_request_url", pr.map_or(Field::Missing, |pr| Field::Text(pr.url.clone()))),
        ]
    }
}
