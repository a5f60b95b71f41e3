//! Output rendering (text, CSV, xUnit)

pub mod findings;
pub mod tabular;
pub mod text;
pub mod xunit;

use crate::domain::OutputFormat;
use anyhow::Result;

pub use tabular::render_csv;
pub use text::render_text;
pub use xunit::{render_xunit, write_xunit_file, XunitNames};

/// A value of a CSV column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    Number(i64),
    Flag(bool),
    Missing,
}

impl Field {
    fn to_csv(&self) -> String {
        match self {
            Field::Text(text) => text.clone(),
            Field::Number(n) => n.to_string(),
            Field::Flag(true) => "1".to_string(),
            Field::Flag(false) => "0".to_string(),
            Field::Missing => String::new(),
        }
    }
}

/// Anything a check reports.
pub trait Finding {
    /// One line of the text listing.
    fn to_text(&self) -> String;

    /// Whether the line is highlighted as an error.
    fn must_warn(&self) -> bool;

    /// Named values, in column order.
    fn fields(&self) -> Vec<(&'static str, Field)>;
}

/// Outcome messages of a check and its xUnit identity.
#[derive(Debug, Clone, Default)]
pub struct Summary<'a> {
    pub ok_message: Option<&'a str>,
    pub error_message: Option<&'a str>,
    pub xunit: XunitNames,
}

/// Format `findings` for standard output. An empty string means nothing
/// should be printed.
pub fn render(
    findings: &[&dyn Finding],
    format: OutputFormat,
    summary: &Summary<'_>,
    colorize: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(findings, summary, colorize)),
        OutputFormat::Csv => render_csv(findings),
        OutputFormat::Xunit => render_xunit(&summary.xunit, summary.error_message, &listing(findings)),
    }
}

/// Uncolored text lines of all findings.
pub fn listing(findings: &[&dyn Finding]) -> String {
    findings.iter().map(|finding| finding.to_text()).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Field, Finding};

    pub struct FakeFinding(pub i64);

    impl Finding for FakeFinding {
        fn to_text(&self) -> String {
            format!("fake: {}", self.0)
        }

        fn must_warn(&self) -> bool {
            self.0 > 1
        }

        fn fields(&self) -> Vec<(&'static str, Field)> {
            vec![("var", Field::Number(self.0)), ("warn", Field::Flag(self.must_warn()))]
        }
    }
}
