//! Human-readable listing.

use super::{Finding, Summary};
use console::style;

pub fn render_text(findings: &[&dyn Finding], summary: &Summary<'_>, colorize: bool) -> String {
    let warn = |text: String| {
        if colorize {
            style(text).red().bright().force_styling(true).to_string()
        } else {
            text
        }
    };

    let mut lines = Vec::with_capacity(findings.len() + 2);
    if let Some(message) = summary.ok_message {
        lines.push(message.to_string());
    }
    if let Some(message) = summary.error_message {
        lines.push(warn(message.to_string()));
    }
    for finding in findings {
        let line = finding.to_text();
        lines.push(if finding.must_warn() { warn(line) } else { line });
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::FakeFinding;

    fn refs(findings: &[FakeFinding]) -> Vec<&dyn Finding> {
        findings.iter().map(|f| f as &dyn Finding).collect()
    }

    #[test]
    fn ok_message_then_lines() {
        let findings = [FakeFinding(1), FakeFinding(2)];
        let summary = Summary { ok_message: Some("OK: fine."), ..Default::default() };
        assert_eq!(render_text(&refs(&findings), &summary, false), "OK: fine.\nfake: 1\nfake: 2");
    }

    #[test]
    fn warnings_are_red_when_colorized() {
        let findings = [FakeFinding(1), FakeFinding(2)];
        let summary = Summary { error_message: Some("NOK: bad."), ..Default::default() };
        let text = render_text(&refs(&findings), &summary, true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\u{1b}[") && lines[0].contains("NOK: bad."));
        assert_eq!(lines[1], "fake: 1");
        assert!(lines[2].starts_with("\u{1b}[") && lines[2].contains("fake: 2"));
    }

    #[test]
    fn nothing_to_say() {
        assert_eq!(render_text(&[], &Summary::default(), true), "");
    }
}
