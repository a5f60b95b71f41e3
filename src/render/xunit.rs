//! xUnit report with a single test case.

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;

/// Names given to the suite, the case and its class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XunitNames {
    pub suite: &'static str,
    pub case: &'static str,
    pub class: &'static str,
}

/// The test case fails when there is an error message. The listing goes
/// to `system-out`, and also into the failure element on error.
pub fn render_xunit(
    names: &XunitNames,
    error_message: Option<&str>,
    listing: &str,
) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut suite = BytesStart::new("testsuite");
    suite.push_attribute(("name", names.suite));
    suite.push_attribute(("tests", "1"));
    suite.push_attribute(("errors", "0"));
    suite.push_attribute(("failures", if error_message.is_some() { "1" } else { "0" }));
    writer.write_event(Event::Start(suite))?;

    let mut case = BytesStart::new("testcase");
    case.push_attribute(("classname", names.class));
    case.push_attribute(("name", names.case));
    writer.write_event(Event::Start(case))?;

    if let Some(message) = error_message {
        let mut failure = BytesStart::new("failure");
        failure.push_attribute(("message", message));
        write_text_element(&mut writer, failure, listing)?;
    }
    write_text_element(&mut writer, BytesStart::new("system-out"), listing)?;
    writer.write_event(Event::Empty(BytesStart::new("system-err")))?;

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, start: BytesStart<'_>, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// Write the report to `path`, creating missing parent directories.
pub fn write_xunit_file(
    path: &Path,
    names: &XunitNames,
    error_message: Option<&str>,
    listing: &str,
) -> Result<()> {
    let xml = render_xunit(names, error_message, listing)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating directory {}", parent.display()))?;
    }
    std::fs::write(path, xml)
        .with_context(|| format!("Failed writing xUnit file {}", path.display()))?;
    tracing::debug!("wrote xUnit report to {}", path.display());
    Ok(())
}
