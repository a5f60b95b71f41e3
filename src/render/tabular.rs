//! CSV output.

use super::Finding;
use anyhow::Result;

/// One row per finding under a header made of every field name, in the
/// order they are first seen. Fields a finding lacks are left empty.
pub fn render_csv(findings: &[&dyn Finding]) -> Result<String> {
    if findings.is_empty() {
        return Ok(String::new());
    }
    let rows: Vec<_> = findings.iter().map(|finding| finding.fields()).collect();

    let mut header: Vec<&'static str> = Vec::new();
    for name in rows.iter().flatten().map(|(name, _)| *name) {
        if !header.contains(&name) {
            header.push(name);
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in &rows {
        let record = header.iter().map(|column| {
            row.iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.to_csv())
                .unwrap_or_default()
        });
        writer.write_record(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
