//! Running external commands.

use crate::error::VcsError;
use std::path::Path;
use std::process::Command;

/// Run `program args...` in `cwd` and return its non-empty stdout lines.
///
/// Any exit status outside `valid_codes` is an error.
pub fn get_output(
    program: &str,
    args: &[String],
    cwd: &Path,
    valid_codes: &[i32],
) -> Result<Vec<String>, VcsError> {
    let command_line = render_command(program, args);
    tracing::debug!("running `{}` in {}", command_line, cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| VcsError::Spawn { command: command_line.clone(), source })?;

    let status = output.status.code().unwrap_or(-1);
    if !valid_codes.contains(&status) {
        return Err(VcsError::UnexpectedStatus {
            command: command_line,
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string()).chain(args.iter().cloned()).collect::<Vec<_>>().join(" ")
}
