//! Config file loading

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Files looked up, in order, next to the checked repository.
const CONFIG_CANDIDATES: [&str; 5] = [
    "check-oldies.toml",
    ".check-oldies.toml",
    "pyproject.toml",
    "check-oldies.yml",
    "check-oldies.yaml",
];

/// Load the options table of `tool` from `config_path`, or from a config
/// file discovered in `root` when no path is given.
///
/// The table is looked up at the top level first, then under `tool.`
/// (the `pyproject.toml` convention). A missing file or table yields the
/// defaults. A broken explicit file is an error; a broken discovered file
/// only logs a warning.
pub fn load_tool_options<T>(root: &Path, config_path: Option<&Path>, tool: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(root),
    };

    let Some(config_file) = discovered else {
        return Ok(T::default());
    };

    let parsed = load_document(&config_file).and_then(|document| {
        let Some(table) = select_tool_table(&document, tool) else {
            return Ok(T::default());
        };
        serde_json::from_value(table.clone()).map_err(|e| {
            ConfigError::InvalidFile { path: config_file.clone(), message: format!("[{tool}] {e}") }
                .into()
        })
    });

    match parsed {
        Ok(options) => Ok(options),
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(T::default())
        }
    }
}

/// Read a TOML or YAML file into a JSON value whose keys use underscores
/// instead of dashes.
pub fn load_document(config_file: &Path) -> Result<Value> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let raw: Value = match ext.as_str() {
        "toml" => {
            let value: toml::Value =
                toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
                    path: config_file.to_path_buf(),
                    message: e.to_string(),
                })?;
            serde_json::to_value(value)?
        }
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: config_file.to_path_buf(),
            message: e.to_string(),
        })?,
        other => {
            return Err(ConfigError::InvalidFile {
                path: config_file.to_path_buf(),
                message: format!("unsupported config extension '.{other}'"),
            }
            .into())
        }
    };

    Ok(replace_dashes(raw))
}

fn select_tool_table<'a>(document: &'a Value, tool: &str) -> Option<&'a Value> {
    let key = tool.replace('-', "_");
    document
        .get(&key)
        .or_else(|| document.get("tool").and_then(|nested| nested.get(&key)))
}

/// Tables whose keys are data (identities), not option names.
const VERBATIM_TABLES: [&str; 1] = ["aliases"];

/// Recursively replace dashes by underscores in table keys.
fn replace_dashes(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = key.replace('-', "_");
                    let value =
                        if VERBATIM_TABLES.contains(&key.as_str()) { value } else { replace_dashes(value) };
                    (key, value)
                })
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

fn discover_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|candidate| root.join(candidate)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::load_tool_options;
    use crate::config::{AnnotationOptions, BranchOptions};
    use crate::domain::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_config_returns_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let opts: AnnotationOptions =
            load_tool_options(tmp.path(), None, "check-fixmes").expect("defaults");
        assert!(opts.max_age.is_none());
        assert!(opts.annotations.is_none());
    }

    #[test]
    fn top_level_table_with_dashed_keys() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("check-oldies.toml"),
            "[check-fixmes]\nmax-age = 30\nannotations = [\"TIMEBOMB\"]\noutput-format = \"csv\"\n",
        )
        .expect("write");

        let opts: AnnotationOptions =
            load_tool_options(tmp.path(), None, "check-fixmes").expect("config");
        assert_eq!(opts.max_age, Some(30));
        assert_eq!(opts.annotations, Some(vec!["TIMEBOMB".to_string()]));
        assert_eq!(opts.report.output_format, Some(OutputFormat::Csv));
    }

    #[test]
    fn pyproject_tool_table() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("pyproject.toml"),
            "[project]\nname = \"x\"\n\n[tool.check-branches]\ncalm-branches = [\"main\"]\n",
        )
        .expect("write");

        let opts: BranchOptions =
            load_tool_options(tmp.path(), None, "check-branches").expect("config");
        assert_eq!(opts.calm_branches, Some(vec!["main".to_string()]));
    }

    #[test]
    fn nested_tables_are_normalized() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("conf.toml");
        fs::write(
            &path,
            "[check-branches.host-api-access]\nauth-token-env-var = \"TOKEN\"\n",
        )
        .expect("write");

        let opts: BranchOptions =
            load_tool_options(tmp.path(), Some(&path), "check-branches").expect("config");
        let access = opts.host_api_access.expect("host api access");
        assert_eq!(access.auth_token_env_var.as_deref(), Some("TOKEN"));
    }

    #[test]
    fn alias_keys_keep_their_dashes() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("forget-me-not.toml");
        fs::write(&path, "[recipients]\ncatch-all = \"a@example.com\"\n[recipients.aliases]\njean-luc = \"jl@example.com\"\n")
            .expect("write");

        let document = super::load_document(&path).expect("document");
        assert_eq!(document["recipients"]["catch_all"], "a@example.com");
        assert_eq!(document["recipients"]["aliases"]["jean-luc"], "jl@example.com");
    }

    #[test]
    fn yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("check-oldies.yml"),
            "check-future-tags:\n  future-tag-regex: \"FEWTURE-[-[:alnum:]._]+\"\n",
        )
        .expect("write");

        let opts: AnnotationOptions =
            load_tool_options(tmp.path(), None, "check-future-tags").expect("config");
        assert_eq!(opts.future_tag_regex.as_deref(), Some("FEWTURE-[-[:alnum:]._]+"));
    }

    #[test]
    fn explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[check-fixmes]\nmax-age = \"old\"\n").expect("write");

        let result: anyhow::Result<AnnotationOptions> =
            load_tool_options(tmp.path(), Some(&path), "check-fixmes");
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn explicit_config_bad_syntax_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[check-fixmes\n").expect("write");

        let result: anyhow::Result<AnnotationOptions> =
            load_tool_options(tmp.path(), Some(&path), "check-fixmes");
        assert!(result.is_err());
    }

    #[test]
    fn auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("check-oldies.toml"), "[check-fixmes]\nmax-age = \"old\"\n")
            .expect("write");

        let opts: AnnotationOptions =
            load_tool_options(tmp.path(), None, "check-fixmes").expect("soft-fail");
        assert!(opts.max_age.is_none());
    }

    #[test]
    fn unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("conf.ini");
        fs::write(&path, "max_age = 3\n").expect("write");

        let result: anyhow::Result<AnnotationOptions> =
            load_tool_options(tmp.path(), Some(&path), "check-fixmes");
        assert!(result.is_err());
    }
}
