//! Options of the forget-me-not notifier.

use super::loader::load_document;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "forget-me-not.toml";
pub const DEFAULT_WARNING_DELAY: i64 = 15;
pub const DEFAULT_SMTP_HOST: &str = "localhost";
pub const DEFAULT_EMAIL_SENDER: &str = "forget-me-not@example.com";
pub const DEFAULT_EMAIL_SUBJECT: &str = "W{week_number}: Old annotations and old branches";
pub const DEFAULT_EMAIL_BODY_INTRO: &str = "    Hello,\n\n";
pub const DEFAULT_EMAIL_BODY_OUTRO: &str = "\n\n-- \nSent by forget-me-not";
pub const DEFAULT_EMAIL_BODY_ANNOTATIONS: &str = "You have {count} old annotation(s) that will block builds in less than {warning_delay} days:\n\n{lines}";
pub const DEFAULT_EMAIL_BODY_ANNOTATION_LINE_TEMPLATE: &str =
    "{age} days: {repo}:{path}:{line_no}: {line_content}";
pub const DEFAULT_EMAIL_BODY_BRANCHES: &str = "You have {count} old branch(es) that will block builds in less than {warning_delay} days:\n\n{lines}";
pub const DEFAULT_EMAIL_BODY_BRANCH_LINE_TEMPLATE: &str = "{age} days: {repo}: {branch_details}";

/// Where generated emails go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Stdout,
    Mail,
}

/// Notifier options as read from `forget-me-not.toml`. The whole file is
/// the options table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifierOptions {
    pub path: Option<PathBuf>,
    pub warning_delay: Option<i64>,
    pub ignored_repositories: Option<Vec<String>>,
    pub output: Option<Vec<Output>>,
    pub recipients: Option<RecipientConfig>,
    pub smtp: Option<SmtpOptions>,
    pub email_sender: Option<String>,
    pub email_subject: Option<String>,
    pub email_body_intro: Option<String>,
    pub email_body_outro: Option<String>,
    pub email_body_annotations: Option<String>,
    pub email_body_annotation_line_template: Option<String>,
    pub email_body_branches: Option<String>,
    pub email_body_branch_line_template: Option<String>,
}

impl NotifierOptions {
    /// Read `config_file`. A missing file gives empty options.
    pub fn load(config_file: &Path) -> anyhow::Result<Self> {
        if !config_file.exists() {
            return Ok(Self::default());
        }
        let document = load_document(config_file)?;
        let options = serde_json::from_value(document).map_err(|e| ConfigError::InvalidFile {
            path: config_file.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(options)
    }
}

/// Who gets what. `list` holds known emails; `aliases` maps extra
/// identities (logins, names) to emails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipientConfig {
    pub catch_all: String,
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SmtpOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    /// 0 lets the transport pick its default port.
    pub port: u16,
}

/// Templates of the generated emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplates {
    pub sender: String,
    pub subject: String,
    pub intro: String,
    pub outro: String,
    pub annotations: String,
    pub annotation_line: String,
    pub branches: String,
    pub branch_line: String,
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Directory holding the repositories to check.
    pub path: PathBuf,
    pub warning_delay: i64,
    pub ignored_repositories: Vec<String>,
    pub output: Vec<Output>,
    pub recipients: RecipientConfig,
    pub smtp: SmtpConfig,
    pub templates: EmailTemplates,
}

impl NotifierConfig {
    /// `default_path` is used when the file does not name the directory.
    pub fn build(options: NotifierOptions, default_path: &Path) -> Result<Self, ConfigError> {
        let recipients = options.recipients.ok_or(ConfigError::MissingRecipients)?;
        let smtp = options.smtp.unwrap_or_default();
        let text = |value: Option<String>, default: &str| value.unwrap_or_else(|| default.to_string());

        Ok(Self {
            path: options.path.unwrap_or_else(|| default_path.to_path_buf()),
            warning_delay: options.warning_delay.unwrap_or(DEFAULT_WARNING_DELAY),
            ignored_repositories: options.ignored_repositories.unwrap_or_default(),
            output: options.output.unwrap_or_else(|| vec![Output::Stdout]),
            recipients,
            smtp: SmtpConfig {
                host: text(smtp.host, DEFAULT_SMTP_HOST),
                port: smtp.port.unwrap_or(0),
            },
            templates: EmailTemplates {
                sender: text(options.email_sender, DEFAULT_EMAIL_SENDER),
                subject: text(options.email_subject, DEFAULT_EMAIL_SUBJECT),
                intro: text(options.email_body_intro, DEFAULT_EMAIL_BODY_INTRO),
                outro: text(options.email_body_outro, DEFAULT_EMAIL_BODY_OUTRO),
                annotations: text(options.email_body_annotations, DEFAULT_EMAIL_BODY_ANNOTATIONS),
                annotation_line: text(
                    options.email_body_annotation_line_template,
                    DEFAULT_EMAIL_BODY_ANNOTATION_LINE_TEMPLATE,
                ),
                branches: text(options.email_body_branches, DEFAULT_EMAIL_BODY_BRANCHES),
                branch_line: text(
                    options.email_body_branch_line_template,
                    DEFAULT_EMAIL_BODY_BRANCH_LINE_TEMPLATE,
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_with_minimal_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[recipients]\ncatch-all = \"boss@example.com\"\n").expect("write");

        let options = NotifierOptions::load(&path).expect("options");
        let config = NotifierConfig::build(options, tmp.path()).expect("config");
        assert_eq!(config.path, tmp.path());
        assert_eq!(config.warning_delay, 15);
        assert_eq!(config.output, vec![Output::Stdout]);
        assert_eq!(config.recipients.catch_all, "boss@example.com");
        assert_eq!(config.smtp, SmtpConfig { host: "localhost".to_string(), port: 0 });
        assert_eq!(config.templates.subject, DEFAULT_EMAIL_SUBJECT);
    }

    #[test]
    fn full_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
path = "/srv/repos"
warning-delay = 7
ignored-repositories = ["legacy"]
output = ["stdout", "mail"]
email-subject = "Week {week_number}"

[recipients]
catch-all = "boss@example.com"
list = ["john.smith@example.com"]
aliases = { "John Smith" = "john.smith@example.com" }

[smtp]
host = "smtp.example.com"
port = 2525
"#,
        )
        .expect("write");

        let options = NotifierOptions::load(&path).expect("options");
        let config = NotifierConfig::build(options, tmp.path()).expect("config");
        assert_eq!(config.path, PathBuf::from("/srv/repos"));
        assert_eq!(config.warning_delay, 7);
        assert_eq!(config.ignored_repositories, vec!["legacy".to_string()]);
        assert_eq!(config.output, vec![Output::Stdout, Output::Mail]);
        assert_eq!(config.recipients.list, vec!["john.smith@example.com".to_string()]);
        assert_eq!(
            config.recipients.aliases.get("John Smith").map(String::as_str),
            Some("john.smith@example.com")
        );
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.templates.subject, "Week {week_number}");
    }

    #[test]
    fn recipients_are_required() {
        let err = NotifierConfig::build(NotifierOptions::default(), Path::new("."))
            .expect_err("missing recipients");
        assert!(matches!(err, ConfigError::MissingRecipients));
    }

    #[test]
    fn missing_file_gives_empty_options() {
        let tmp = TempDir::new().expect("tmp");
        let options = NotifierOptions::load(&tmp.path().join(CONFIG_FILE_NAME)).expect("options");
        assert!(options.recipients.is_none());
    }

    #[test]
    fn unknown_output_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "output = [\"pigeon\"]\n").expect("write");
        assert!(NotifierOptions::load(&path).is_err());
    }
}
