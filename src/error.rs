//! Error taxonomy.
//!
//! Stale findings are not errors: they are reported through the exit status.
//! Everything here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration to get authentication token for Git host API.")]
    MissingAuthToken,

    #[error("Could not read authentication token from {path}: {source}")]
    UnreadableTokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable {0} (authentication token for Git host API) is not set.")]
    MissingTokenVariable(String),

    #[error("Unsupported remote URL: {0}")]
    UnsupportedRemoteUrl(String),

    #[error("Unsupported Git host platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid path: \"{}\" is not a Git repository.", .0.display())]
    NotAGitRepository(PathBuf),

    #[error("Invalid configuration in {path}: {message}")]
    InvalidFile { path: PathBuf, message: String },

    #[error("Missing [recipients] table in forget-me-not configuration.")]
    MissingRecipients,
}

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    UnexpectedStatus { command: String, status: i32, stderr: String },

    #[error("Unexpected output from `{command}`: {detail}")]
    MalformedOutput { command: String, detail: String },

    #[error(transparent)]
    Git(#[from] git2::Error),
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {detail}")]
    Response { url: String, detail: String },
}

/// Any failure that aborts a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Host(#[from] HostError),
}
