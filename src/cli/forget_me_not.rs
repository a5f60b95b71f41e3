//! `forget-me-not` command implementation

use crate::config::notifier::CONFIG_FILE_NAME;
use crate::config::{NotifierConfig, NotifierOptions, Output};
use crate::notify::{
    check_repositories, generate_emails, group_reports_by_email, AddressBook, Outbox,
    PrintOutbox, SmtpOutbox,
};
use anyhow::Result;
use chrono::{Local, Utc};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct ForgetMeNotArgs {
    /// Directory that contains all Git repositories to check
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Path of the configuration file (default: PATH/forget-me-not.toml)
    #[arg(long, value_name = "FILE")]
    pub conf: Option<PathBuf>,

    /// Report items that turn old within this number of days (default: 15)
    #[arg(long, value_name = "DAYS")]
    pub warning_delay: Option<i64>,

    /// Where to send the emails (repeatable)
    #[arg(long, value_enum, value_name = "OUTPUT")]
    pub output: Vec<Output>,
}

pub fn run(args: ForgetMeNotArgs) -> Result<ExitCode> {
    let conf = args.conf.clone().unwrap_or_else(|| args.path.join(CONFIG_FILE_NAME));
    let options = NotifierOptions::load(&conf)?;
    let mut config = NotifierConfig::build(options, &args.path)?;
    if let Some(warning_delay) = args.warning_delay {
        config.warning_delay = warning_delay;
    }
    if !args.output.is_empty() {
        config.output = args.output;
    }

    let today = Local::now().date_naive();
    let reports = check_repositories(&config, Utc::now(), today)?;
    let book = AddressBook::new(&config.recipients);
    let (mailboxes, unknown_users) = group_reports_by_email(reports, &book);
    let emails = generate_emails(
        mailboxes,
        &config.recipients.catch_all,
        config.warning_delay,
        &config.templates,
        today,
    );

    if !unknown_users.is_empty() {
        println!(
            "Found annotations or old branches of unknown authors (forwarded to {}):",
            config.recipients.catch_all
        );
        println!("{}", unknown_users.into_iter().collect::<Vec<_>>().join("\n"));
    }

    if config.output.contains(&Output::Stdout) {
        PrintOutbox.deliver(&emails)?;
    }
    if config.output.contains(&Output::Mail) {
        SmtpOutbox::new(&config.smtp).deliver(&emails)?;
    }
    Ok(ExitCode::SUCCESS)
}
