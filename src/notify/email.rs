//! Email generation and delivery.

use super::{Mailbox, Recipient};
use crate::config::notifier::{EmailTemplates, SmtpConfig};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use lettre::message::Mailbox as Address;
use lettre::{Message, SmtpTransport, Transport};
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Replace `{name}` placeholders of `template`.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

/// One email per recipient. Findings sent to the catch-all address are
/// sorted youngest first, other recipients keep the repository order.
pub fn generate_emails(
    mailboxes: BTreeMap<Recipient, Mailbox>,
    catch_all: &str,
    warning_delay: i64,
    templates: &EmailTemplates,
    today: NaiveDate,
) -> Vec<Email> {
    let subject =
        fill(&templates.subject, &[("week_number", today.iso_week().week().to_string())]);

    mailboxes
        .into_iter()
        .map(|(recipient, mut mailbox)| {
            if recipient == Recipient::CatchAll {
                mailbox.annotations.sort_by_key(|old| old.annotation.age);
                mailbox.branches.sort_by_key(|branch| branch.age);
            }

            let mut sections = Vec::new();
            if !mailbox.annotations.is_empty() {
                let lines: Vec<String> = mailbox
                    .annotations
                    .iter()
                    .map(|old| {
                        let annotation = &old.annotation;
                        fill(
                            &templates.annotation_line,
                            &[
                                ("age", annotation.age.to_string()),
                                ("repo", old.repo.clone()),
                                ("path", annotation.path.clone()),
                                ("line_no", annotation.line_no.to_string()),
                                ("line_content", annotation.line_content.trim().to_string()),
                            ],
                        )
                    })
                    .collect();
                sections.push(section(&templates.annotations, &lines, warning_delay));
            }
            if !mailbox.branches.is_empty() {
                let lines: Vec<String> = mailbox
                    .branches
                    .iter()
                    .map(|branch| {
                        fill(
                            &templates.branch_line,
                            &[
                                ("age", branch.age.to_string()),
                                ("repo", branch.repo.clone()),
                                ("branch_details", branch.name_and_details()),
                            ],
                        )
                    })
                    .collect();
                sections.push(section(&templates.branches, &lines, warning_delay));
            }

            let to = match recipient {
                Recipient::CatchAll => catch_all.to_string(),
                Recipient::Email(email) => email,
            };
            Email {
                from: templates.sender.clone(),
                to,
                subject: subject.clone(),
                body: format!("{}{}{}", templates.intro, sections.join("\n\n"), templates.outro),
            }
        })
        .collect()
}

fn section(template: &str, lines: &[String], warning_delay: i64) -> String {
    fill(
        template,
        &[
            ("count", lines.len().to_string()),
            ("warning_delay", warning_delay.to_string()),
            ("lines", lines.join("\n")),
        ],
    )
}

/// A way to hand emails over.
pub trait Outbox {
    fn deliver(&self, emails: &[Email]) -> Result<()>;
}

/// Prints emails instead of sending them.
pub struct PrintOutbox;

impl PrintOutbox {
    pub fn write_to(&self, out: &mut dyn Write, emails: &[Email]) -> Result<()> {
        for email in emails {
            writeln!(out, "{}", email.to)?;
            writeln!(out, "{}", email.body)?;
            writeln!(out, "{}", "-".repeat(20))?;
        }
        Ok(())
    }
}

impl Outbox for PrintOutbox {
    fn deliver(&self, emails: &[Email]) -> Result<()> {
        self.write_to(&mut std::io::stdout().lock(), emails)
    }
}

/// Sends emails through an SMTP relay, without TLS or authentication.
pub struct SmtpOutbox {
    transport: SmtpTransport,
}

impl SmtpOutbox {
    pub fn new(config: &SmtpConfig) -> Self {
        let mut builder = SmtpTransport::builder_dangerous(config.host.as_str());
        if config.port != 0 {
            builder = builder.port(config.port);
        }
        Self { transport: builder.build() }
    }
}

impl Outbox for SmtpOutbox {
    fn deliver(&self, emails: &[Email]) -> Result<()> {
        for email in emails {
            let message = to_message(email)?;
            self.transport
                .send(&message)
                .with_context(|| format!("Failed sending e-mail to {}", email.to))?;
            println!("Sent e-mail to {}", email.to);
        }
        Ok(())
    }
}

fn to_message(email: &Email) -> Result<Message> {
    let from: Address =
        email.from.parse().with_context(|| format!("Invalid sender address: {}", email.from))?;
    let to: Address =
        email.to.parse().with_context(|| format!("Invalid recipient address: {}", email.to))?;
    Ok(Message::builder().from(from).to(to).subject(&email.subject).body(email.body.clone())?)
}
