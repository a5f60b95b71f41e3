//! Mapping of authors and assignees to email addresses.

use crate::config::RecipientConfig;
use std::collections::HashMap;

/// Who receives a group of findings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Recipient {
    /// Findings whose author could not be mapped to an email.
    CatchAll,
    Email(String),
}

/// Identities that map to a known email.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    aliases: HashMap<String, String>,
}

impl AddressBook {
    /// `john.smith@example.com` is known as `john.smith` and `jsmith`.
    /// Explicit aliases take precedence. Colliding derived aliases are not
    /// detected: the last listed email wins.
    pub fn new(config: &RecipientConfig) -> Self {
        let mut aliases = HashMap::new();
        for email in &config.list {
            let fullname = email.split('@').next().unwrap_or(email);
            aliases.insert(fullname.to_string(), email.clone());
            if let Some((firstname, lastname)) = fullname.split_once('.') {
                if let Some(initial) = firstname.chars().next() {
                    aliases.insert(format!("{initial}{lastname}"), email.clone());
                }
            }
        }
        for (alias, email) in &config.aliases {
            aliases.insert(alias.clone(), email.clone());
        }
        Self { aliases }
    }

    /// Email of `identity`, which may already be an email.
    pub fn email_for(&self, identity: &str) -> Option<String> {
        if identity.contains('@') {
            return Some(identity.to_string());
        }
        self.aliases.get(identity).cloned()
    }

    pub fn recipient_for(&self, identity: &str) -> Recipient {
        self.email_for(identity).map_or(Recipient::CatchAll, Recipient::Email)
    }
}
