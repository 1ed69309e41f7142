//! User identity and account attributes.
//!
//! Pure types and validators; the user directory itself is reached through
//! the `UserDirectory` port.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::ProvisionError;

/// Email-like string that uniquely identifies a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parse an identity.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::InvalidIdentity`] unless the input has a
    /// non-empty local part, a single `@` and a non-empty domain, with no
    /// whitespace.
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        if looks_like_email(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ProvisionError::InvalidIdentity(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ProvisionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = raw.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

/// Attributes passed to the user-creation command.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub identity: Identity,
    pub admin: bool,
    pub lang: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("identity", &self.identity)
            .field("admin", &self.admin)
            .field("lang", &self.lang)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Account {
    /// Validate fields not already guaranteed by [`Identity`].
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::InvalidLang`] unless `lang` is two ASCII
    /// lowercase letters.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        let ok = self.lang.len() == 2 && self.lang.chars().all(|c| c.is_ascii_lowercase());
        if !ok {
            return Err(ProvisionError::InvalidLang(self.lang.clone()));
        }
        Ok(())
    }

    /// Flags for `opensilex.sh user add`, in a stable order.
    #[must_use]
    pub fn create_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(6);
        if self.admin {
            flags.push("--admin".to_string());
        }
        flags.push(format!("--email={}", self.identity));
        flags.push(format!("--lang={}", self.lang));
        flags.push(format!("--firstName={}", self.first_name));
        flags.push(format!("--lastName={}", self.last_name));
        flags.push(format!("--password={}", self.password));
        flags
    }
}

/// Outcome of an idempotent provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The identity was already listed; nothing was created.
    AlreadyExists,
    /// One creation call was issued and succeeded.
    Created,
}

/// Extract every email-like token from free-form user-listing output.
///
/// Tokens are split on whitespace and the separators table renderers use
/// (`|`, `,`, `;`, quotes, brackets).
#[must_use]
pub fn identities_in(listing: &str) -> BTreeSet<Identity> {
    listing
        .split(|c: char| {
            c.is_whitespace() || matches!(c, '|' | ',' | ';' | '"' | '\'' | '<' | '>' | '(' | ')' | '[' | ']')
        })
        .filter_map(|token| Identity::parse(token.trim_end_matches('.')).ok())
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
