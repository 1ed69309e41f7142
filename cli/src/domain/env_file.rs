//! In-memory model of a `KEY=value` environment file.
//!
//! The file is parsed once, mutated through [`EnvFile::set`] and
//! [`EnvFile::remove`], and rendered once. Comments, blank lines and lines
//! that do not parse as entries are preserved verbatim, in order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::EnvFileError;

#[allow(clippy::unwrap_used)] // compile-time constant pattern
static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry { key: String, value: String, raw: String },
    Other(String),
}

/// Parsed environment file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    lines: Vec<Line>,
}

/// One `KEY=value` pair of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl EnvFile {
    /// Parse file content. Never fails; unrecognised lines are kept as-is.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let lines = content.lines().map(parse_line).collect();
        Self { lines }
    }

    /// Value of the first entry for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Number of entries carrying `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, Line::Entry { key: k, .. } if k == key))
            .count()
    }

    /// Upsert `key`: the first entry is rewritten in place, later duplicates
    /// are dropped, and the entry is appended when absent.
    ///
    /// Returns `true` when the rendered file changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid identifier or the value
    /// spans several lines.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool, EnvFileError> {
        validate_key(key)?;
        if value.contains('\n') || value.contains('\r') {
            return Err(EnvFileError::MultilineValue {
                key: key.to_string(),
            });
        }

        let before = self.lines.len();
        let mut changed = false;
        let mut seen = false;
        self.lines.retain_mut(|line| {
            let Line::Entry { key: k, value: v, raw } = line else {
                return true;
            };
            if k != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            if v != value {
                // Keep indentation and any `export ` prefix.
                let lhs = raw.split_once('=').map_or(key, |(lhs, _)| lhs);
                *raw = format!("{lhs}={value}");
                *v = value.to_string();
                changed = true;
            }
            true
        });

        if !seen {
            self.lines.push(Line::Entry {
                key: key.to_string(),
                value: value.to_string(),
                raw: format!("{key}={value}"),
            });
            return Ok(true);
        }
        Ok(changed || self.lines.len() != before)
    }

    /// Remove every entry for `key`. Returns `true` if anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !matches!(line, Line::Entry { key: k, .. } if k == key));
        self.lines.len() != before
    }

    /// Apply every pair of `patch` with [`EnvFile::set`].
    ///
    /// Returns the number of keys whose rendering changed.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid pair; earlier pairs stay applied.
    pub fn apply(&mut self, patch: &[EnvVar]) -> Result<usize, EnvFileError> {
        let mut changed = 0;
        for var in patch {
            if self.set(&var.key, &var.value)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Render back to text, one line per entry, with a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Entry { raw, .. } | Line::Other(raw) => out.push_str(raw),
            }
            out.push('\n');
        }
        out
    }
}

fn parse_line(raw: &str) -> Line {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Other(raw.to_string());
    }
    let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    match body.split_once('=') {
        Some((key, value)) if KEY_RE.is_match(key.trim_end()) => Line::Entry {
            key: key.trim_end().to_string(),
            value: value.to_string(),
            raw: raw.to_string(),
        },
        _ => Line::Other(raw.to_string()),
    }
}

fn validate_key(key: &str) -> Result<(), EnvFileError> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(EnvFileError::InvalidKey(key.to_string()))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
