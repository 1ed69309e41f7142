//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Readiness errors ─────────────────────────────────────────────────────────

/// Invalid readiness polling parameters.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("readiness.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("readiness.marker must not be empty")]
    EmptyMarker,

    #[error("readiness interval of {secs}s is longer than the {max}s limit")]
    IntervalTooLong { secs: u64, max: u64 },
}

// ── Provisioning errors ──────────────────────────────────────────────────────

/// Errors raised while provisioning the admin account.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Invalid identity '{0}': expected an email address such as admin@opensilex.org")]
    InvalidIdentity(String),

    #[error("Invalid language '{0}': expected a two-letter code such as 'fr' or 'en'")]
    InvalidLang(String),

    #[error("Creating user '{identity}' failed (exit code {code}).\n\nInspect with: {hint}")]
    CreateFailed {
        identity: String,
        code: String,
        hint: String,
    },
}

// ── Env file errors ──────────────────────────────────────────────────────────

/// Errors raised by environment-file mutations.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("Invalid env key '{0}': must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    InvalidKey(String),

    #[error("Invalid value for {key}: values must be a single line")]
    MultilineValue { key: String },
}

// ── Config errors ────────────────────────────────────────────────────────────

/// Errors related to the deploy configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
