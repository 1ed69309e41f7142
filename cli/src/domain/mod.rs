//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod endpoint;
pub mod env_file;
pub mod error;
pub mod readiness;
pub mod user;

pub use config::DeployConfig;
pub use env_file::{EnvFile, EnvVar};
pub use error::{ConfigError, EnvFileError, ProvisionError, ReadinessError};
pub use readiness::{DeploymentTarget, PollPolicy, ReadinessOutcome};
pub use user::{Account, Identity, ProvisionOutcome};
