//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod env_patch;
pub mod host_setup;
pub mod install;
pub mod readiness;
pub mod user_provision;
pub mod verify;
