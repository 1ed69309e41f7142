//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, Docker
//! and host administration, filesystem access, and HTTP.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod auth;
pub mod clock;
pub mod command_runner;
pub mod config;
pub mod docker;
pub mod env_store;
pub mod host;
