//! Command implementations

pub mod config;
pub mod env;
pub mod install;
pub mod user;
pub mod verify;
pub mod version;
pub mod wait;
