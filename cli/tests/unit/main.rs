//! Unit tests for silex-deploy
//!
//! These tests drive adapters and services through fakes; nothing touches
//! docker, apt or the network.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod helpers;

mod docker_adapter;
mod install_pipeline;
