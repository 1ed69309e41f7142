//! Integration tests for silex-deploy
//!
//! These tests spawn the actual binary. None of them reach docker: they only
//! exercise commands that work on local files.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod env_command;
