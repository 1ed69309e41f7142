//! `ProgressReporter` backed by the terminal.

use crate::application::ports::ProgressReporter;
use crate::output::{Mark, OutputContext};

/// Prints service progress through an `OutputContext`; silent under `--quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.line(Mark::Step, message);
    }

    fn success(&self, message: &str) {
        self.ctx.line(Mark::Success, message);
    }

    fn warn(&self, message: &str) {
        self.ctx.line(Mark::Warning, message);
    }
}
