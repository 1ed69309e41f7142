//! Terminal output: severity-marked progress lines, spinners and the
//! post-install summary.

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Leading mark of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Step,
    Success,
    Warning,
    Info,
}

impl Mark {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Step => "→",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
        }
    }

    fn style(self, styles: &Styles) -> Style {
        match self {
            Self::Step => styles.step,
            Self::Success => styles.success,
            Self::Warning => styles.warning,
            Self::Info => styles.info,
        }
    }
}

/// Where and how progress is printed. Everything here goes to stdout and is
/// dropped under `--quiet`; errors are printed by `main` on stderr.
pub struct OutputContext {
    pub styles: Styles,
    /// Stdout is a terminal; spinners are only drawn on one.
    pub is_tty: bool,
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are on only for a terminal, without `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let colors = is_tty && !no_color && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: Styles::for_terminal(colors),
            is_tty,
            quiet,
        }
    }

    /// Spinners replace step lines on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print `msg` behind `mark`.
    pub fn line(&self, mark: Mark, msg: &str) {
        if self.quiet {
            return;
        }
        println!("  {} {msg}", mark.glyph().style(mark.style(&self.styles)));
    }

    pub fn step(&self, msg: &str) {
        self.line(Mark::Step, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(Mark::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Mark::Warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line(Mark::Info, msg);
    }

    /// Blank line, then `title` in the header style.
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!();
            println!("  {}", title.style(self.styles.header));
        }
    }

    /// One `key  value` row of the access summary.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("    {}  {value}", key.style(self.styles.dim));
        }
    }
}
