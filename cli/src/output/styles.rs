//! Terminal stylesheet built on owo-colors.

use owo_colors::Style;

/// Colors for each kind of progress line. `Default` is the plain stylesheet.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marks.
    pub success: Style,
    /// `⚠` marks, used for readiness timeouts and skipped steps.
    pub warning: Style,
    /// `ℹ` marks.
    pub info: Style,
    /// `→` marks.
    pub step: Style,
    /// Keys in the access summary.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    /// Colored stylesheet when `colors` is set, plain otherwise.
    #[must_use]
    pub fn for_terminal(colors: bool) -> Self {
        if !colors {
            return Self::default();
        }
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            info: Style::new().blue(),
            step: Style::new().cyan(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
        }
    }
}
