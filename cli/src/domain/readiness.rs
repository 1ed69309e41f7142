//! Readiness probe domain types and pure matching functions.
//!
//! This module is free of I/O and async. The polling loop itself lives in
//! `application::services::readiness`.

use std::time::Duration;

use crate::domain::error::ReadinessError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Default number of log checks before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 36;

/// Default spacing between two log checks, in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Longest accepted spacing between two log checks (one hour).
pub const MAX_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default number of log lines fetched per attempt.
pub const DEFAULT_TAIL_LINES: u32 = 50;

// ── Types ────────────────────────────────────────────────────────────────────

/// Bounded, fixed-interval polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of checks. Must be at least 1.
    pub max_attempts: u32,
    /// Constant delay after each non-matching check, at most [`MAX_INTERVAL`].
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl PollPolicy {
    /// Build a validated policy.
    ///
    /// # Errors
    ///
    /// See [`PollPolicy::validate`].
    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self, ReadinessError> {
        let policy = Self {
            max_attempts,
            interval,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::ZeroAttempts`] when `max_attempts` is 0 and
    /// [`ReadinessError::IntervalTooLong`] when `interval` exceeds
    /// [`MAX_INTERVAL`].
    pub fn validate(&self) -> Result<(), ReadinessError> {
        if self.max_attempts == 0 {
            return Err(ReadinessError::ZeroAttempts);
        }
        if self.interval > MAX_INTERVAL {
            return Err(ReadinessError::IntervalTooLong {
                secs: self.interval.as_secs(),
                max: MAX_INTERVAL.as_secs(),
            });
        }
        Ok(())
    }

    /// Total time spent sleeping when no attempt ever matches.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.interval
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }
}

/// The container whose logs are inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    /// Container name or ID, as accepted by `docker logs`.
    pub container: String,
    /// How many trailing log lines to fetch per attempt.
    pub tail_lines: u32,
}

impl DeploymentTarget {
    #[must_use]
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    /// Command an operator can run to follow the logs by hand.
    #[must_use]
    pub fn diagnostic_command(&self) -> String {
        format!("docker logs -f {}", self.container)
    }
}

/// Terminal state of one polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// The marker was found on attempt `attempts`.
    Ready { attempts: u32, elapsed: Duration },
    /// The budget ran out without a match.
    TimedOut { attempts: u32, elapsed: Duration },
}

impl ReadinessOutcome {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Ready { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }
}

// ── Pure functions ───────────────────────────────────────────────────────────

/// Case-sensitive substring search over captured log lines.
///
/// An empty marker never matches; an empty marker would turn every
/// non-empty log into a false "ready".
#[must_use]
pub fn contains_marker(lines: &[String], marker: &str) -> bool {
    !marker.is_empty() && lines.iter().any(|line| line.contains(marker))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
