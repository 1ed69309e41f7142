//! Application service: wait for the application container to report ready.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::ports::{ContainerLogs, Sleeper};
use crate::domain::error::ReadinessError;
use crate::domain::readiness::{DeploymentTarget, PollPolicy, ReadinessOutcome, contains_marker};

/// What to poll and for how long.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    pub target: &'a DeploymentTarget,
    pub marker: &'a str,
    pub policy: PollPolicy,
}

/// Poll the target's log tail until `probe.marker` shows up.
///
/// Each attempt fetches the last `tail_lines` lines. The first match returns
/// [`ReadinessOutcome::Ready`] without sleeping again. Every miss is followed
/// by one `policy.interval` sleep, so an exhausted budget costs exactly
/// `max_attempts` attempts and `max_attempts` sleeps. A failed log fetch
/// counts as a miss.
///
/// `elapsed` is the sum of requested sleeps, not wall-clock time.
///
/// # Errors
///
/// Returns an error only for an invalid probe (zero attempts or an empty
/// marker). Running out of attempts is an outcome, not an error.
pub async fn wait_ready(
    logs: &impl ContainerLogs,
    sleeper: &impl Sleeper,
    probe: Probe<'_>,
) -> Result<ReadinessOutcome> {
    probe.policy.validate()?;
    if probe.marker.is_empty() {
        return Err(ReadinessError::EmptyMarker.into());
    }

    let mut elapsed = Duration::ZERO;
    for attempt in 1..=probe.policy.max_attempts {
        match logs.fetch_log_tail(probe.target).await {
            Ok(lines) if contains_marker(&lines, probe.marker) => {
                debug!(attempt, container = %probe.target.container, "readiness marker found");
                return Ok(ReadinessOutcome::Ready {
                    attempts: attempt,
                    elapsed,
                });
            }
            Ok(lines) => {
                debug!(attempt, lines = lines.len(), "readiness marker not found yet");
            }
            Err(e) => {
                debug!(attempt, error = %format!("{e:#}"), "log fetch failed");
            }
        }
        sleeper.sleep(probe.policy.interval).await;
        elapsed = elapsed.saturating_add(probe.policy.interval);
    }

    Ok(ReadinessOutcome::TimedOut {
        attempts: probe.policy.max_attempts,
        elapsed,
    })
}
