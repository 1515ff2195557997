//! Repeated readiness checks on a fixed interval.
//!
//! The pipeline never signals completion, and a fresh object may not show up
//! in the next listing, so the only synchronization is to ask again later.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};

use vsum_models::{ArtifactKeys, ArtifactRole};

use crate::error::{ArtifactError, ArtifactResult};
use crate::readiness::{Readiness, ReadinessChecker};

/// Interval the browser loading page also uses between checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Give up after this long by default.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Consecutive transport failures tolerated before the poll aborts.
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Polls a [`ReadinessChecker`] until the result set is complete.
#[derive(Clone)]
pub struct ReadinessPoller {
    checker: ReadinessChecker,
    interval: Duration,
    timeout: Duration,
    max_consecutive_errors: u32,
}

impl ReadinessPoller {
    pub fn new(checker: ReadinessChecker) -> Self {
        Self {
            checker,
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_consecutive_errors(mut self, max: u32) -> Self {
        self.max_consecutive_errors = max;
        self
    }

    /// Check on every tick until ready, the timeout elapses, or the store
    /// keeps failing.
    ///
    /// The first check runs immediately. Dropping the returned future stops
    /// polling; there is nothing to clean up.
    pub async fn wait_until_ready(&self) -> ArtifactResult<ArtifactKeys> {
        let started = Instant::now();
        let deadline = started + self.timeout;

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut consecutive_errors = 0u32;
        let mut missing: Vec<ArtifactRole> = ArtifactRole::ALL.to_vec();
        let mut attempts = 0u32;

        loop {
            ticker.tick().await;
            attempts += 1;

            match self.checker.check().await {
                Ok(Readiness::Ready(keys)) => {
                    info!(
                        attempts,
                        waited_ms = started.elapsed().as_millis() as u64,
                        "Artifacts ready"
                    );
                    return Ok(keys);
                }
                Ok(Readiness::Pending { missing: now_missing }) => {
                    consecutive_errors = 0;
                    missing = now_missing;
                }
                Err(ArtifactError::Store(e)) if consecutive_errors < self.max_consecutive_errors => {
                    consecutive_errors += 1;
                    warn!(
                        error = %e,
                        consecutive_errors,
                        "Readiness check failed, retrying on next tick"
                    );
                }
                Err(e) => return Err(e),
            }

            if Instant::now() + self.interval > deadline {
                return Err(ArtifactError::PollTimeout {
                    waited: started.elapsed(),
                    missing,
                });
            }
        }
    }
}
