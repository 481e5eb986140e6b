//! Headless check-in freshness watcher.

use std::time::Duration;

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use extractor::Extractor;
use primitives::{FreshnessPolicy, is_current};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Re-evaluates a user's check-in freshness on a fixed cadence.
///
/// Reads the on-chain `lastCheckIn` timestamp each tick and applies the
/// configured [`FreshnessPolicy`]. Presentation only: the result is logged,
/// never written back, and never overrides the contract's own timing logic.
/// Because the evaluation is a pure function of the two timestamps, the
/// periodic re-checks cannot drift.
#[derive(Debug)]
pub struct CheckinWatcher {
    extractor: Extractor,
    user: Address,
    policy: FreshnessPolicy,
    interval: Duration,
    last_status: Option<bool>,
}

impl CheckinWatcher {
    /// Create a new watcher for the given user.
    pub const fn new(
        extractor: Extractor,
        user: Address,
        policy: FreshnessPolicy,
        interval: Duration,
    ) -> Self {
        Self { extractor, user, policy, interval, last_status: None }
    }

    /// Run the watcher loop. Re-evaluates immediately, then on every tick.
    pub async fn run(mut self) {
        info!(user = %self.user, policy = ?self.policy, "Starting check-in watcher");
        let mut interval = tokio::time::interval(self.interval);
        loop {
            interval.tick().await;
            self.check().await;
        }
    }

    /// Spawn the watcher on the Tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn check(&mut self) {
        let last_check_in = match self.extractor.last_check_in(self.user).await {
            Ok(Some(ts)) => ts,
            Ok(None) => {
                warn!(user = %self.user, "Watched user is not registered in the vault");
                return;
            }
            Err(err) => {
                error!(error = %err, user = %self.user, "Failed to read last check-in");
                return;
            }
        };

        let Some(last_check_in) = DateTime::<Utc>::from_timestamp(last_check_in as i64, 0) else {
            error!(user = %self.user, last_check_in, "Last check-in timestamp out of range");
            return;
        };

        let current = is_current(last_check_in, Utc::now(), self.policy);
        if self.last_status != Some(current) {
            info!(
                user = %self.user,
                last_check_in = %last_check_in,
                current,
                "Check-in status changed"
            );
            self.last_status = Some(current);
        } else {
            debug!(user = %self.user, current, "Check-in status unchanged");
        }
    }
}
