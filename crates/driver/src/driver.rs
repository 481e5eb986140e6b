//! Lifeline Driver - wires the extractor, notifier and poll loop together.

use std::time::Duration;

use config::{CheckinOpts, Opts};
use extractor::Extractor;
use eyre::{Context, Result};
use notifier::Mailer;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::info;

use crate::{
    cursor::BlockRangeTracker,
    cycle::run_poll_loop,
    watcher::CheckinWatcher,
};

/// Long-running service that polls the vault for events and delivers
/// notifications.
#[derive(Debug)]
pub struct Driver {
    extractor: Extractor,
    mailer: Mailer,
    tracker: BlockRangeTracker,
    poll_interval: Duration,
    checkin: CheckinOpts,
}

impl Driver {
    /// Create a new driver with the given configuration.
    ///
    /// Reads the current chain head to seed the cursor; this is the only
    /// fallible step that is allowed to abort the process. Events emitted
    /// before startup are never replayed.
    pub async fn new(opts: Opts) -> Result<Self> {
        info!("Initializing driver");

        let extractor = Extractor::new(
            opts.rpc.url,
            opts.vault.address,
            Duration::from_secs(opts.poll.fetch_timeout_secs),
        );

        let head = extractor.head_block().await.wrap_err(
            "failed to reach the chain at startup; check RPC_URL and network connectivity",
        )?;
        info!(head_block = head, "Starting at the current chain head");

        let tracker = BlockRangeTracker::new(head, opts.poll.max_blocks_per_poll);
        let mailer = Mailer::new(
            opts.mail.api_url,
            opts.mail.api_key,
            opts.mail.from,
            Duration::from_secs(opts.mail.send_timeout_secs),
        );

        Ok(Self {
            extractor,
            mailer,
            tracker,
            poll_interval: Duration::from_secs(opts.poll.interval_secs),
            checkin: opts.checkin,
        })
    }

    /// Start the poll loop, running until the process is stopped.
    pub async fn start(self) -> Result<()> {
        self.start_with_shutdown(None).await
    }

    /// Start the poll loop with graceful shutdown support. An in-flight
    /// cycle is allowed to finish before the loop exits, so the cursor is
    /// never advanced for an abandoned window.
    pub async fn start_with_shutdown(
        self,
        shutdown_rx: Option<broadcast::Receiver<()>>,
    ) -> Result<()> {
        let watcher_handle = self.spawn_watcher();

        info!(poll_interval = ?self.poll_interval, "Starting poll loop");
        let tracker = run_poll_loop(
            &self.extractor,
            &self.mailer,
            self.tracker,
            self.poll_interval,
            shutdown_rx,
        )
        .await;
        info!(last_processed_block = tracker.current(), "Poll loop stopped");

        if let Some(handle) = watcher_handle {
            handle.abort();
        }
        Ok(())
    }

    fn spawn_watcher(&self) -> Option<JoinHandle<()>> {
        let Some(user) = self.checkin.watch_address else {
            info!("No watch address configured; check-in watcher disabled");
            return None;
        };
        let watcher = CheckinWatcher::new(
            self.extractor.clone(),
            user,
            self.checkin.policy,
            Duration::from_secs(self.checkin.recheck_secs),
        );
        Some(watcher.spawn())
    }
}
