//! The fetch-route-send-advance poll cycle.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use extractor::{Extractor, FetchedEvent};
use futures::{StreamExt, stream};
use notifier::{Mailer, NotificationJob, SendError, route};
use tokio::{sync::broadcast, time::MissedTickBehavior};
use tracing::{debug, error, info};

use crate::cursor::BlockRangeTracker;

/// Number of notification sends dispatched concurrently within one cycle,
/// kept small to respect mail gateway rate limits.
pub const SEND_CONCURRENCY: usize = 4;

/// Read side of the poll cycle: chain head and log-range queries.
#[async_trait]
pub trait EventSource {
    /// Current chain head block number.
    async fn head_block(&self) -> Result<u64>;
    /// All vault events in the inclusive range `[from_block, to_block]`.
    async fn fetch_events(&self, from_block: u64, to_block: u64) -> Result<Vec<FetchedEvent>>;
}

#[async_trait]
impl EventSource for Extractor {
    async fn head_block(&self) -> Result<u64> {
        Self::head_block(self).await
    }

    async fn fetch_events(&self, from_block: u64, to_block: u64) -> Result<Vec<FetchedEvent>> {
        Self::fetch_events(self, from_block, to_block).await
    }
}

/// Delivery side of the poll cycle.
#[async_trait]
pub trait NotificationSink {
    /// Attempt to deliver one notification job.
    async fn send(&self, job: &NotificationJob) -> Result<(), SendError>;
}

#[async_trait]
impl NotificationSink for Mailer {
    async fn send(&self, job: &NotificationJob) -> Result<(), SendError> {
        Self::send(self, job).await
    }
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No new blocks; nothing was fetched.
    Idle,
    /// A window was fetched, routed and the cursor advanced.
    Completed {
        /// First block of the processed window.
        from_block: u64,
        /// Last block of the processed window; the cursor now points here.
        to_block: u64,
        /// Number of events fetched in the window.
        events: usize,
        /// Number of notifications that could not be delivered. These are
        /// dropped, not retried; they never block cursor advancement.
        failed_sends: usize,
    },
}

/// Run one poll cycle: derive the window, fetch, route, send, advance.
///
/// A fetch fault aborts the cycle with the cursor untouched, so the same
/// window is re-derived on the next tick. Send failures are logged and
/// counted per recipient; every queued notification is still attempted, and
/// the cursor advances regardless.
pub async fn run_cycle<S, N>(
    source: &S,
    sink: &N,
    tracker: &mut BlockRangeTracker,
) -> Result<CycleOutcome>
where
    S: EventSource + Sync,
    N: NotificationSink + Sync,
{
    let head = source.head_block().await?;
    let Some((from_block, to_block)) = tracker.next_window(head) else {
        return Ok(CycleOutcome::Idle);
    };

    debug!(from_block, to_block, "Checking block range");
    let events = source.fetch_events(from_block, to_block).await?;

    let observed_at = Utc::now();
    let failed_sends = stream::iter(events.iter())
        .map(|fetched| async move {
            let job = route(&fetched.event, observed_at);
            match sink.send(&job).await {
                Ok(()) => false,
                Err(err) => {
                    error!(
                        error = %err,
                        event = fetched.event.kind(),
                        block_number = fetched.block_number,
                        to = %job.to,
                        "Failed to deliver notification; dropping"
                    );
                    true
                }
            }
        })
        .buffer_unordered(SEND_CONCURRENCY)
        .filter(|failed| std::future::ready(*failed))
        .count()
        .await;

    // Cannot fail for a window derived from this tracker; logged defensively.
    if let Err(err) = tracker.advance(to_block) {
        error!(error = %err, "Refusing invalid cursor advance");
    }

    Ok(CycleOutcome::Completed { from_block, to_block, events: events.len(), failed_sends })
}

/// Drive [`run_cycle`] on a fixed interval until shutdown.
///
/// The loop is single-flow: a cycle runs to completion before the next tick
/// is honored, and ticks that fire while a cycle is still running are
/// dropped, never queued. Cycle faults are logged and the loop keeps going.
pub async fn run_poll_loop<S, N>(
    source: &S,
    sink: &N,
    mut tracker: BlockRangeTracker,
    poll_interval: Duration,
    mut shutdown_rx: Option<broadcast::Receiver<()>>,
) -> BlockRangeTracker
where
    S: EventSource + Sync,
    N: NotificationSink + Sync,
{
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = async {
                match shutdown_rx.as_mut() {
                    Some(rx) => {
                        let _ = rx.recv().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            } => {
                info!("Received shutdown signal, stopping poll loop");
                break;
            }
            _ = interval.tick() => {
                match run_cycle(source, sink, &mut tracker).await {
                    Ok(CycleOutcome::Idle) => debug!("No new blocks"),
                    Ok(CycleOutcome::Completed { from_block, to_block, events, failed_sends }) => {
                        info!(from_block, to_block, events, failed_sends, "Poll cycle completed");
                    }
                    Err(err) => {
                        error!(error = %err, "Poll cycle failed; window will be retried next tick");
                    }
                }
            }
        }
    }

    tracker
}
