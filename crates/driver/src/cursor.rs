//! Processed-range bookkeeping.

use thiserror::Error;

/// Error returned when the cursor is asked to move backwards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// The requested position precedes the current cursor. Defensive: the
    /// single-flow poll loop never produces this, so it is logged as an
    /// invariant violation rather than crashing the process.
    #[error("cannot advance cursor to block {requested}, already at {current}")]
    InvalidAdvance {
        /// Current cursor position.
        current: u64,
        /// Requested (rejected) position.
        requested: u64,
    },
}

/// Tracks the last fully-processed block and derives the next fetch window.
///
/// The cursor is monotonically non-decreasing and advances only after every
/// event in a window has been routed and had a delivery attempt. It is owned
/// by the single poll-cycle owner; scaling to multiple instances would
/// require partitioning or locking it externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRangeTracker {
    last_processed: u64,
    max_window: u64,
}

impl BlockRangeTracker {
    /// Create a tracker starting at `last_processed` (typically the chain
    /// head at service start, so history is never replayed). Windows are
    /// capped at `max_window` blocks to respect provider limits on log
    /// queries.
    pub const fn new(last_processed: u64, max_window: u64) -> Self {
        Self { last_processed, max_window: if max_window == 0 { 1 } else { max_window } }
    }

    /// The last fully-processed block number.
    pub const fn current(&self) -> u64 {
        self.last_processed
    }

    /// The next inclusive fetch window given the chain head, or `None` when
    /// there are no new blocks.
    pub const fn next_window(&self, head_block: u64) -> Option<(u64, u64)> {
        if head_block <= self.last_processed {
            return None;
        }
        let from = self.last_processed + 1;
        let capped = self.last_processed.saturating_add(self.max_window);
        let to = if head_block < capped { head_block } else { capped };
        Some((from, to))
    }

    /// Advance the cursor to `to`, after all events in `[current()+1, to]`
    /// have been handled.
    pub fn advance(&mut self, to: u64) -> Result<(), CursorError> {
        if to < self.last_processed {
            return Err(CursorError::InvalidAdvance { current: self.last_processed, requested: to });
        }
        self.last_processed = to;
        Ok(())
    }
}
