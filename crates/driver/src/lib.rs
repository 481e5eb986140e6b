//! Lifeline Driver crate root
#![allow(clippy::uninlined_format_args)]

pub mod cursor;
pub mod cycle;
pub mod driver;
pub mod watcher;

pub use cursor::{BlockRangeTracker, CursorError};
pub use cycle::{CycleOutcome, EventSource, NotificationSink, run_cycle};
pub use driver::Driver;
