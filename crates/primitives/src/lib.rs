//! Shared pure helpers: token amount formatting and check-in freshness.
pub mod amount;
pub mod freshness;

pub use amount::format_units;
pub use freshness::{FreshnessPolicy, is_current, is_current_in_tz};
