//! Check-in freshness evaluation.
//!
//! Given the last on-chain check-in timestamp and the current time, decide
//! whether the user is "current". The policy is an explicit configuration
//! value, selectable at startup, never a code branch.

use std::{str::FromStr, time::Duration};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use thiserror::Error;

/// Policy used to decide whether a check-in is still fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessPolicy {
    /// Fresh iff the last check-in falls on the same local calendar day as
    /// `now`. The boundary is exactly local midnight, so this policy is
    /// wall-clock and timezone sensitive.
    SameCalendarDay,
    /// Fresh iff strictly less than the given duration has elapsed since the
    /// last check-in. Used with short windows for testing.
    RollingWindow(Duration),
}

/// Error returned when a policy string cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid check-in policy {0:?}, expected \"daily\" or \"window:<secs>\"")]
pub struct ParsePolicyError(String);

impl FromStr for FreshnessPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("daily") {
            return Ok(Self::SameCalendarDay);
        }
        if let Some(secs) = s.strip_prefix("window:") {
            let secs: u64 = secs.parse().map_err(|_| ParsePolicyError(s.to_owned()))?;
            return Ok(Self::RollingWindow(Duration::from_secs(secs)));
        }
        Err(ParsePolicyError(s.to_owned()))
    }
}

/// Evaluate freshness in an explicit timezone. Pure: the result depends only
/// on the arguments, so periodic re-evaluation cannot drift.
pub fn is_current_in_tz<Tz: TimeZone>(
    last_check_in: DateTime<Utc>,
    now: DateTime<Utc>,
    policy: FreshnessPolicy,
    tz: &Tz,
) -> bool {
    match policy {
        FreshnessPolicy::SameCalendarDay => {
            last_check_in.with_timezone(tz).date_naive() == now.with_timezone(tz).date_naive()
        }
        FreshnessPolicy::RollingWindow(window) => {
            let elapsed = now.signed_duration_since(last_check_in);
            match TimeDelta::from_std(window) {
                Ok(window) => elapsed < window,
                // A window too large for chrono never expires.
                Err(_) => true,
            }
        }
    }
}

/// Evaluate freshness in the evaluator's local timezone.
pub fn is_current(last_check_in: DateTime<Utc>, now: DateTime<Utc>, policy: FreshnessPolicy) -> bool {
    is_current_in_tz(last_check_in, now, policy, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn same_local_day_across_utc_midnight() {
        // 23:59:59Z and 00:00:01Z the next UTC day are both Jan 2 in UTC+1.
        let tz = FixedOffset::east_opt(3600).unwrap();
        let last = utc("2024-01-01T23:59:59Z");
        let now = utc("2024-01-02T00:00:01Z");
        assert!(is_current_in_tz(last, now, FreshnessPolicy::SameCalendarDay, &tz));
    }

    #[test]
    fn next_local_day_is_stale() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let last = utc("2024-01-01T23:59:59Z");
        let now = utc("2024-01-03T00:00:01Z");
        assert!(!is_current_in_tz(last, now, FreshnessPolicy::SameCalendarDay, &tz));
    }

    #[test]
    fn day_boundary_is_local_midnight() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let last = utc("2024-01-01T12:00:00Z");
        let just_before = utc("2024-01-01T23:59:59Z");
        let just_after = utc("2024-01-02T00:00:00Z");
        assert!(is_current_in_tz(last, just_before, FreshnessPolicy::SameCalendarDay, &tz));
        assert!(!is_current_in_tz(last, just_after, FreshnessPolicy::SameCalendarDay, &tz));
    }

    #[test]
    fn rolling_window_is_strict() {
        let policy = FreshnessPolicy::RollingWindow(Duration::from_secs(30));
        let last = utc("2024-01-01T00:00:00Z");
        assert!(is_current(last, utc("2024-01-01T00:00:29Z"), policy));
        assert!(!is_current(last, utc("2024-01-01T00:00:31Z"), policy));
        // Exactly at the boundary the check-in has expired.
        assert!(!is_current(last, utc("2024-01-01T00:00:30Z"), policy));
    }

    #[test]
    fn parse_policy_strings() {
        assert_eq!("daily".parse::<FreshnessPolicy>().unwrap(), FreshnessPolicy::SameCalendarDay);
        assert_eq!(
            "window:30".parse::<FreshnessPolicy>().unwrap(),
            FreshnessPolicy::RollingWindow(Duration::from_secs(30))
        );
        assert!("hourly".parse::<FreshnessPolicy>().is_err());
        assert!("window:abc".parse::<FreshnessPolicy>().is_err());
    }
}
