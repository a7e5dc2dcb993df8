//! Sleep-cycle recommendation.
//!
//! A wake time is recommended when the time until it is within a tolerance
//! of a whole number of sleep cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SECS_PER_HOUR: i64 = 3600;
pub const SECS_PER_MINUTE: i64 = 60;

/// 90 minutes.
pub const DEFAULT_CYCLE_SECS: i64 = 90 * 60;
/// 10 minutes.
pub const DEFAULT_TOLERANCE_SECS: i64 = 10 * 60;
pub const ONE_DAY_SECS: i64 = 24 * 60 * 60;

/// Cycle length and tolerance, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePolicy {
    pub cycle_secs: i64,
    pub tolerance_secs: i64,
}

impl Default for CyclePolicy {
    fn default() -> Self {
        Self {
            cycle_secs: DEFAULT_CYCLE_SECS,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

/// Hour/minute breakdown of a duration plus the recommendation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleBreakdown {
    pub diff_hours: i64,
    pub diff_minutes: i64,
    pub recommended: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleRecommendationCalculator {
    policy: CyclePolicy,
}

impl CycleRecommendationCalculator {
    pub fn new(policy: CyclePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    /// Classify a non-negative duration. Negative input is treated as zero.
    pub fn classify(&self, diff_secs: i64) -> CycleBreakdown {
        let diff = diff_secs.max(0);
        CycleBreakdown {
            diff_hours: diff / SECS_PER_HOUR,
            diff_minutes: (diff % SECS_PER_HOUR) / SECS_PER_MINUTE,
            recommended: self.is_within_cycle(diff),
        }
    }

    fn is_within_cycle(&self, diff_secs: i64) -> bool {
        let CyclePolicy {
            cycle_secs,
            tolerance_secs,
        } = self.policy;
        if cycle_secs <= 0 {
            return false;
        }
        let remainder = diff_secs.rem_euclid(cycle_secs);
        remainder <= tolerance_secs || (cycle_secs - remainder) <= tolerance_secs
    }
}

/// Whole seconds from `now` until `target`, wrapping targets that are not in
/// the future onto the next day.
///
/// A target at or before `now` yields `one_day_secs - lag`. A lag longer than
/// a day is folded into `(0, one_day_secs]`, so a target in the past is
/// always within `0..one_day_secs`. A target equal to `now` counts as a full
/// day away.
pub fn seconds_until(target: DateTime<Utc>, now: DateTime<Utc>, one_day_secs: i64) -> i64 {
    if target > now {
        return (target - now).num_seconds();
    }
    let mut lag = (now - target).num_seconds();
    if lag > one_day_secs && one_day_secs > 0 {
        lag = (lag - 1).rem_euclid(one_day_secs) + 1;
    }
    (one_day_secs - lag).max(0)
}
