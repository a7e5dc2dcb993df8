//! Snapping instants onto wheel steps.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use crate::region::CalendarRegion;

/// Minute granularity of the wheel surface.
pub const DEFAULT_WHEEL_STEP_MINUTES: u32 = 5;

/// Rounds instants to the nearest wheel step in the region's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    step_minutes: u32,
    region: CalendarRegion,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WHEEL_STEP_MINUTES, CalendarRegion::default())
    }
}

impl RoundingPolicy {
    /// `step_minutes` must be non-zero; zero falls back to one-minute steps.
    pub fn new(step_minutes: u32, region: CalendarRegion) -> Self {
        Self {
            step_minutes: step_minutes.max(1),
            region,
        }
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// Round-half-up to the nearest step.
    ///
    /// Rolling past `:55` carries into the next hour; rolling past `23:xx`
    /// wraps the hour to `00` on the *same* local date, since only the time
    /// of day is used to pick wheel rows. Seconds are kept, sub-second
    /// precision is dropped. A rebuilt local time that falls into a gap
    /// (e.g. spring-forward) moves forward step by step to the first wall
    /// time that exists, so the minute always stays on a step.
    pub fn round_to_step(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.region.localize(instant);
        let (hour, minute) = round_time_of_day(local.hour(), local.minute(), self.step_minutes);

        let Some(time) = NaiveTime::from_hms_opt(hour, minute, local.second()) else {
            return instant;
        };
        let rounded = local.date_naive().and_time(time);
        let step = Duration::minutes(i64::from(self.step_minutes));
        let max_steps = (24 * 60 / self.step_minutes).max(1) as i32;

        (0..=max_steps)
            .filter_map(|k| rounded.checked_add_signed(step * k))
            .find_map(|candidate| candidate.and_local_timezone(self.region.zone()).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(instant)
    }
}

fn round_time_of_day(hour: u32, minute: u32, step: u32) -> (u32, u32) {
    let mut new_minute = (minute + step / 2) / step * step;
    let mut new_hour = hour;
    if new_minute >= 60 {
        new_minute -= 60;
        new_hour += 1;
        if new_hour >= 24 {
            new_hour = 0;
        }
    }
    (new_hour, new_minute)
}
