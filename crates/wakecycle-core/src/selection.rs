//! Conversion between wheel selections and absolute instants.
//!
//! A [`TimeOfDaySelection`] is the raw state of the three wheels. Turning it
//! into an instant always projects the time of day onto *tomorrow* in the
//! configured region, relative to the conversion's "now".
//!
//! ## 12-hour convention
//!
//! The hour wheel offers `00..=12`. Both `0` and `12` mean the top of the
//! half-day: `12 AM` and `0 AM` are midnight (`00:xx`), `12 PM` and `0 PM`
//! are noon (`12:xx`). The reverse mapping always yields `0..=11`, so a
//! selection with hour `12` comes back as hour `0` with the same meridiem.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::region::CalendarRegion;
use crate::rounding::DEFAULT_WHEEL_STEP_MINUTES;

/// Positions of the hour, minute and AM/PM wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDaySelection {
    /// 12-hour label, `0..=12`.
    pub hour: u32,
    pub minute: u32,
    pub is_am: bool,
}

impl TimeOfDaySelection {
    pub fn new(hour: u32, minute: u32, is_am: bool) -> Self {
        Self { hour, minute, is_am }
    }

    /// Hour on a 24-hour clock, or `None` when the fields are out of range.
    pub fn hour_24(&self) -> Option<u32> {
        if self.hour > 12 || self.minute > 59 {
            return None;
        }
        let base = self.hour % 12;
        Some(if self.is_am { base } else { base + 12 })
    }

    /// Build a selection from a wall-clock time. Seconds are dropped.
    pub fn from_time(time: NaiveTime) -> Self {
        let hour = time.hour();
        Self {
            hour: hour % 12,
            minute: time.minute(),
            is_am: hour < 12,
        }
    }
}

/// Maps between wheel selections and instants in one fixed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeComponentConverter {
    region: CalendarRegion,
    step_minutes: u32,
}

impl Default for TimeComponentConverter {
    fn default() -> Self {
        Self::new(CalendarRegion::default(), DEFAULT_WHEEL_STEP_MINUTES)
    }
}

impl TimeComponentConverter {
    /// `step_minutes` is the minute wheel's granularity; zero falls back to
    /// one-minute steps.
    pub fn new(region: CalendarRegion, step_minutes: u32) -> Self {
        Self {
            region,
            step_minutes: step_minutes.max(1),
        }
    }

    pub fn region(&self) -> CalendarRegion {
        self.region
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    /// Project `selection` onto the day after `now`'s date in the region.
    ///
    /// The minute must sit on a wheel row. Ambiguous local times (a repeated
    /// hour) resolve to the earlier instant; local times that do not exist
    /// are an error.
    pub fn to_instant(
        &self,
        selection: TimeOfDaySelection,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, CalendarError> {
        let invalid = CalendarError::InvalidTimeOfDay {
            hour: selection.hour,
            minute: selection.minute,
        };
        if selection.minute % self.step_minutes != 0 {
            return Err(invalid);
        }
        let hour = selection.hour_24().ok_or(invalid)?;
        let time = NaiveTime::from_hms_opt(hour, selection.minute, 0).ok_or(
            CalendarError::InvalidTimeOfDay {
                hour,
                minute: selection.minute,
            },
        )?;

        let today = self.region.date_of(now);
        let tomorrow = today.succ_opt().ok_or_else(|| CalendarError::UnresolvableDate {
            date: today,
            zone: self.region.name().to_string(),
        })?;
        let local = tomorrow.and_time(time);

        local
            .and_local_timezone(self.region.zone())
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| CalendarError::NonexistentLocalTime {
                local,
                zone: self.region.name().to_string(),
            })
    }

    /// Read an instant back as wheel positions. The minute is not rounded;
    /// snap with [`crate::rounding::RoundingPolicy`] first when the instant
    /// did not come from the wheels.
    pub fn to_selection(&self, instant: DateTime<Utc>) -> TimeOfDaySelection {
        TimeOfDaySelection::from_time(self.region.localize(instant).time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    #[test]
    fn pm_selection_lands_on_tomorrow() {
        let converter = TimeComponentConverter::default();
        let now = at("2024-06-01T10:00:00+09:00");
        let target = converter
            .to_instant(TimeOfDaySelection::new(11, 55, false), now)
            .unwrap();
        assert_eq!(target, at("2024-06-02T23:55:00+09:00"));
    }

    #[test]
    fn tomorrow_is_taken_from_region_date() {
        let converter = TimeComponentConverter::default();
        // 16:30 UTC on May 31st is 01:30 on June 1st in Seoul.
        let now = at("2024-05-31T16:30:00Z");
        let target = converter
            .to_instant(TimeOfDaySelection::new(7, 0, true), now)
            .unwrap();
        assert_eq!(target, at("2024-06-02T07:00:00+09:00"));
    }

    #[test]
    fn month_end_rolls_over() {
        let converter = TimeComponentConverter::default();
        let now = at("2024-12-31T22:00:00+09:00");
        let target = converter
            .to_instant(TimeOfDaySelection::new(6, 30, true), now)
            .unwrap();
        assert_eq!(
            converter.region().date_of(target),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn twelve_follows_midnight_noon_convention() {
        assert_eq!(TimeOfDaySelection::new(12, 0, true).hour_24(), Some(0));
        assert_eq!(TimeOfDaySelection::new(12, 0, false).hour_24(), Some(12));
        assert_eq!(TimeOfDaySelection::new(0, 0, true).hour_24(), Some(0));
        assert_eq!(TimeOfDaySelection::new(0, 0, false).hour_24(), Some(12));
    }

    #[test]
    fn twelve_reads_back_as_zero() {
        let converter = TimeComponentConverter::default();
        let now = at("2024-06-01T10:00:00+09:00");
        let target = converter
            .to_instant(TimeOfDaySelection::new(12, 15, false), now)
            .unwrap();
        assert_eq!(converter.to_selection(target), TimeOfDaySelection::new(0, 15, false));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let converter = TimeComponentConverter::default();
        let now = at("2024-06-01T10:00:00+09:00");
        let err = converter
            .to_instant(TimeOfDaySelection::new(13, 0, true), now)
            .unwrap_err();
        assert_eq!(err, CalendarError::InvalidTimeOfDay { hour: 13, minute: 0 });
        assert!(converter
            .to_instant(TimeOfDaySelection::new(3, 60, true), now)
            .is_err());
    }

    #[test]
    fn off_step_minute_is_rejected() {
        let converter = TimeComponentConverter::default();
        let now = at("2024-06-01T10:00:00+09:00");
        let err = converter
            .to_instant(TimeOfDaySelection::new(7, 7, true), now)
            .unwrap_err();
        assert_eq!(err, CalendarError::InvalidTimeOfDay { hour: 7, minute: 7 });

        let fine = TimeComponentConverter::new(CalendarRegion::default(), 1);
        assert!(fine.to_instant(TimeOfDaySelection::new(7, 7, true), now).is_ok());
    }

    #[test]
    fn gap_in_local_time_is_an_error() {
        // 2024-03-10 02:30 does not exist in New York.
        let region = CalendarRegion::from_name("America/New_York").unwrap();
        let converter = TimeComponentConverter::new(region, 5);
        let now = at("2024-03-09T12:00:00-05:00");
        let err = converter
            .to_instant(TimeOfDaySelection::new(2, 30, true), now)
            .unwrap_err();
        assert!(matches!(err, CalendarError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn to_selection_keeps_unrounded_minute() {
        let converter = TimeComponentConverter::default();
        let sel = converter.to_selection(at("2024-06-01T15:07:42+09:00"));
        assert_eq!(sel, TimeOfDaySelection::new(3, 7, false));
    }

    proptest! {
        #[test]
        fn selection_round_trips(
            hour in 0u32..12,
            step in 0u32..12,
            is_am in any::<bool>(),
            now_secs in 946_684_800i64..4_102_444_800i64,
        ) {
            let converter = TimeComponentConverter::default();
            let now = DateTime::from_timestamp(now_secs, 0).unwrap();
            let selection = TimeOfDaySelection::new(hour, step * 5, is_am);
            let instant = converter.to_instant(selection, now).unwrap();
            prop_assert_eq!(converter.to_selection(instant), selection);
        }
    }
}
