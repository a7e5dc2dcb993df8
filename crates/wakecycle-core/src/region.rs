//! Fixed calendar region.
//!
//! Wheel selections only carry a time of day, so every conversion needs a
//! calendar to project it onto a date. The region is pinned by
//! configuration instead of following the device zone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Zone used when nothing is configured.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Seoul";

/// Display format for instants in log lines and CLI output.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Gregorian calendar in a fixed IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarRegion {
    zone: Tz,
}

impl CalendarRegion {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Resolve an IANA zone name such as `Asia/Seoul`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|e| ConfigError::InvalidValue {
                key: "region.time_zone".into(),
                message: format!("{e}"),
            })
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn name(&self) -> &'static str {
        self.zone.name()
    }

    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.zone)
    }

    /// Calendar date of `instant` in this region.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.localize(instant).date_naive()
    }

    pub fn format(&self, instant: DateTime<Utc>) -> String {
        self.localize(instant).format(DATETIME_FORMAT).to_string()
    }
}

impl Default for CalendarRegion {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Seoul)
    }
}

impl TryFrom<String> for CalendarRegion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<CalendarRegion> for String {
    fn from(region: CalendarRegion) -> Self {
        region.name().to_string()
    }
}
