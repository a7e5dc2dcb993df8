//! Injected wall clock.
//!
//! Every engine entry point takes "now" explicitly. Callers that want the
//! real time pass a [`SystemClock`]; tests and the CLI `--now` flag pass a
//! [`FixedClock`].

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant until moved with [`FixedClock::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn set(&mut self, at: DateTime<Utc>) {
        self.at = at;
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance_secs(&mut self, secs: i64) {
        self.at += chrono::Duration::seconds(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
