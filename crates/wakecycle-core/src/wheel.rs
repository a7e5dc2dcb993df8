//! Picker surfaces.
//!
//! [`WheelSurface`] models the three discrete wheels (hour, minute, AM/PM)
//! and [`ContinuousControl`] the free time-of-day control. Both turn user
//! gestures into [`SettingTimeEvent`]s and consume [`SettingTimeUpdate`]s,
//! reprogramming themselves only when the update's directive says so.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rounding::RoundingPolicy;
use crate::selection::{TimeComponentConverter, TimeOfDaySelection};
use crate::state::{EngineSettings, SettingTimeEvent, SettingTimeUpdate, Surface};

/// Language of the meridiem wheel labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerLanguage {
    #[default]
    En,
    Ko,
}

impl PickerLanguage {
    /// `[AM, PM]` labels; row 0 is always AM.
    pub fn meridiem_labels(&self) -> [&'static str; 2] {
        match self {
            PickerLanguage::En => ["AM", "PM"],
            PickerLanguage::Ko => ["오전", "오후"],
        }
    }
}

/// Row indices of the three wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelPosition {
    pub hour_row: usize,
    pub minute_row: usize,
    pub meridiem_row: usize,
}

/// Row values offered by each wheel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelColumns {
    hours: Vec<u32>,
    minutes: Vec<u32>,
    language: PickerLanguage,
}

impl WheelColumns {
    /// Hours `0..=12`, minutes from `0` in `step_minutes` increments.
    pub fn new(step_minutes: u32, language: PickerLanguage) -> Self {
        let step = step_minutes.max(1) as usize;
        Self {
            hours: (0..=12).collect(),
            minutes: (0..60).step_by(step).collect(),
            language,
        }
    }

    pub fn hours(&self) -> &[u32] {
        &self.hours
    }

    pub fn minutes(&self) -> &[u32] {
        &self.minutes
    }

    pub fn hour_labels(&self) -> Vec<String> {
        self.hours.iter().map(|h| format!("{h:02}")).collect()
    }

    pub fn minute_labels(&self) -> Vec<String> {
        self.minutes.iter().map(|m| format!("{m:02}")).collect()
    }

    pub fn meridiem_labels(&self) -> [&'static str; 2] {
        self.language.meridiem_labels()
    }

    /// Rows showing `selection`, or `None` if a value has no row.
    pub fn position_of(&self, selection: TimeOfDaySelection) -> Option<WheelPosition> {
        Some(WheelPosition {
            hour_row: self.hours.iter().position(|&h| h == selection.hour)?,
            minute_row: self.minutes.iter().position(|&m| m == selection.minute)?,
            meridiem_row: if selection.is_am { 0 } else { 1 },
        })
    }

    /// Selection shown by `position`, or `None` for an out-of-range row.
    pub fn selection_at(&self, position: WheelPosition) -> Option<TimeOfDaySelection> {
        let hour = *self.hours.get(position.hour_row)?;
        let minute = *self.minutes.get(position.minute_row)?;
        let is_am = match position.meridiem_row {
            0 => true,
            1 => false,
            _ => return None,
        };
        Some(TimeOfDaySelection { hour, minute, is_am })
    }
}

/// Which wheel a row change happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelColumn {
    Hour,
    Minute,
    Meridiem,
}

/// The hour/minute/AM-PM wheel set.
#[derive(Debug, Clone)]
pub struct WheelSurface {
    columns: WheelColumns,
    converter: TimeComponentConverter,
    rounding: RoundingPolicy,
    position: WheelPosition,
}

impl WheelSurface {
    pub fn new(settings: &EngineSettings, language: PickerLanguage) -> Self {
        Self {
            columns: WheelColumns::new(settings.wheel_step_minutes, language),
            converter: settings.converter(),
            rounding: settings.rounding(),
            position: WheelPosition {
                hour_row: 0,
                minute_row: 0,
                meridiem_row: 0,
            },
        }
    }

    pub fn columns(&self) -> &WheelColumns {
        &self.columns
    }

    pub fn position(&self) -> WheelPosition {
        self.position
    }

    pub fn selection(&self) -> Option<TimeOfDaySelection> {
        self.columns.selection_at(self.position)
    }

    /// Rows an arbitrary instant snaps to.
    pub fn position_for(&self, instant: DateTime<Utc>) -> Option<WheelPosition> {
        let snapped = self.rounding.round_to_step(instant);
        self.columns.position_of(self.converter.to_selection(snapped))
    }

    /// User scrolled `column` to `row`. Returns the event to feed the state,
    /// or `None` if the row does not exist.
    pub fn select_row(&mut self, column: WheelColumn, row: usize) -> Option<SettingTimeEvent> {
        let mut next = self.position;
        match column {
            WheelColumn::Hour => next.hour_row = row,
            WheelColumn::Minute => next.minute_row = row,
            WheelColumn::Meridiem => next.meridiem_row = row,
        }
        let selection = self.columns.selection_at(next)?;
        self.position = next;
        Some(SettingTimeEvent::WheelChanged(selection))
    }

    /// User set all three wheels at once. `None` if a value has no row.
    pub fn select(&mut self, selection: TimeOfDaySelection) -> Option<SettingTimeEvent> {
        self.position = self.columns.position_of(selection)?;
        Some(SettingTimeEvent::WheelChanged(selection))
    }

    /// Consume a published update. Returns whether the rows moved.
    pub fn apply(&mut self, update: &SettingTimeUpdate) -> bool {
        if !update.sync.resyncs(Surface::Wheels) {
            return false;
        }
        match self.position_for(update.result.target_instant) {
            Some(position) => {
                let moved = position != self.position;
                self.position = position;
                moved
            }
            None => false,
        }
    }
}

/// The free-scrolling time-of-day control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuousControl {
    value: Option<DateTime<Utc>>,
}

impl ContinuousControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.value
    }

    /// User moved the control to `instant`.
    pub fn set_value(&mut self, instant: DateTime<Utc>) -> SettingTimeEvent {
        self.value = Some(instant);
        SettingTimeEvent::ContinuousControlChanged(instant)
    }

    /// Consume a published update. Returns whether the value changed.
    pub fn apply(&mut self, update: &SettingTimeUpdate) -> bool {
        if !update.sync.resyncs(Surface::ContinuousControl) {
            return false;
        }
        let target = Some(update.result.target_instant);
        let moved = self.value != target;
        self.value = target;
        moved
    }
}
