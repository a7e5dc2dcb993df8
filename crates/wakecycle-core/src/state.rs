//! Setting-time state machine.
//!
//! Holds the single authoritative "selected wake instant" for a screen
//! session and recomputes it on every inbound event. Each event carries the
//! surface it came from, and the emitted [`SyncDirective`] is a pure function
//! of that origin: the surface that produced an edit is never told to
//! reprogram itself, so the two pickers cannot echo each other.
//!
//! ## Transitions
//!
//! ```text
//! ScreenInit                  -> now + default offset      resync both
//! ContinuousControlChanged(t) -> t, wrap-around diff       resync wheels
//! WheelChanged(sel)           -> tomorrow at sel           resync control
//! Confirm                     -> per ConfirmBehavior       resync both
//! ```
//!
//! A wheel edit whose calendar fields cannot be resolved is dropped: the
//! previous state stays and nothing is emitted.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::cycle::{
    seconds_until, CyclePolicy, CycleRecommendationCalculator, ONE_DAY_SECS,
};
use crate::region::CalendarRegion;
use crate::rounding::{RoundingPolicy, DEFAULT_WHEEL_STEP_MINUTES};
use crate::selection::{TimeComponentConverter, TimeOfDaySelection};

/// 6 hours.
pub const DEFAULT_OFFSET_SECS: i64 = 6 * 60 * 60;

/// What the "confirm" action commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmBehavior {
    /// Re-classify the currently displayed target against a fresh "now".
    #[default]
    CommitSelection,
    /// Discard the selection and recompute the default target.
    ResetToDefault,
}

/// Resolved engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub default_offset_secs: i64,
    pub one_day_secs: i64,
    pub cycle: CyclePolicy,
    pub wheel_step_minutes: u32,
    pub confirm: ConfirmBehavior,
    pub region: CalendarRegion,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_offset_secs: DEFAULT_OFFSET_SECS,
            one_day_secs: ONE_DAY_SECS,
            cycle: CyclePolicy::default(),
            wheel_step_minutes: DEFAULT_WHEEL_STEP_MINUTES,
            confirm: ConfirmBehavior::default(),
            region: CalendarRegion::default(),
        }
    }
}

impl EngineSettings {
    pub fn converter(&self) -> TimeComponentConverter {
        TimeComponentConverter::new(self.region, self.wheel_step_minutes)
    }

    pub fn rounding(&self) -> RoundingPolicy {
        RoundingPolicy::new(self.wheel_step_minutes, self.region)
    }
}

/// Input surface that originated an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Wheels,
    ContinuousControl,
}

/// Inbound events, in the order the user produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SettingTimeEvent {
    ScreenInit,
    ContinuousControlChanged(DateTime<Utc>),
    WheelChanged(TimeOfDaySelection),
    Confirm,
}

impl SettingTimeEvent {
    /// `None` for events that do not come from a picker.
    pub fn origin(&self) -> Option<Surface> {
        match self {
            SettingTimeEvent::ScreenInit | SettingTimeEvent::Confirm => None,
            SettingTimeEvent::ContinuousControlChanged(_) => Some(Surface::ContinuousControl),
            SettingTimeEvent::WheelChanged(_) => Some(Surface::Wheels),
        }
    }
}

/// Which surfaces must reprogram their visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDirective {
    pub resync_wheels: bool,
    pub resync_continuous_control: bool,
}

impl SyncDirective {
    pub fn for_origin(origin: Option<Surface>) -> Self {
        Self {
            resync_wheels: origin != Some(Surface::Wheels),
            resync_continuous_control: origin != Some(Surface::ContinuousControl),
        }
    }

    /// Whether the wheel surface must be reprogrammed.
    pub fn needs_picker_resync(&self) -> bool {
        self.resync_wheels
    }

    pub fn resyncs(&self, surface: Surface) -> bool {
        match surface {
            Surface::Wheels => self.resync_wheels,
            Surface::ContinuousControl => self.resync_continuous_control,
        }
    }
}

/// Classified wake target. Replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub target_instant: DateTime<Utc>,
    pub diff_hours: i64,
    pub diff_minutes: i64,
    pub recommended: bool,
}

/// One published state: the result plus how surfaces should react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingTimeUpdate {
    pub result: RecommendationResult,
    pub sync: SyncDirective,
    pub origin: Option<Surface>,
    pub computed_at: DateTime<Utc>,
}

type Observer = Box<dyn FnMut(&SettingTimeUpdate)>;

/// Single source of truth for the selected wake time.
pub struct SettingTimeState {
    settings: EngineSettings,
    converter: TimeComponentConverter,
    calculator: CycleRecommendationCalculator,
    latest: Option<SettingTimeUpdate>,
    observers: Vec<Observer>,
}

impl Default for SettingTimeState {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl std::fmt::Debug for SettingTimeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingTimeState")
            .field("settings", &self.settings)
            .field("latest", &self.latest)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SettingTimeState {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            converter: settings.converter(),
            calculator: CycleRecommendationCalculator::new(settings.cycle),
            settings,
            latest: None,
            observers: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Most recently published update, if any.
    pub fn latest(&self) -> Option<&SettingTimeUpdate> {
        self.latest.as_ref()
    }

    /// Register an observer. It is called synchronously, in registration
    /// order, after every published update.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SettingTimeUpdate) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply one event at the clock's current instant.
    pub fn handle(&mut self, event: SettingTimeEvent, clock: &dyn Clock) -> Option<SettingTimeUpdate> {
        self.apply(event, clock.now())
    }

    /// Apply one event at `now`. Returns the published update, or `None` when
    /// the event was dropped.
    pub fn apply(&mut self, event: SettingTimeEvent, now: DateTime<Utc>) -> Option<SettingTimeUpdate> {
        match event {
            SettingTimeEvent::ScreenInit => self.on_screen_init(now),
            SettingTimeEvent::ContinuousControlChanged(instant) => {
                self.on_continuous_control_changed(instant, now)
            }
            SettingTimeEvent::WheelChanged(selection) => self.on_wheel_changed(selection, now),
            SettingTimeEvent::Confirm => self.on_confirm(now),
        }
    }

    pub fn on_screen_init(&mut self, now: DateTime<Utc>) -> Option<SettingTimeUpdate> {
        let result = self.default_result(now);
        Some(self.publish(result, None, now))
    }

    pub fn on_continuous_control_changed(
        &mut self,
        instant: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<SettingTimeUpdate> {
        let diff = seconds_until(instant, now, self.settings.one_day_secs);
        let result = self.classify(instant, diff);
        Some(self.publish(result, Some(Surface::ContinuousControl), now))
    }

    pub fn on_wheel_changed(
        &mut self,
        selection: TimeOfDaySelection,
        now: DateTime<Utc>,
    ) -> Option<SettingTimeUpdate> {
        let target = match self.converter.to_instant(selection, now) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(?selection, error = %e, "dropping wheel edit");
                return None;
            }
        };
        let diff = seconds_until(target, now, self.settings.one_day_secs);
        let result = self.classify(target, diff);
        Some(self.publish(result, Some(Surface::Wheels), now))
    }

    pub fn on_confirm(&mut self, now: DateTime<Utc>) -> Option<SettingTimeUpdate> {
        let result = match (self.settings.confirm, self.latest) {
            (ConfirmBehavior::CommitSelection, Some(latest)) => {
                let target = latest.result.target_instant;
                let diff = seconds_until(target, now, self.settings.one_day_secs);
                self.classify(target, diff)
            }
            _ => self.default_result(now),
        };
        tracing::info!(
            target_instant = %self.settings.region.format(result.target_instant),
            "wake time confirmed"
        );
        Some(self.publish(result, None, now))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn default_result(&self, now: DateTime<Utc>) -> RecommendationResult {
        let offset = self.settings.default_offset_secs;
        self.classify(now + Duration::seconds(offset), offset)
    }

    fn classify(&self, target: DateTime<Utc>, diff_secs: i64) -> RecommendationResult {
        let breakdown = self.calculator.classify(diff_secs);
        RecommendationResult {
            target_instant: target,
            diff_hours: breakdown.diff_hours,
            diff_minutes: breakdown.diff_minutes,
            recommended: breakdown.recommended,
        }
    }

    fn publish(
        &mut self,
        result: RecommendationResult,
        origin: Option<Surface>,
        now: DateTime<Utc>,
    ) -> SettingTimeUpdate {
        let update = SettingTimeUpdate {
            result,
            sync: SyncDirective::for_origin(origin),
            origin,
            computed_at: now,
        };
        tracing::debug!(
            date = %self.settings.region.format(result.target_instant),
            diff_hours = result.diff_hours,
            diff_minutes = result.diff_minutes,
            recommended = result.recommended,
            ?origin,
            "setting time updated"
        );
        self.latest = Some(update);
        for observer in self.observers.iter_mut() {
            observer(&update);
        }
        update
    }
}
