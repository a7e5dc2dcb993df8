//! # Wakecycle Core Library
//!
//! This library provides the wake-time recommendation engine behind the
//! Wakecycle alarm screen. The CLI and any GUI are thin layers that feed it
//! events and render what it publishes.
//!
//! ## Architecture
//!
//! - **Converter**: maps hour/minute/AM-PM wheel selections to instants on
//!   the next calendar day of a fixed region, and back
//! - **Rounding**: snaps arbitrary instants onto wheel steps
//! - **Cycle calculator**: breaks the time until the target into hours and
//!   minutes and flags targets near a whole number of sleep cycles
//! - **State**: an origin-tagged state machine that keeps the wheel surface
//!   and the continuous control in sync without feedback loops
//!
//! ## Key Components
//!
//! - [`SettingTimeState`]: the state machine
//! - [`TimeComponentConverter`]: selection/instant conversion
//! - [`CycleRecommendationCalculator`]: the recommendation heuristic
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod cycle;
pub mod error;
pub mod region;
pub mod rounding;
pub mod selection;
pub mod state;
pub mod storage;
pub mod wheel;

pub use clock::{Clock, FixedClock, SystemClock};
pub use cycle::{seconds_until, CycleBreakdown, CyclePolicy, CycleRecommendationCalculator};
pub use error::{CalendarError, ConfigError, CoreError};
pub use region::CalendarRegion;
pub use rounding::RoundingPolicy;
pub use selection::{TimeComponentConverter, TimeOfDaySelection};
pub use state::{
    ConfirmBehavior, EngineSettings, RecommendationResult, SettingTimeEvent, SettingTimeState,
    SettingTimeUpdate, Surface, SyncDirective,
};
pub use storage::Config;
pub use wheel::{
    ContinuousControl, PickerLanguage, WheelColumn, WheelColumns, WheelPosition, WheelSurface,
};
