//! Integration tests for the setting-time engine.
//!
//! Drives `SettingTimeState` with a fixed clock through the screen flows:
//! initial load, wheel edits, continuous-control edits and confirm.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use wakecycle_core::{
    Clock, Config, ContinuousControl, CycleRecommendationCalculator, FixedClock, PickerLanguage,
    SettingTimeEvent, SettingTimeState, Surface, TimeOfDaySelection, WheelColumn, WheelSurface,
};

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid datetime")
        .with_timezone(&Utc)
}

#[test]
fn scenario_a_midnight_init_recommends_six_hours() {
    let clock = FixedClock::new(at("2024-06-01T00:00:00+09:00"));
    let mut state = SettingTimeState::default();

    let update = state.handle(SettingTimeEvent::ScreenInit, &clock).unwrap();
    assert_eq!(update.result.target_instant, at("2024-06-01T06:00:00+09:00"));
    assert_eq!(update.result.diff_hours, 6);
    assert_eq!(update.result.diff_minutes, 0);
    assert!(update.result.recommended);
    assert!(update.sync.needs_picker_resync());
}

#[test]
fn scenario_b_and_c_cycle_alignment() {
    let calc = CycleRecommendationCalculator::default();

    let one_cycle = calc.classify(5400);
    assert!(one_cycle.recommended);
    assert_eq!((one_cycle.diff_hours, one_cycle.diff_minutes), (1, 30));

    assert!(!calc.classify(2700).recommended);
}

#[test]
fn scenario_d_wheel_selection_lands_on_next_day() {
    let clock = FixedClock::new(at("2024-06-01T09:15:00+09:00"));
    let mut state = SettingTimeState::default();

    let update = state
        .handle(
            SettingTimeEvent::WheelChanged(TimeOfDaySelection::new(11, 55, false)),
            &clock,
        )
        .unwrap();
    let region = state.settings().region;
    assert_eq!(
        region.date_of(update.result.target_instant),
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    );
    assert_eq!(region.format(update.result.target_instant), "2024-06-02 23:55:00");
    // 1 day, 14 hours, 40 minutes away.
    assert_eq!((update.result.diff_hours, update.result.diff_minutes), (38, 40));
}

#[test]
fn scenario_e_origin_controls_picker_resync() {
    let clock = FixedClock::new(at("2024-06-01T22:00:00+09:00"));
    let mut state = SettingTimeState::default();
    state.handle(SettingTimeEvent::ScreenInit, &clock);

    let from_wheels = state
        .handle(
            SettingTimeEvent::WheelChanged(TimeOfDaySelection::new(6, 0, true)),
            &clock,
        )
        .unwrap();
    assert!(!from_wheels.sync.needs_picker_resync());
    assert_eq!(from_wheels.origin, Some(Surface::Wheels));

    let from_control = state
        .handle(
            SettingTimeEvent::ContinuousControlChanged(at("2024-06-02T05:30:00+09:00")),
            &clock,
        )
        .unwrap();
    assert!(from_control.sync.needs_picker_resync());
    assert!(!from_control.sync.resync_continuous_control);
}

#[test]
fn later_event_wins_when_surfaces_alternate() {
    let mut clock = FixedClock::new(at("2024-06-01T23:00:00+09:00"));
    let mut state = SettingTimeState::default();

    let events = [
        SettingTimeEvent::ScreenInit,
        SettingTimeEvent::ContinuousControlChanged(at("2024-06-02T06:00:00+09:00")),
        SettingTimeEvent::WheelChanged(TimeOfDaySelection::new(7, 30, true)),
    ];
    let mut last = None;
    for event in events {
        last = state.handle(event, &clock);
        clock.advance_secs(1);
    }

    let last = last.unwrap();
    assert_eq!(state.latest(), Some(&last));
    assert_eq!(last.result.target_instant, at("2024-06-02T07:30:00+09:00"));
    assert!(!last.sync.resync_wheels);
}

#[test]
fn full_screen_session_keeps_surfaces_consistent() {
    let settings = Config::default().engine_settings().unwrap();
    let mut clock = FixedClock::new(at("2024-06-01T23:10:00+09:00"));
    let mut state = SettingTimeState::new(settings);
    let mut wheels = WheelSurface::new(&settings, PickerLanguage::Ko);
    let mut control = ContinuousControl::new();

    let init = state.handle(SettingTimeEvent::ScreenInit, &clock).unwrap();
    wheels.apply(&init);
    control.apply(&init);
    assert_eq!(wheels.selection(), Some(TimeOfDaySelection::new(5, 10, true)));

    // User drags the continuous control to an odd minute; wheels snap.
    clock.advance_secs(20);
    let event = control.set_value(at("2024-06-02T06:38:00+09:00"));
    let update = state.handle(event, &clock).unwrap();
    assert!(wheels.apply(&update));
    assert!(!control.apply(&update));
    assert_eq!(wheels.selection(), Some(TimeOfDaySelection::new(6, 40, true)));

    // User turns the minute wheel; control follows, wheels stay put.
    let event = wheels.select_row(WheelColumn::Minute, 8).unwrap();
    let update = state.handle(event, &clock).unwrap();
    assert!(!wheels.apply(&update));
    assert!(control.apply(&update));
    assert_eq!(control.value(), Some(at("2024-06-02T06:40:00+09:00")));
    assert!(update.result.recommended);

    // Confirm commits the displayed selection and resyncs both.
    clock.advance_secs(60);
    let confirmed = state.handle(SettingTimeEvent::Confirm, &clock).unwrap();
    assert_eq!(confirmed.result.target_instant, at("2024-06-02T06:40:00+09:00"));
    assert!(confirmed.sync.resync_wheels && confirmed.sync.resync_continuous_control);
    assert_eq!(confirmed.computed_at, clock.now());
}

#[test]
fn wraparound_for_control_time_already_passed() {
    let now = at("2024-06-01T08:00:00+09:00");
    let clock = FixedClock::new(now);
    let mut state = SettingTimeState::default();

    let target = now - Duration::minutes(90);
    let update = state
        .handle(SettingTimeEvent::ContinuousControlChanged(target), &clock)
        .unwrap();
    // 24h - 1.5h = 22.5h = 15 cycles.
    assert_eq!((update.result.diff_hours, update.result.diff_minutes), (22, 30));
    assert!(update.result.recommended);
}
