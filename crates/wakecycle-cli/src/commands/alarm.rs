use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use wakecycle_core::{
    CalendarRegion, Clock, Config, ContinuousControl, EngineSettings, FixedClock,
    SettingTimeEvent, SettingTimeState, SettingTimeUpdate, SystemClock, TimeOfDaySelection,
    WheelPosition, WheelSurface,
};

/// An update plus its target rendered in the configured region.
#[derive(Serialize)]
struct UpdateView {
    target_local: String,
    sleep_for: String,
    #[serde(flatten)]
    update: SettingTimeUpdate,
}

impl UpdateView {
    fn new(update: SettingTimeUpdate, region: CalendarRegion) -> Self {
        Self {
            target_local: region.format(update.result.target_instant),
            sleep_for: format!("{}h {}m", update.result.diff_hours, update.result.diff_minutes),
            update,
        }
    }
}

#[derive(Serialize)]
struct SessionReport {
    updates: Vec<UpdateView>,
    dropped: Vec<String>,
    wheel_rows: WheelPosition,
    wheel_selection: Option<TimeOfDaySelection>,
    control_value: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct SnapReport {
    input: DateTime<Utc>,
    rounded: DateTime<Utc>,
    rounded_local: String,
    selection: TimeOfDaySelection,
    rows: Option<WheelPosition>,
}

/// A parsed session argument.
enum SessionInput {
    Init,
    Confirm,
    Wheel(TimeOfDaySelection),
    Control(DateTime<Utc>),
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn clock_for(now: Option<&str>) -> Result<Box<dyn Clock>, Box<dyn std::error::Error>> {
    Ok(match now {
        Some(value) => Box::new(FixedClock::new(parse_instant(value)?)),
        None => Box::new(SystemClock),
    })
}

fn load_settings() -> Result<(Config, EngineSettings), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let settings = config.engine_settings()?;
    Ok((config, settings))
}

fn parse_hh_mm(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("invalid time '{value}': {e}"))
}

/// Parse one session argument. `control:HH:MM` is today at that time in
/// `region`, relative to `now`.
fn parse_input(
    arg: &str,
    now: DateTime<Utc>,
    region: CalendarRegion,
) -> Result<SessionInput, String> {
    let (kind, rest) = arg.split_once(':').unwrap_or((arg, ""));
    match kind {
        "init" if rest.is_empty() => Ok(SessionInput::Init),
        "confirm" if rest.is_empty() => Ok(SessionInput::Confirm),
        "wheel" => {
            let (time, meridiem) = rest
                .rsplit_once(':')
                .ok_or_else(|| format!("expected wheel:HH:MM:am|pm, got '{arg}'"))?;
            let (hour, minute) = time
                .split_once(':')
                .ok_or_else(|| format!("expected wheel:HH:MM:am|pm, got '{arg}'"))?;
            let hour: u32 = hour.parse().map_err(|_| format!("invalid hour in '{arg}'"))?;
            let minute: u32 = minute.parse().map_err(|_| format!("invalid minute in '{arg}'"))?;
            let is_am = match meridiem.to_ascii_lowercase().as_str() {
                "am" => true,
                "pm" => false,
                other => return Err(format!("expected am or pm, got '{other}'")),
            };
            Ok(SessionInput::Wheel(TimeOfDaySelection::new(hour, minute, is_am)))
        }
        "control" => {
            if let Ok(instant) = DateTime::parse_from_rfc3339(rest) {
                return Ok(SessionInput::Control(instant.with_timezone(&Utc)));
            }
            let time = parse_hh_mm(rest)?;
            region
                .date_of(now)
                .and_time(time)
                .and_local_timezone(region.zone())
                .earliest()
                .map(|dt| SessionInput::Control(dt.with_timezone(&Utc)))
                .ok_or_else(|| format!("{rest} does not exist today in {}", region.name()))
        }
        _ => Err(format!("unknown event '{arg}'")),
    }
}

pub fn recommend(now: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let clock = clock_for(now)?;
    let (_, settings) = load_settings()?;
    let mut state = SettingTimeState::new(settings);

    let update = state
        .handle(SettingTimeEvent::ScreenInit, clock.as_ref())
        .ok_or("no recommendation produced")?;
    let view = UpdateView::new(update, settings.region);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

pub fn session(now: Option<&str>, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let clock = clock_for(now)?;
    let (config, settings) = load_settings()?;
    let mut state = SettingTimeState::new(settings);
    let mut wheels = WheelSurface::new(&settings, config.picker.language);
    let mut control = ContinuousControl::new();

    let mut updates = Vec::new();
    let mut dropped = Vec::new();
    for arg in args {
        let input = parse_input(arg, clock.now(), settings.region)?;
        let event = match input {
            SessionInput::Init => Some(SettingTimeEvent::ScreenInit),
            SessionInput::Confirm => Some(SettingTimeEvent::Confirm),
            SessionInput::Wheel(selection) => wheels.select(selection),
            SessionInput::Control(instant) => Some(control.set_value(instant)),
        };
        let Some(update) = event.and_then(|event| state.handle(event, clock.as_ref())) else {
            tracing::info!(arg = %arg, "event dropped");
            dropped.push(arg.clone());
            continue;
        };
        wheels.apply(&update);
        control.apply(&update);
        updates.push(UpdateView::new(update, settings.region));
    }

    let report = SessionReport {
        updates,
        dropped,
        wheel_rows: wheels.position(),
        wheel_selection: wheels.selection(),
        control_value: control.value(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn snap(at: &str) -> Result<(), Box<dyn std::error::Error>> {
    let input = parse_instant(at)?;
    let (config, settings) = load_settings()?;
    let wheels = WheelSurface::new(&settings, config.picker.language);

    let rounded = settings.rounding().round_to_step(input);
    let selection = settings.converter().to_selection(rounded);
    let report = SnapReport {
        input,
        rounded,
        rounded_local: settings.region.format(rounded),
        selection,
        rows: wheels.columns().position_of(selection),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
