//! Weekly color-personality schedule.
//!
//! Every weekday maps to exactly one [`DailyColorSchedule`] describing the
//! breathing endpoints for that day. A [`WeeklySchedule`] can only be built
//! with all seven days present, so lookups never fail at runtime. The
//! standard week lives in [`table`] and is shared read-only for the life of
//! the process.
//!
//! ## Track resolution
//!
//! The indoor track reuses Saturday's schedule on Sunday. This is a single
//! explicit substitution, not a general rule; the outdoor track always uses
//! the calendar day.

pub mod loading;
pub mod table;

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashMap};

use crate::model::{Module, Rgb, TrackType};

pub use table::standard_week;

/// Which kind of endpoints a day breathes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathingMode {
    KelvinBreathing,
    RgbBreathing,
}

impl BreathingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreathingMode::KelvinBreathing => "KELVIN_BREATHING",
            BreathingMode::RgbBreathing => "RGB_BREATHING",
        }
    }
}

/// Exhale/inhale color temperatures in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KelvinPair {
    pub exhale: f64,
    pub inhale: f64,
}

/// Exhale/inhale colors as 8-bit channels, used by grey breathing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbPair {
    pub exhale: [u8; 3],
    pub inhale: [u8; 3],
}

impl RgbPair {
    /// Endpoints normalized to [0, 1].
    pub fn normalized(&self) -> (Rgb, Rgb) {
        (Rgb::from_u8(self.exhale), Rgb::from_u8(self.inhale))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BreathingEndpoints {
    Kelvin(BTreeMap<Module, KelvinPair>),
    Rgb(RgbPair),
}

/// Whether a day may be overridden by a richer inherited behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shapeshift {
    pub capable: bool,
    pub inheritance: String,
}

impl Shapeshift {
    pub fn none() -> Self {
        Self {
            capable: false,
            inheritance: "none".to_string(),
        }
    }

    pub fn inheriting(policy: &str) -> Self {
        Self {
            capable: true,
            inheritance: policy.to_string(),
        }
    }
}

/// The breathing personality of one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyColorSchedule {
    pub endpoints: BreathingEndpoints,
    pub shapeshift: Shapeshift,
    pub description: String,
}

impl DailyColorSchedule {
    pub fn mode(&self) -> BreathingMode {
        match self.endpoints {
            BreathingEndpoints::Kelvin(_) => BreathingMode::KelvinBreathing,
            BreathingEndpoints::Rgb(_) => BreathingMode::RgbBreathing,
        }
    }

    /// Kelvin endpoints for a module, if this is a Kelvin day that defines it.
    pub fn kelvin_pair(&self, module: Module) -> Option<KelvinPair> {
        match &self.endpoints {
            BreathingEndpoints::Kelvin(modules) => modules.get(&module).copied(),
            BreathingEndpoints::Rgb(_) => None,
        }
    }

    pub fn rgb_pair(&self) -> Option<RgbPair> {
        match &self.endpoints {
            BreathingEndpoints::Rgb(pair) => Some(*pair),
            BreathingEndpoints::Kelvin(_) => None,
        }
    }
}

/// Immutable weekday-to-schedule map with all seven days present.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
    /// Indexed by days from Monday.
    days: [DailyColorSchedule; 7],
}

impl WeeklySchedule {
    /// Build a week from its days in Monday-first order.
    pub fn from_days(days: [DailyColorSchedule; 7]) -> Self {
        Self { days }
    }

    /// Build a week from a map of entries. A missing weekday is a
    /// configuration error.
    pub fn from_entries(mut entries: HashMap<Weekday, DailyColorSchedule>) -> Result<Self> {
        let mut ordered = Vec::with_capacity(7);
        let mut missing = Vec::new();

        for weekday in WEEK {
            match entries.remove(&weekday) {
                Some(schedule) => ordered.push(schedule),
                None => missing.push(weekday_name(weekday)),
            }
        }

        if !missing.is_empty() {
            bail!("Schedule is missing entries for: {}", missing.join(", "));
        }

        let days: [DailyColorSchedule; 7] = ordered
            .try_into()
            .map_err(|_| anyhow::anyhow!("Schedule must contain exactly seven days"))?;
        Ok(Self { days })
    }

    pub fn day(&self, weekday: Weekday) -> &DailyColorSchedule {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Schedule for a calendar date as seen by a track.
    pub fn schedule_for(&self, date: NaiveDate, track: TrackType) -> &DailyColorSchedule {
        self.day(resolve_weekday(date, track))
    }

    /// Kelvin days lacking an entry for one of the modulated modules.
    ///
    /// The emergency module is excluded since it never consults the schedule.
    pub fn missing_modules(&self) -> Vec<(Weekday, Module)> {
        let mut missing = Vec::new();
        for weekday in WEEK {
            let day = self.day(weekday);
            if day.mode() != BreathingMode::KelvinBreathing {
                continue;
            }
            for module in Module::ALL {
                if !module.bypasses_modulation() && day.kelvin_pair(module).is_none() {
                    missing.push((weekday, module));
                }
            }
        }
        missing
    }
}

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday whose schedule applies to `date` on `track`.
pub fn resolve_weekday(date: NaiveDate, track: TrackType) -> Weekday {
    match (date.weekday(), track) {
        (Weekday::Sun, TrackType::Indoor) => Weekday::Sat,
        (weekday, _) => weekday,
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    WEEK.into_iter()
        .find(|weekday| weekday_name(*weekday).eq_ignore_ascii_case(name))
}

/// Look up a date in the standard week.
pub fn schedule_for(date: NaiveDate, track: TrackType) -> &'static DailyColorSchedule {
    standard_week().schedule_for(date, track)
}
