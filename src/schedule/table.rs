//! The standard week of breathing personalities.
//!
//! Kelvin pairs are (exhale, inhale). Grey-breathing days carry a single RGB
//! pair shared by every module.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use super::{BreathingEndpoints, DailyColorSchedule, KelvinPair, RgbPair, Shapeshift, WeeklySchedule};
use crate::model::Module;

static STANDARD_WEEK: Lazy<WeeklySchedule> = Lazy::new(|| {
    WeeklySchedule::from_days([
        monday(),
        tuesday(),
        wednesday(),
        thursday(),
        friday(),
        saturday(),
        sunday(),
    ])
});

/// The process-wide standard week.
pub fn standard_week() -> &'static WeeklySchedule {
    &STANDARD_WEEK
}

fn kelvin_day(
    description: &str,
    shapeshift: Shapeshift,
    modules: &[(Module, f64, f64)],
) -> DailyColorSchedule {
    let pairs: BTreeMap<Module, KelvinPair> = modules
        .iter()
        .map(|&(module, exhale, inhale)| (module, KelvinPair { exhale, inhale }))
        .collect();

    DailyColorSchedule {
        endpoints: BreathingEndpoints::Kelvin(pairs),
        shapeshift,
        description: description.to_string(),
    }
}

fn monday() -> DailyColorSchedule {
    kelvin_day(
        "Wakeful Monday: crisp start to the working week",
        Shapeshift::none(),
        &[
            (Module::WakefulBreathing, 3400.0, 2600.0),
            (Module::SleepBreathing, 2200.0, 1800.0),
            (Module::Meditation, 2800.0, 2400.0),
        ],
    )
}

fn tuesday() -> DailyColorSchedule {
    kelvin_day(
        "Steady Tuesday: settled working rhythm",
        Shapeshift::none(),
        &[
            (Module::WakefulBreathing, 3200.0, 2600.0),
            (Module::SleepBreathing, 2100.0, 1800.0),
            (Module::Meditation, 2700.0, 2300.0),
            (Module::Inebriated, 2000.0, 1700.0),
        ],
    )
}

fn wednesday() -> DailyColorSchedule {
    DailyColorSchedule {
        endpoints: BreathingEndpoints::Rgb(RgbPair {
            exhale: [40, 40, 48],
            inhale: [170, 170, 180],
        }),
        shapeshift: Shapeshift::none(),
        description: "Grey Wednesday: colorless midweek breathing".to_string(),
    }
}

fn thursday() -> DailyColorSchedule {
    kelvin_day(
        "Amber Thursday: the week begins to warm",
        Shapeshift::none(),
        &[
            (Module::WakefulBreathing, 3000.0, 2400.0),
            (Module::SleepBreathing, 2000.0, 1600.0),
            (Module::Meditation, 2600.0, 2200.0),
            (Module::Inebriated, 1950.0, 1500.0),
        ],
    )
}

fn friday() -> DailyColorSchedule {
    kelvin_day(
        "Loosening Friday: evening warmth arrives early",
        Shapeshift::inheriting("inherit_weekend"),
        &[
            (Module::WakefulBreathing, 2900.0, 2300.0),
            (Module::SleepBreathing, 2000.0, 1500.0),
            (Module::Meditation, 2500.0, 2100.0),
            (Module::Inebriated, 2400.0, 1400.0),
        ],
    )
}

fn saturday() -> DailyColorSchedule {
    kelvin_day(
        "Open Saturday: wide, unhurried breathing",
        Shapeshift::inheriting("inherit_friday"),
        &[
            (Module::WakefulBreathing, 2800.0, 2200.0),
            (Module::SleepBreathing, 1900.0, 1400.0),
            (Module::Meditation, 2500.0, 2000.0),
            (Module::Inebriated, 2300.0, 1300.0),
        ],
    )
}

fn sunday() -> DailyColorSchedule {
    kelvin_day(
        "Quiet Sunday: outdoor rest",
        Shapeshift::none(),
        &[
            (Module::SleepBreathing, 1800.0, 1200.0),
            (Module::Meditation, 2400.0, 1900.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::BreathingMode;
    use chrono::Weekday;

    #[test]
    fn test_monday_wakeful_endpoints() {
        let pair = standard_week()
            .day(Weekday::Mon)
            .kelvin_pair(Module::WakefulBreathing)
            .unwrap();
        assert_eq!(pair, KelvinPair { exhale: 3400.0, inhale: 2600.0 });
    }

    #[test]
    fn test_wednesday_is_grey_breathing() {
        let day = standard_week().day(Weekday::Wed);
        assert_eq!(day.mode(), BreathingMode::RgbBreathing);
        let pair = day.rgb_pair().unwrap();
        // Grey: channels nearly equal at both ends
        assert_eq!(pair.exhale[0], pair.exhale[1]);
        assert_eq!(pair.inhale[0], pair.inhale[1]);
    }

    #[test]
    fn test_weekend_days_can_shapeshift() {
        assert!(standard_week().day(Weekday::Fri).shapeshift.capable);
        assert!(standard_week().day(Weekday::Sat).shapeshift.capable);
        assert!(!standard_week().day(Weekday::Mon).shapeshift.capable);
    }

    #[test]
    fn test_missing_modules_audit() {
        let missing = standard_week().missing_modules();
        assert!(missing.contains(&(Weekday::Mon, Module::Inebriated)));
        assert!(missing.contains(&(Weekday::Sun, Module::WakefulBreathing)));
        assert!(!missing.iter().any(|(day, _)| *day == Weekday::Wed));
        assert!(!missing.iter().any(|(_, m)| *m == Module::EmergencyFallback));
    }
}
