use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rhythm_engine::color::{
    ColorInterpolation, SKY_BLUE, VERY_DARK_RED, temperature_to_rgb, temperature_to_rgb_interpolated,
};
use rhythm_engine::environment::{dryness_factor, effects, muggy_factor};
use rhythm_engine::modulation::lunar::{breathing_rate_for_distance, lunar_temperature_offset};
use rhythm_engine::modulation::seasonal::seasonal_coefficient;
use rhythm_engine::rhythm::RhythmEngineCore;
use rhythm_engine::{AstronomicalData, EnvironmentalData, Module, TrackType};

fn any_module() -> impl Strategy<Value = Module> {
    prop::sample::select(Module::ALL.to_vec())
}

fn weather_strategy() -> impl Strategy<Value = EnvironmentalData> {
    (-20.0..110.0f64, -40.0..90.0f64, 27.0..32.0f64, 0.0..=100.0f64).prop_map(
        |(temperature, dewpoint, pressure, cloud)| EnvironmentalData {
            temperature,
            humidity: 50.0,
            dewpoint,
            barometric_pressure: pressure,
            cloud_cover_percentage: cloud,
            wind_speed: 5.0,
            air_quality_index: 30.0,
        },
    )
}

fn astronomy(distance_km: f64) -> AstronomicalData {
    let t = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
    AstronomicalData {
        sunrise: t,
        sunset: t,
        solar_noon: t,
        golden_hour_begin: t,
        golden_hour_end: t,
        astronomical_twilight_begin: t,
        astronomical_twilight_end: t,
        nautical_twilight_begin: t,
        nautical_twilight_end: t,
        civil_twilight_begin: t,
        civil_twilight_end: t,
        moonrise: None,
        moonset: None,
        lunar_illumination_percentage: 50.0,
        moon_altitude: 0.0,
        moon_age_days: 14.0,
        lunar_distance_km: distance_km,
    }
}

fn in_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

proptest! {
    /// Every real temperature maps to a defined color with channels in [0, 1]
    #[test]
    fn converter_is_total(temp in prop::num::f64::ANY) {
        for rgb in [temperature_to_rgb(temp), temperature_to_rgb_interpolated(temp)] {
            prop_assert!(in_unit(rgb.r) && in_unit(rgb.g) && in_unit(rgb.b), "{temp} -> {rgb}");
        }
    }

    /// Bucket lookup is stable within a bucket and clamps at both ends
    #[test]
    fn converter_clamps_ends(low in -1.0e9..800.0f64, high in 3000.0..1.0e9f64) {
        prop_assert_eq!(temperature_to_rgb(low), VERY_DARK_RED);
        prop_assert_eq!(temperature_to_rgb(high), SKY_BLUE);
        prop_assert_eq!(temperature_to_rgb_interpolated(high), SKY_BLUE);
    }

    #[test]
    fn interpolation_matches_buckets_at_anchors(idx in 0usize..6) {
        let anchor = [800.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0][idx];
        prop_assert_eq!(
            ColorInterpolation::Linear.convert(anchor),
            ColorInterpolation::Bucketed.convert(anchor)
        );
    }

    /// Muggy and dryness factors are bounded and monotone in dewpoint
    #[test]
    fn factors_are_monotone(a in -60.0..100.0f64, b in -60.0..100.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(muggy_factor(lo) <= muggy_factor(hi));
        prop_assert!(dryness_factor(lo) >= dryness_factor(hi));
        prop_assert!(in_unit(muggy_factor(a)) && in_unit(dryness_factor(a)));
    }

    #[test]
    fn flash_flag_matches_dewpoint(weather in weather_strategy()) {
        prop_assert_eq!(effects(&weather).extreme_humidity_flash, weather.dewpoint >= 79.0);
    }

    #[test]
    fn breathing_rate_is_bounded(distance in prop::num::f64::ANY) {
        let rate = breathing_rate_for_distance(distance);
        prop_assert!((10.0..=12.0).contains(&rate), "{distance} -> {rate}");
    }

    #[test]
    fn seasonal_coefficient_is_bounded(offset in 0i64..(366 * 40)) {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset);
        let coefficient = seasonal_coefficient(date);
        prop_assert!((0.77..=1.34).contains(&coefficient), "{date} -> {coefficient}");
    }

    #[test]
    fn lunar_offset_is_bounded(age in -100.0..100.0f64) {
        let offset = lunar_temperature_offset(age);
        prop_assert!((-42.0..=42.0).contains(&offset));
    }

    /// Brightness and color stay in range for any phase, weather, module and day
    #[test]
    fn samples_stay_in_range(
        phase in -100.0..100.0f64,
        heartbeat in any::<bool>(),
        weather in weather_strategy(),
        module in any_module(),
        day in 0i64..7,
        distance in 350_000.0..410_000.0f64,
        linear in any::<bool>(),
    ) {
        let interpolation = if linear { ColorInterpolation::Linear } else { ColorInterpolation::Bucketed };
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap() + Duration::days(day);
        for track in [TrackType::Indoor, TrackType::Outdoor] {
            let engine = RhythmEngineCore::new(track).with_interpolation(interpolation);
            let sample = engine.sample(date, module, phase, heartbeat, &weather, &astronomy(distance));
            prop_assert!((0.1..=1.0).contains(&sample.brightness), "brightness {}", sample.brightness);
            prop_assert!(in_unit(sample.rgb.r) && in_unit(sample.rgb.g) && in_unit(sample.rgb.b));
            prop_assert!((10.0..=12.0).contains(&sample.breathing_rate_bpm));
        }
    }
}
