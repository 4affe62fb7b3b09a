//! Local solar and lunar calculation, used when the remote astronomy API is
//! unavailable.
//!
//! Solar events come from the `sunrise` crate. Lunar values use mean-motion
//! approximations: the moon's age from a reference new moon over the synodic
//! month, and its distance from a reference perigee over the anomalistic
//! month. Moonrise, moonset and altitude are not computed locally.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::f64::consts::TAU;
use std::sync::Arc;
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use super::AstronomySource;
use crate::common::constants::*;
use crate::model::AstronomicalData;
use crate::time_source::TimeSource;

/// Beyond this latitude the sun may not rise or set on a given day.
const MAX_LOCAL_LATITUDE: f64 = 65.0;

/// Sun elevation that opens the evening golden hour.
const GOLDEN_HOUR_START_ELEVATION_DEG: f64 = 6.0;

/// Sun elevation that closes the evening golden hour.
const GOLDEN_HOUR_END_ELEVATION_DEG: f64 = -4.0;

/// 2000-01-06 18:14 UTC
fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// 1999-12-22 perigee
fn reference_perigee() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1999, 12, 22, 11, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0
}

/// Moon age in days since the last new moon, in [0, synodic month).
pub fn mean_moon_age(at: DateTime<Utc>) -> f64 {
    days_between(reference_new_moon(), at).rem_euclid(SYNODIC_MONTH_DAYS)
}

/// Illuminated fraction of the disc as a percentage.
pub fn mean_illumination(moon_age_days: f64) -> f64 {
    let phase = moon_age_days / SYNODIC_MONTH_DAYS * TAU;
    (1.0 - phase.cos()) / 2.0 * 100.0
}

/// Earth-moon distance in km, nearest at the reference perigee.
pub fn mean_lunar_distance(at: DateTime<Utc>) -> f64 {
    let anomaly = days_between(reference_perigee(), at).rem_euclid(ANOMALISTIC_MONTH_DAYS)
        / ANOMALISTIC_MONTH_DAYS
        * TAU;
    MEAN_LUNAR_DISTANCE_KM - LUNAR_DISTANCE_SWING_KM * anomaly.cos()
}

/// Astronomy computed from coordinates and the clock.
pub struct LocalSolarCalculator {
    latitude: f64,
    longitude: f64,
    clock: Arc<dyn TimeSource>,
}

impl LocalSolarCalculator {
    pub fn new(latitude: f64, longitude: f64, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            latitude,
            longitude,
            clock,
        }
    }

    /// Compute the astronomy for `date`, with lunar values taken at `at`.
    pub fn calculate(&self, date: NaiveDate, at: DateTime<Utc>) -> Result<AstronomicalData> {
        if self.latitude.abs() > MAX_LOCAL_LATITUDE {
            bail!(
                "Local solar calculation is limited to ±{MAX_LOCAL_LATITUDE}° latitude (got {:.4}°)",
                self.latitude
            );
        }

        let coord = Coordinates::new(self.latitude, self.longitude)
            .context("Invalid coordinates for local solar calculation")?;
        let day = SolarDay::new(coord, date);

        let sunrise = day.event_time(SolarEvent::Sunrise);
        let sunset = day.event_time(SolarEvent::Sunset);
        let solar_noon = sunrise + (sunset - sunrise) / 2;

        // `sunrise` measures elevation events as depression below the horizon
        let evening_elevation = |degrees: f64| {
            day.event_time(SolarEvent::Elevation {
                elevation: (-degrees).to_radians(),
                morning: false,
            })
        };

        let moon_age_days = mean_moon_age(at);

        Ok(AstronomicalData {
            sunrise,
            sunset,
            solar_noon,
            golden_hour_begin: evening_elevation(GOLDEN_HOUR_START_ELEVATION_DEG),
            golden_hour_end: evening_elevation(GOLDEN_HOUR_END_ELEVATION_DEG),
            astronomical_twilight_begin: day.event_time(SolarEvent::Dawn(DawnType::Astronomical)),
            astronomical_twilight_end: day.event_time(SolarEvent::Dusk(DawnType::Astronomical)),
            nautical_twilight_begin: day.event_time(SolarEvent::Dawn(DawnType::Nautical)),
            nautical_twilight_end: day.event_time(SolarEvent::Dusk(DawnType::Nautical)),
            civil_twilight_begin: day.event_time(SolarEvent::Dawn(DawnType::Civil)),
            civil_twilight_end: day.event_time(SolarEvent::Dusk(DawnType::Civil)),
            moonrise: None,
            moonset: None,
            lunar_illumination_percentage: mean_illumination(moon_age_days),
            moon_altitude: 0.0,
            moon_age_days,
            lunar_distance_km: mean_lunar_distance(at),
        })
    }
}

impl AstronomySource for LocalSolarCalculator {
    fn fetch(&self) -> Result<AstronomicalData> {
        let now = self.clock.now();
        self.calculate(now.date_naive(), now.with_timezone(&Utc))
    }
}
