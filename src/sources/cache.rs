//! Last-known astronomy, held in memory for the life of the process.

use anyhow::{Result, bail};
use std::sync::Mutex;

use super::AstronomyCache;
use crate::model::AstronomicalData;

#[derive(Debug, Default)]
pub struct MemoryCache {
    last_known: Mutex<Option<AstronomicalData>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache primed with an initial value.
    pub fn with_data(data: AstronomicalData) -> Self {
        Self {
            last_known: Mutex::new(Some(data)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_known
            .lock()
            .map(|guard| guard.is_none())
            .unwrap_or(true)
    }
}

impl AstronomyCache for MemoryCache {
    fn load(&self) -> Result<AstronomicalData> {
        let guard = match self.last_known.lock() {
            Ok(guard) => guard,
            Err(_) => bail!("Astronomy cache lock poisoned"),
        };
        match guard.as_ref() {
            Some(data) => Ok(data.clone()),
            None => bail!("No cached astronomical data"),
        }
    }

    fn store(&self, data: &AstronomicalData) -> Result<()> {
        match self.last_known.lock() {
            Ok(mut guard) => {
                *guard = Some(data.clone());
                Ok(())
            }
            Err(_) => bail!("Astronomy cache lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_data() -> AstronomicalData {
        let t = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
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
            moonrise: Some(t),
            moonset: None,
            lunar_illumination_percentage: 80.0,
            moon_altitude: 12.0,
            moon_age_days: 11.0,
            lunar_distance_km: 370_000.0,
        }
    }

    #[test]
    fn test_empty_cache_fails_to_load() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());
        assert!(cache.load().is_err());
    }

    #[test]
    fn test_store_then_load_returns_latest() {
        let cache = MemoryCache::new();
        let mut data = sample_data();
        cache.store(&data).unwrap();
        data.lunar_distance_km = 400_000.0;
        cache.store(&data).unwrap();
        assert_eq!(cache.load().unwrap().lunar_distance_km, 400_000.0);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_primed_cache() {
        let cache = MemoryCache::with_data(sample_data());
        assert_eq!(cache.load().unwrap().moon_age_days, 11.0);
    }
}
