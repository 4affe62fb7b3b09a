//! Fixed weather for prototype runs, built from the `[weather]` config section.

use anyhow::Result;

use super::WeatherSource;
use crate::model::EnvironmentalData;

#[derive(Debug, Clone, Copy)]
pub struct MockWeather {
    snapshot: EnvironmentalData,
}

impl MockWeather {
    pub fn new(snapshot: EnvironmentalData) -> Self {
        Self { snapshot }
    }
}

impl WeatherSource for MockWeather {
    fn current(&self) -> Result<EnvironmentalData> {
        Ok(self.snapshot)
    }
}
