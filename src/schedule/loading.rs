//! Loading a custom week from a TOML schedule file.
//!
//! ```toml
//! [monday]
//! mode = "kelvin"
//! description = "Wakeful Monday"
//! shapeshift = false
//!
//! [monday.modules.wakeful_breathing]
//! exhale = 3400
//! inhale = 2600
//!
//! [wednesday]
//! mode = "rgb"
//! description = "Grey Wednesday"
//! exhale = [40, 40, 48]
//! inhale = [170, 170, 180]
//! ```
//!
//! All seven days must be present; anything missing or malformed fails the
//! load rather than surfacing later at lookup time.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::{
    BreathingEndpoints, DailyColorSchedule, KelvinPair, RgbPair, Shapeshift, WeeklySchedule,
    parse_weekday,
};
use crate::common::utils::private_path;
use crate::model::Module;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ModeEntry {
    Kelvin,
    Rgb,
}

#[derive(Debug, Deserialize)]
struct KelvinEntry {
    exhale: f64,
    inhale: f64,
}

#[derive(Debug, Deserialize)]
struct DayEntry {
    mode: ModeEntry,
    description: String,
    #[serde(default)]
    shapeshift: bool,
    inheritance: Option<String>,
    #[serde(default)]
    modules: BTreeMap<String, KelvinEntry>,
    exhale: Option<[u8; 3]>,
    inhale: Option<[u8; 3]>,
}

impl DayEntry {
    fn into_schedule(self, day: &str) -> Result<DailyColorSchedule> {
        let endpoints = match self.mode {
            ModeEntry::Kelvin => {
                if self.modules.is_empty() {
                    bail!("{day}: kelvin mode requires at least one [{day}.modules.<name>] table");
                }
                let mut pairs = BTreeMap::new();
                for (name, entry) in self.modules {
                    let module: Module = name
                        .parse()
                        .with_context(|| format!("{day}: invalid module table"))?;
                    if module.bypasses_modulation() {
                        bail!("{day}: {module} cannot be scheduled; it ignores the weekly table");
                    }
                    if !entry.exhale.is_finite() || !entry.inhale.is_finite() {
                        bail!("{day}: {module} endpoints must be finite Kelvin values");
                    }
                    pairs.insert(
                        module,
                        KelvinPair {
                            exhale: entry.exhale,
                            inhale: entry.inhale,
                        },
                    );
                }
                BreathingEndpoints::Kelvin(pairs)
            }
            ModeEntry::Rgb => match (self.exhale, self.inhale) {
                (Some(exhale), Some(inhale)) => BreathingEndpoints::Rgb(RgbPair { exhale, inhale }),
                _ => bail!("{day}: rgb mode requires both exhale and inhale color arrays"),
            },
        };

        let shapeshift = if self.shapeshift {
            Shapeshift::inheriting(self.inheritance.as_deref().unwrap_or("unspecified"))
        } else {
            Shapeshift::none()
        };

        Ok(DailyColorSchedule {
            endpoints,
            shapeshift,
            description: self.description,
        })
    }
}

/// Parse a week from TOML text.
pub fn parse_schedule(content: &str) -> Result<WeeklySchedule> {
    let raw: HashMap<String, DayEntry> =
        toml::from_str(content).context("Failed to parse schedule")?;

    let mut entries = HashMap::with_capacity(raw.len());
    for (name, entry) in raw {
        let weekday =
            parse_weekday(&name).with_context(|| format!("Unknown day '{name}' in schedule"))?;
        let schedule = entry.into_schedule(&name)?;
        if entries.insert(weekday, schedule).is_some() {
            bail!("Day '{}' appears more than once in schedule", name);
        }
    }

    WeeklySchedule::from_entries(entries)
}

/// Load a week from a TOML file.
pub fn load_schedule(path: &Path) -> Result<WeeklySchedule> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule from {}", private_path(path)))?;
    parse_schedule(&content)
        .with_context(|| format!("Invalid schedule in {}", private_path(path)))
}
