//! Photometric conversion from color temperature to RGB.
//!
//! The mapping is a strictly ordered set of half-open buckets. Each bucket is
//! identified by its inclusive lower bound, so a temperature sitting exactly on
//! a boundary always belongs to the warmer-to-cooler bucket above it:
//!
//! | Range (K)      | Color               |
//! |----------------|---------------------|
//! | < 800          | very dark red       |
//! | [800, 1000)    | dark reddish-black  |
//! | [1000, 1500)   | deep red            |
//! | [1500, 2000)   | orange-red          |
//! | [2000, 2500)   | warm amber          |
//! | [2500, 3000)   | soft white          |
//! | >= 3000        | sky blue            |
//!
//! [`temperature_to_rgb_interpolated`] blends linearly between the anchors of
//! adjacent buckets while keeping the same boundary semantics.

use serde::Deserialize;

use crate::common::constants::*;
use crate::model::Rgb;

pub const VERY_DARK_RED: Rgb = Rgb::new(0.1, 0.0, 0.0);
pub const DARK_REDDISH_BLACK: Rgb = Rgb::new(0.3, 0.05, 0.0);
pub const DEEP_RED: Rgb = Rgb::new(0.8, 0.2, 0.0);
pub const ORANGE_RED: Rgb = Rgb::new(1.0, 0.4, 0.1);
pub const WARM_AMBER: Rgb = Rgb::new(1.0, 0.7, 0.3);
pub const SOFT_WHITE: Rgb = Rgb::new(1.0, 0.9, 0.7);
pub const SKY_BLUE: Rgb = Rgb::new(0.8, 0.9, 1.0);

/// Blue-tinged white used for the extreme-humidity "circuit overload" flash.
pub const FLASH_WHITE: Rgb = Rgb::new(0.8, 0.9, 1.0);

/// Bucket anchors in ascending order: (inclusive lower bound, color).
const ANCHORS: [(f64, Rgb); 6] = [
    (BUCKET_DARK_REDDISH_BLACK_K, DARK_REDDISH_BLACK),
    (BUCKET_DEEP_RED_K, DEEP_RED),
    (BUCKET_ORANGE_RED_K, ORANGE_RED),
    (BUCKET_WARM_AMBER_K, WARM_AMBER),
    (BUCKET_SOFT_WHITE_K, SOFT_WHITE),
    (BUCKET_SKY_BLUE_K, SKY_BLUE),
];

/// How a Kelvin value is turned into a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorInterpolation {
    /// Hard bucket lookup.
    #[default]
    Bucketed,
    /// Linear blend between bucket anchors.
    Linear,
}

impl ColorInterpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorInterpolation::Bucketed => "bucketed",
            ColorInterpolation::Linear => "linear",
        }
    }

    pub fn convert(&self, temp_kelvin: f64) -> Rgb {
        match self {
            ColorInterpolation::Bucketed => temperature_to_rgb(temp_kelvin),
            ColorInterpolation::Linear => temperature_to_rgb_interpolated(temp_kelvin),
        }
    }
}

impl std::str::FromStr for ColorInterpolation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "bucketed" => Ok(ColorInterpolation::Bucketed),
            "linear" => Ok(ColorInterpolation::Linear),
            other => anyhow::bail!(
                "color_interpolation must be \"bucketed\" or \"linear\" (got \"{}\")",
                other
            ),
        }
    }
}

/// Convert a color temperature to an RGB triple by bucket lookup.
///
/// Defined for every input: NaN and -∞ land in the lowest bucket, +∞ in the
/// highest.
pub fn temperature_to_rgb(temp_kelvin: f64) -> Rgb {
    if temp_kelvin.is_nan() || temp_kelvin < BUCKET_DARK_REDDISH_BLACK_K {
        return VERY_DARK_RED;
    }

    ANCHORS
        .iter()
        .rev()
        .find(|(lower, _)| temp_kelvin >= *lower)
        .map(|(_, rgb)| *rgb)
        .unwrap_or(VERY_DARK_RED)
}

/// Convert a color temperature to RGB, blending linearly between anchors.
///
/// Exact anchor temperatures return the bucket color. Below 800 K the output is
/// the very-dark-red floor; at or above 3000 K it is sky blue.
pub fn temperature_to_rgb_interpolated(temp_kelvin: f64) -> Rgb {
    if temp_kelvin.is_nan() || temp_kelvin < BUCKET_DARK_REDDISH_BLACK_K {
        return VERY_DARK_RED;
    }

    for pair in ANCHORS.windows(2) {
        let (lower_k, lower_rgb) = pair[0];
        let (upper_k, upper_rgb) = pair[1];
        if temp_kelvin < upper_k {
            let t = (temp_kelvin - lower_k) / (upper_k - lower_k);
            return lower_rgb.lerp(upper_rgb, t).clamped();
        }
    }

    SKY_BLUE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries_are_half_open() {
        assert_eq!(temperature_to_rgb(799.999), VERY_DARK_RED);
        assert_eq!(temperature_to_rgb(800.0), DARK_REDDISH_BLACK);
        assert_eq!(temperature_to_rgb(999.0), DARK_REDDISH_BLACK);
        assert_eq!(temperature_to_rgb(1000.0), DEEP_RED);
        assert_eq!(temperature_to_rgb(1500.0), ORANGE_RED);
        assert_eq!(temperature_to_rgb(2000.0), WARM_AMBER);
        assert_eq!(temperature_to_rgb(2200.0), WARM_AMBER);
        assert_eq!(temperature_to_rgb(2500.0), SOFT_WHITE);
        assert_eq!(temperature_to_rgb(2999.9), SOFT_WHITE);
        assert_eq!(temperature_to_rgb(3000.0), SKY_BLUE);
        assert_eq!(temperature_to_rgb(12_000.0), SKY_BLUE);
    }

    #[test]
    fn test_non_finite_inputs_are_defined() {
        assert_eq!(temperature_to_rgb(f64::NAN), VERY_DARK_RED);
        assert_eq!(temperature_to_rgb(f64::NEG_INFINITY), VERY_DARK_RED);
        assert_eq!(temperature_to_rgb(f64::INFINITY), SKY_BLUE);
        assert_eq!(temperature_to_rgb(-273.15), VERY_DARK_RED);
    }

    #[test]
    fn test_interpolated_matches_buckets_at_anchors() {
        for (kelvin, rgb) in ANCHORS {
            assert_eq!(temperature_to_rgb_interpolated(kelvin), rgb, "{kelvin}K");
        }
        assert_eq!(temperature_to_rgb_interpolated(500.0), VERY_DARK_RED);
        assert_eq!(temperature_to_rgb_interpolated(9000.0), SKY_BLUE);
    }

    #[test]
    fn test_interpolated_midpoint() {
        // Halfway between warm amber (2000K) and soft white (2500K)
        let rgb = temperature_to_rgb_interpolated(2250.0);
        assert!((rgb.r - 1.0).abs() < 1e-9);
        assert!((rgb.g - 0.8).abs() < 1e-9);
        assert!((rgb.b - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_interpolation_mode_dispatch() {
        assert_eq!(ColorInterpolation::Bucketed.convert(2250.0), WARM_AMBER);
        assert_ne!(ColorInterpolation::Linear.convert(2250.0), WARM_AMBER);
        assert_eq!(
            "linear".parse::<ColorInterpolation>().unwrap(),
            ColorInterpolation::Linear
        );
        assert!("smooth".parse::<ColorInterpolation>().is_err());
    }
}
