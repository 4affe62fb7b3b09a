//! Shared numeric helpers.

use std::path::Path;

/// Linear interpolation between `start` and `end` by `t`.
///
/// `t` is not clamped; callers decide whether extrapolation is meaningful.
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Linear ramp from 0.0 at `zero_at` to 1.0 at `one_at`, clamped to [0, 1].
///
/// Works for descending ramps too (`one_at < zero_at`).
pub fn ramp(value: f64, zero_at: f64, one_at: f64) -> f64 {
    if zero_at == one_at {
        return if value >= one_at { 1.0 } else { 0.0 };
    }
    ((value - zero_at) / (one_at - zero_at)).clamp(0.0, 1.0)
}

/// Clamp to the unit interval, mapping NaN to 0.0.
pub fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Replace the home directory prefix with `~` for log output.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}
