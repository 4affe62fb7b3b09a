//! Seasonal and lunar modulation.
//!
//! - [`seasonal`]: breathing-window coefficient driven by days since the winter solstice
//! - [`lunar`]: breathing rate from lunar distance and the lunar temperature shift

pub mod lunar;
pub mod seasonal;

pub use lunar::{breathing_rate, module_temperature};
pub use seasonal::{seasonal_coefficient, seasonal_duration_fraction};
