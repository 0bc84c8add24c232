//! Mapping from numeric weather-provider condition codes to effect conditions.
//!
//! Codes follow the common grouping used by public weather APIs: 2xx
//! thunderstorm, 3xx drizzle, 5xx rain, 6xx snow, 7xx atmosphere (mist, haze,
//! fog), 800 clear sky and 80x cloud cover.

use crate::weather::Condition;

/// Code reported when a provider gives no usable weather entry
pub const DEFAULT_CODE: u32 = 800;

impl Condition {
    pub fn from_weather_code(code: u32) -> Self {
        match code {
            200..=299 => Condition::Thunder,
            300..=399 => Condition::Drizzle,
            500..=599 => Condition::Rain,
            600..=699 => Condition::Snow,
            700..=799 => Condition::Fog,
            800 => Condition::Clear,
            801..=899 => Condition::Clouds,
            _ => Condition::None,
        }
    }
}
