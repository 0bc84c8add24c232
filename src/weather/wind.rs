use serde::{Deserialize, Serialize};

/// Horizontal drift bias applied to every particle kind, in [-1, 1].
///
/// Positive values push effects to the right of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct WindLevel(f32);

impl WindLevel {
    pub const CALM: WindLevel = WindLevel(0.0);

    /// Create a wind level, clamping into [-1, 1]. NaN is treated as calm.
    pub fn new(level: f32) -> Self {
        if level.is_nan() {
            return Self::CALM;
        }
        Self(level.clamp(-1.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Multiplier applied to the horizontal component of rain motion
    pub fn rain_factor(&self) -> f32 {
        1.0 + self.0
    }

    /// Extra horizontal speed per unit of elapsed time for snowflakes
    pub fn snow_push(&self) -> f32 {
        self.0 * 0.6
    }

    pub fn is_calm(&self) -> bool {
        self.0 == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_level_clamps() {
        assert_eq!(WindLevel::new(3.0).value(), 1.0);
        assert_eq!(WindLevel::new(-7.5).value(), -1.0);
        assert_eq!(WindLevel::new(0.25).value(), 0.25);
        assert!(WindLevel::new(f32::NAN).is_calm());
    }

    #[test]
    fn test_wind_factors() {
        let wind = WindLevel::new(0.2);
        assert!((wind.rain_factor() - 1.2).abs() < 1e-6);
        assert!((wind.snow_push() - 0.12).abs() < 1e-6);
        assert_eq!(WindLevel::CALM.rain_factor(), 1.0);
    }
}
