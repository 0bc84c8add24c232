use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FxError, FxResult};
use crate::frame_loop::Pacing;
use crate::particles::{FlashTiming, RainTiming};
use crate::renderer::Viewport;
use crate::weather::Condition;

/// Largest accepted viewport side in css pixels. At the maximum pixel ratio
/// this keeps a frame buffer under 1 GiB.
pub const MAX_VIEWPORT_SIDE: f32 = 8192.0;

/// Viewport section of the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl ViewportConfig {
    pub fn to_viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.device_pixel_ratio)
    }
}

/// Frame capture settings for the headless renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Frames to simulate
    pub frames: u64,
    /// Timestamp step between frames (ms)
    pub frame_interval_ms: f64,
    /// Write a PNG every N frames; 0 writes only the final frame
    pub capture_every: u64,
    pub directory: PathBuf,
    pub pacing: Pacing,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            frame_interval_ms: 16.0,
            capture_every: 30,
            directory: PathBuf::from("frames"),
            pacing: Pacing::Synthetic,
        }
    }
}

impl OutputConfig {
    /// Whether frame `index` (zero-based) should be written to disk
    pub fn should_capture(&self, index: u64) -> bool {
        let last = index + 1 == self.frames;
        if self.capture_every == 0 {
            return last;
        }
        last || (index + 1) % self.capture_every == 0
    }
}

/// Top-level weather-fx configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Condition name; unknown names fall back to `none`
    pub condition: String,
    /// Fixed seed for reproducible output
    pub seed: Option<u64>,
    pub flash_timing: FlashTiming,
    pub rain_timing: RainTiming,
    pub viewport: ViewportConfig,
    pub output: OutputConfig,
}

impl FxConfig {
    /// Read and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> FxResult<Self> {
        let config: FxConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FxResult<()> {
        let v = &self.viewport;
        for (name, value) in [("viewport.width", v.width), ("viewport.height", v.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(FxError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
            if value > MAX_VIEWPORT_SIDE {
                return Err(FxError::InvalidConfig(format!(
                    "{} must be at most {} (got {})",
                    name, MAX_VIEWPORT_SIDE, value
                )));
            }
        }

        let interval = self.output.frame_interval_ms;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(FxError::InvalidConfig(format!(
                "output.frame_interval_ms must be positive (got {})",
                interval
            )));
        }

        if self.output.frames == 0 {
            return Err(FxError::InvalidConfig(
                "output.frames must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn condition(&self) -> Condition {
        Condition::parse_lenient(&self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = FxConfig::from_toml_str("").unwrap();
        assert_eq!(config.condition(), Condition::None);
        assert_eq!(config.seed, None);
        assert_eq!(config.flash_timing, FlashTiming::PerFrame);
        assert_eq!(config.rain_timing, RainTiming::TimeScaled);
        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.output.frames, 120);
    }

    #[test]
    fn test_full_config() {
        let raw = r#"
            condition = "thunder"
            seed = 42
            flash_timing = "time_scaled"
            rain_timing = "per_frame"

            [viewport]
            width = 640.0
            height = 480.0
            device_pixel_ratio = 3.0

            [output]
            frames = 10
            capture_every = 0
            directory = "out"
            pacing = "real_time"
        "#;
        let config = FxConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.condition(), Condition::Thunder);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.flash_timing, FlashTiming::TimeScaled);
        assert_eq!(config.rain_timing, RainTiming::PerFrame);
        assert_eq!(config.output.pacing, Pacing::RealTime);
        // Ratio is clamped when turned into a viewport
        assert_eq!(config.viewport.to_viewport().device_pixel_ratio, 2.0);
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            FxConfig::from_toml_str("[viewport]\nwidth = -1.0"),
            Err(FxError::InvalidConfig(_))
        ));
        assert!(matches!(
            FxConfig::from_toml_str("[output]\nframes = 0"),
            Err(FxError::InvalidConfig(_))
        ));
        assert!(matches!(
            FxConfig::from_toml_str("[output]\nframe_interval_ms = 0.0"),
            Err(FxError::InvalidConfig(_))
        ));
        assert!(matches!(
            FxConfig::from_toml_str("seed = \"abc\""),
            Err(FxError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_oversized_viewport_rejected() {
        let huge = "[viewport]\nwidth = 1e7\nheight = 1e7";
        assert!(matches!(
            FxConfig::from_toml_str(huge),
            Err(FxError::InvalidConfig(_))
        ));
        assert!(matches!(
            FxConfig::from_toml_str("[viewport]\nheight = 8192.5"),
            Err(FxError::InvalidConfig(_))
        ));

        let largest = "[viewport]\nwidth = 8192.0\nheight = 8192.0";
        assert!(FxConfig::from_toml_str(largest).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "condition = \"fog\"").unwrap();
        let config = FxConfig::load(file.path()).unwrap();
        assert_eq!(config.condition(), Condition::Fog);

        assert!(matches!(
            FxConfig::load("/definitely/not/here.toml"),
            Err(FxError::Io(_))
        ));
    }

    #[test]
    fn test_capture_schedule() {
        let output = OutputConfig {
            frames: 10,
            capture_every: 4,
            ..OutputConfig::default()
        };
        let captured: Vec<u64> = (0..10).filter(|&i| output.should_capture(i)).collect();
        assert_eq!(captured, vec![3, 7, 9]);

        let last_only = OutputConfig {
            frames: 5,
            capture_every: 0,
            ..OutputConfig::default()
        };
        let captured: Vec<u64> = (0..5).filter(|&i| last_only.should_capture(i)).collect();
        assert_eq!(captured, vec![4]);
    }
}
