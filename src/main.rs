//! Headless weather-fx renderer
//! Simulates a weather condition and writes frames to PNG files
//!
//! Usage: weather-fx [config.toml] [condition]

use anyhow::{Context, Result};
use serde::Serialize;

use weather_fx::renderer::{frame_file_name, save_screenshot};
use weather_fx::{Condition, FrameDriver, FxConfig, FxEngine, ParticleStats, PixelSurface};

/// Printed as JSON once the run finishes
#[derive(Debug, Serialize)]
struct RunSummary {
    condition: Condition,
    wind: f32,
    frames_rendered: u64,
    frames_written: u64,
    stats: ParticleStats,
    directory: String,
    finished_at: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) if path.ends_with(".toml") => FxConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        Some(condition) => FxConfig {
            condition,
            ..FxConfig::default()
        },
        None => FxConfig::default(),
    };
    if let Some(condition) = args.next() {
        config.condition = condition;
    }

    let condition = config.condition();
    if !config.condition.trim().is_empty() && config.condition.parse::<Condition>().is_err() {
        log::warn!("Unknown condition {:?}, rendering nothing", config.condition);
    }

    let viewport = config.viewport.to_viewport();
    let mut engine = match config.seed {
        Some(seed) => FxEngine::with_seed(viewport, seed),
        None => FxEngine::new(viewport),
    }
    .with_flash_timing(config.flash_timing)
    .with_rain_timing(config.rain_timing);
    let mut surface = PixelSurface::new(&viewport);

    engine.set_condition(condition);

    let output = &config.output;
    let driver = FrameDriver::new(output.frame_interval_ms, output.frames).with_pacing(output.pacing);
    let mut written = 0;

    let rendered = driver.run(&mut engine, &mut surface, |frame, _engine, surface| -> Result<()> {
        if output.should_capture(frame.index) {
            let path = output
                .directory
                .join(frame_file_name(condition.as_str(), frame.index));
            save_screenshot(surface, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += 1;
        }
        Ok(())
    })?;

    let summary = RunSummary {
        condition,
        wind: engine.wind().value(),
        frames_rendered: rendered,
        frames_written: written,
        stats: engine.stats(),
        directory: output.directory.display().to_string(),
        finished_at: chrono::Local::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
