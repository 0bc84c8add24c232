//! Ambient weather effects (rain, snow, fog, drifting clouds, thunder flashes
//! and a clear-sky glow) rendered onto a full-viewport 2D surface.
//!
//! The `FxEngine` owns the particle pools for one weather condition,
//! advances them every frame and paints them through the `DrawSurface`
//! trait. Native hosts render into a `PixelSurface`; with the `web` feature
//! the same engine drives an HTML canvas.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod particles;
pub mod renderer;
pub mod weather;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use config::FxConfig;
pub use engine::FxEngine;
pub use error::{FxError, FxResult};
pub use frame_loop::{FrameClock, FrameDriver, LoopHandle, Pacing, PendingFrame};
pub use particles::{FlashTiming, ParticleStats, RainTiming};
pub use renderer::{DrawSurface, PixelSurface, RecordingSurface, Viewport};
pub use weather::{Condition, WindLevel};
