//! Frame scheduling: turning host timestamps into clamped elapsed times,
//! cancelling a running loop, and a native driver for headless hosts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::FxEngine;
use crate::renderer::DrawSurface;

/// Elapsed time assumed for the very first frame (ms)
pub const FIRST_FRAME_MS: f32 = 16.0;

/// Longest step the simulation will take in one frame (ms)
pub const MAX_FRAME_MS: f32 = 50.0;

/// Clamp an elapsed time into [0, MAX_FRAME_MS]. NaN counts as no time.
pub fn clamp_elapsed(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_nan() {
        return 0.0;
    }
    elapsed_ms.clamp(0.0, MAX_FRAME_MS)
}

/// Converts per-frame host timestamps into simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed milliseconds since the previous tick, clamped
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let elapsed = match self.last_timestamp {
            Some(last) => clamp_elapsed((timestamp_ms - last) as f32),
            None => FIRST_FRAME_MS,
        };
        self.last_timestamp = Some(timestamp_ms);
        elapsed
    }

    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

/// Cancellation token shared between an engine and whoever hosts its loop
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Frame request a host has outstanding, by the id the host handed back.
///
/// Browser hosts keep one of these so teardown can cancel the request
/// instead of leaving a callback scheduled against freed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingFrame(Option<i32>);

impl PendingFrame {
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    pub fn requested(&mut self, id: i32) {
        self.0 = Some(id);
    }

    /// The requested frame is running, so nothing is outstanding
    pub fn fired(&mut self) {
        self.0 = None;
    }

    /// Forget the request, returning its id for cancellation
    pub fn take(&mut self) -> Option<i32> {
        self.0.take()
    }
}

/// How a `FrameDriver` produces timestamps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Timestamps advance by a fixed interval with no waiting
    Synthetic,
    /// Sleep between frames and use wall-clock timestamps
    RealTime,
}

/// Per-frame information handed to a driver callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Zero-based frame index
    pub index: u64,
    pub timestamp_ms: f64,
}

/// Native stand-in for a display refresh callback
pub struct FrameDriver {
    interval_ms: f64,
    max_frames: u64,
    pacing: Pacing,
}

impl FrameDriver {
    pub fn new(interval_ms: f64, max_frames: u64) -> Self {
        Self {
            interval_ms: if interval_ms.is_finite() && interval_ms > 0.0 {
                interval_ms
            } else {
                f64::from(FIRST_FRAME_MS)
            },
            max_frames,
            pacing: Pacing::Synthetic,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Run frames until the budget is spent or the engine's loop stops.
    ///
    /// `on_frame` runs after each simulated and rendered frame. Returns the
    /// number of frames rendered.
    pub fn run<R, S, F, E>(
        &self,
        engine: &mut FxEngine<R>,
        surface: &mut S,
        mut on_frame: F,
    ) -> Result<u64, E>
    where
        R: Rng,
        S: DrawSurface + ?Sized,
        F: FnMut(FrameInfo, &FxEngine<R>, &S) -> Result<(), E>,
    {
        let started = Instant::now();
        let mut synthetic_ms = 0.0;
        let mut index = 0;

        while index < self.max_frames {
            let timestamp_ms = match self.pacing {
                Pacing::Synthetic => synthetic_ms,
                Pacing::RealTime => started.elapsed().as_secs_f64() * 1000.0,
            };

            if !engine.frame(timestamp_ms, surface) {
                log::debug!("Frame loop stopped after {} frames", index);
                break;
            }
            on_frame(FrameInfo { index, timestamp_ms }, engine, surface)?;

            index += 1;
            synthetic_ms += self.interval_ms;

            if self.pacing == Pacing::RealTime {
                let next = Duration::from_secs_f64(index as f64 * self.interval_ms / 1000.0);
                if let Some(wait) = next.checked_sub(started.elapsed()) {
                    std::thread::sleep(wait);
                }
            }
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_uses_default_step() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12_345.0), FIRST_FRAME_MS);
        assert_eq!(clock.tick(12_361.0), 16.0);
    }

    #[test]
    fn test_large_gaps_are_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(5_000.0), MAX_FRAME_MS);
        // Timestamps that go backwards count as no time
        assert_eq!(clock.tick(4_000.0), 0.0);
    }

    #[test]
    fn test_clamp_elapsed() {
        assert_eq!(clamp_elapsed(f32::NAN), 0.0);
        assert_eq!(clamp_elapsed(f32::INFINITY), MAX_FRAME_MS);
        assert_eq!(clamp_elapsed(-3.0), 0.0);
        assert_eq!(clamp_elapsed(33.3), 33.3);
    }

    #[test]
    fn test_loop_handle_cancel_is_shared() {
        let handle = LoopHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_cancelled());
        clone.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_pending_frame_lifecycle() {
        let mut pending = PendingFrame::default();
        assert!(!pending.is_pending());

        pending.requested(7);
        assert!(pending.is_pending());
        pending.fired();
        assert!(!pending.is_pending());

        pending.requested(8);
        assert_eq!(pending.take(), Some(8));
        assert_eq!(pending.take(), None);
        assert!(!pending.is_pending());
    }

    #[test]
    fn test_teardown_halts_a_scheduled_loop() {
        use crate::renderer::{RecordingSurface, Viewport};
        use crate::weather::Condition;

        let mut engine = FxEngine::with_seed(Viewport::new(320.0, 240.0, 1.0), 5);
        let mut surface = RecordingSurface::new();
        let mut pending = PendingFrame::default();

        engine.set_condition(Condition::Rain);
        assert!(engine.frame(0.0, &mut surface));
        pending.requested(1);

        // Host released: stop the engine and cancel what is outstanding
        engine.stop();
        assert_eq!(pending.take(), Some(1));

        // A frame that still slips through draws nothing and asks for no more
        let drawn = surface.commands().len();
        assert!(!engine.frame(16.0, &mut surface));
        assert_eq!(surface.commands().len(), drawn);
        assert!(!pending.is_pending());
    }

    #[test]
    fn test_driver_rejects_bad_interval() {
        let driver = FrameDriver::new(f64::NAN, 10);
        assert_eq!(driver.interval_ms, 16.0);
    }
}
