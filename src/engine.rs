use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame_loop::{clamp_elapsed, FrameClock, LoopHandle};
use crate::particles::{EffectLayer, FlashPool, FlashTiming, ParticleStats, RainTiming};
use crate::renderer::{render, DrawSurface, Viewport};
use crate::weather::{Condition, WindLevel};

/// Weather effect engine.
///
/// Owns the particle pools for the active condition, advances them each
/// frame and paints them onto a `DrawSurface`. Everything runs on the
/// caller's thread; hosts call `frame` once per display refresh.
pub struct FxEngine<R = StdRng> {
    condition: Condition,
    wind: WindLevel,
    layer: EffectLayer,
    flashes: FlashPool,
    rain_timing: RainTiming,
    viewport: Viewport,
    rng: R,
    clock: FrameClock,
    loop_handle: Option<LoopHandle>,
}

impl FxEngine<StdRng> {
    /// Engine seeded from OS entropy
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, StdRng::from_entropy())
    }

    /// Engine with a reproducible random sequence
    pub fn with_seed(viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(viewport, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FxEngine<R> {
    pub fn with_rng(viewport: Viewport, rng: R) -> Self {
        Self {
            condition: Condition::None,
            wind: WindLevel::CALM,
            layer: EffectLayer::Inert,
            flashes: FlashPool::new(FlashTiming::default()),
            rain_timing: RainTiming::default(),
            viewport,
            rng,
            clock: FrameClock::new(),
            loop_handle: None,
        }
    }

    pub fn with_flash_timing(mut self, timing: FlashTiming) -> Self {
        self.flashes.set_timing(timing);
        self
    }

    pub fn with_rain_timing(mut self, timing: RainTiming) -> Self {
        self.rain_timing = timing;
        self
    }

    /// Switch to `condition`, discarding every pool and spawning fresh ones.
    ///
    /// Also starts the frame loop if it is not already running.
    pub fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
        // Release the old pool before allocating the new one
        self.layer = EffectLayer::Inert;
        self.flashes.clear();

        self.wind = condition.wind();
        self.layer = EffectLayer::spawn(condition, self.viewport.spawn_bounds(), &mut self.rng);

        log::info!(
            "Weather condition set to {} (wind {:.2}, {} particles)",
            condition,
            self.wind.value(),
            self.layer.len()
        );

        self.start();
    }

    /// Lenient variant of `set_condition` for untyped input
    pub fn set_condition_name(&mut self, name: &str) {
        self.set_condition(Condition::parse_lenient(name));
    }

    /// Advance the simulation by `elapsed_ms`, clamped to 50 ms
    pub fn advance(&mut self, elapsed_ms: f32) {
        let dt = clamp_elapsed(elapsed_ms);

        self.layer.update(self.wind, dt, self.rain_timing, &mut self.rng);
        self.flashes.update(dt);

        if self.condition.has_flashes() {
            if let Some(flash) = self.flashes.roll(dt, &mut self.rng) {
                log::trace!("Lightning flash for {:.0}ms", flash.lifespan);
            }
        }
    }

    /// Paint the current state onto `surface`
    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        render(surface, &self.viewport, &self.layer, self.flashes.flashes());
    }

    /// One scheduled frame: advance by the time since the previous frame,
    /// then render.
    ///
    /// Returns `false` without doing anything once the loop is stopped, so
    /// the host knows not to schedule another frame.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, timestamp_ms: f64, surface: &mut S) -> bool {
        if !self.is_running() {
            return false;
        }
        let dt = self.clock.tick(timestamp_ms);
        self.advance(dt);
        self.render(surface);
        true
    }

    /// Adopt a new viewport and reconfigure the surface for it.
    ///
    /// Live pools keep the bounds they were spawned with; the new size
    /// applies from the next condition change.
    pub fn resize<S: DrawSurface + ?Sized>(&mut self, viewport: Viewport, surface: &mut S) {
        log::debug!(
            "Resizing to {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio
        );
        self.viewport = viewport;
        surface.configure(&self.viewport);
    }

    /// Start the frame loop. Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.clock.reset();
        self.loop_handle = Some(LoopHandle::new());
        log::debug!("Frame loop started");
        true
    }

    /// Stop the frame loop; the next `frame` call returns `false`
    pub fn stop(&mut self) {
        if let Some(handle) = self.loop_handle.take() {
            handle.cancel();
            log::debug!("Frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.loop_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    /// Token that stops this engine's loop when cancelled
    pub fn loop_handle(&self) -> Option<LoopHandle> {
        self.loop_handle.clone()
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn wind(&self) -> WindLevel {
        self.wind
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layer(&self) -> &EffectLayer {
        &self.layer
    }

    pub fn flashes(&self) -> &FlashPool {
        &self.flashes
    }

    pub fn stats(&self) -> ParticleStats {
        ParticleStats::collect(&self.layer, &self.flashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    fn engine() -> FxEngine {
        FxEngine::with_seed(Viewport::new(800.0, 600.0, 1.0), 1234)
    }

    #[test]
    fn test_starts_idle() {
        let e = engine();
        assert_eq!(e.condition(), Condition::None);
        assert!(!e.is_running());
        assert_eq!(e.stats().total_particles(), 0);
    }

    #[test]
    fn test_set_condition_starts_loop_once() {
        let mut e = engine();
        e.set_condition(Condition::Rain);
        assert!(e.is_running());
        let handle = e.loop_handle();
        e.set_condition(Condition::Snow);
        assert!(e.is_running());
        // Still the same loop: cancelling the first handle stops it
        if let Some(handle) = handle {
            handle.cancel();
        }
        assert!(!e.is_running());
    }

    #[test]
    fn test_stopped_engine_skips_frames() {
        let mut e = engine();
        let mut surface = RecordingSurface::new();
        e.set_condition(Condition::Rain);
        assert!(e.frame(0.0, &mut surface));
        e.stop();
        let recorded = surface.commands().len();
        assert!(!e.frame(16.0, &mut surface));
        assert_eq!(surface.commands().len(), recorded);

        assert!(e.start());
        assert!(!e.start());
        assert!(e.frame(32.0, &mut surface));
    }

    #[test]
    fn test_wind_follows_condition() {
        let mut e = engine();
        e.set_condition(Condition::Thunder);
        assert_eq!(e.wind().value(), 0.25);
        e.set_condition_name("no-such-weather");
        assert_eq!(e.condition(), Condition::None);
        assert!(e.wind().is_calm());
    }

    #[test]
    fn test_resize_keeps_live_pool_bounds() {
        let mut e = engine();
        let mut surface = RecordingSurface::new();
        e.set_condition(Condition::Snow);
        e.resize(Viewport::new(200.0, 100.0, 2.0), &mut surface);

        let bounds = e.layer().bounds().map(|b| (b.width, b.height));
        assert_eq!(bounds, Some((800.0, 600.0)));

        e.set_condition(Condition::Snow);
        let bounds = e.layer().bounds().map(|b| (b.width, b.height));
        assert_eq!(bounds, Some((200.0, 100.0)));
    }

    #[test]
    fn test_rain_timing_applies_to_advance() {
        let mut per_frame = engine().with_rain_timing(RainTiming::PerFrame);
        let mut reference = engine().with_rain_timing(RainTiming::PerFrame);
        per_frame.set_condition(Condition::Rain);
        reference.set_condition(Condition::Rain);

        // Same steps however long each frame was
        per_frame.advance(8.0);
        reference.advance(16.0);
        assert_eq!(per_frame.layer(), reference.layer());

        let mut scaled = engine();
        scaled.set_condition(Condition::Rain);
        scaled.advance(8.0);
        assert_ne!(scaled.layer(), reference.layer());
    }

    #[test]
    fn test_flashes_only_roll_in_thunder() {
        let mut e = engine();
        e.set_condition(Condition::Rain);
        for _ in 0..5_000 {
            e.advance(16.0);
        }
        assert_eq!(e.stats().flashes_spawned, 0);
    }
}
