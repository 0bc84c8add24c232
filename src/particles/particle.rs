use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction of every rain streak, radians from the +x axis (~207°).
///
/// The streak tail sits along this direction from the head; drops travel the
/// opposite way, so they fall down and to the right.
pub const RAIN_ANGLE: f32 = std::f32::consts::PI * 1.15;

/// Elapsed time (ms) that rain speeds are expressed against
pub const RAIN_REFERENCE_FRAME_MS: f32 = 16.0;

/// Viewport dimensions captured when a pool was spawned.
///
/// Recycling reuses these instead of the live viewport so a resize midway
/// through a condition cannot change a pool's recycle bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnBounds {
    pub width: f32,
    pub height: f32,
}

impl SpawnBounds {
    /// Negative or non-finite sizes collapse to an empty area
    pub fn new(width: f32, height: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Falling rain streak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    /// Head of the streak
    pub position: Vec2,
    pub length: f32,
    pub speed: f32,
    pub opacity: f32,
    pub angle: f32,
}

impl RainDrop {
    /// Unit vector the drop travels along
    pub fn travel_direction(&self) -> Vec2 {
        -Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// End of the streak behind the head
    pub fn tail(&self) -> Vec2 {
        self.position + Vec2::new(self.angle.cos(), self.angle.sin()) * self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub position: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Per-flake horizontal bias added to the wind push
    pub drift: f32,
    pub opacity: f32,
}

/// Soft cloud drifting across the upper part of the sky
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// Horizontal fog band, drawn as a vertical fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogBand {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub opacity: f32,
}

/// Full-viewport lightning flash
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    /// Milliseconds since the flash appeared
    pub elapsed: f32,
    /// Milliseconds the flash stays visible
    pub lifespan: f32,
}

impl Flash {
    /// Peak overlay opacity of a fresh flash
    pub const PEAK_OPACITY: f32 = 0.7;

    pub fn new(lifespan: f32) -> Self {
        Self {
            elapsed: 0.0,
            lifespan,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.elapsed < self.lifespan
    }

    /// Fraction of the lifespan still remaining, in [0, 1]
    pub fn remaining(&self) -> f32 {
        if self.lifespan <= 0.0 {
            return 0.0;
        }
        (1.0 - self.elapsed / self.lifespan).clamp(0.0, 1.0)
    }

    /// Overlay opacity, decaying linearly to zero at the end of the lifespan
    pub fn opacity(&self) -> f32 {
        Self::PEAK_OPACITY * self.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_travels_down_and_right() {
        let drop = RainDrop {
            position: Vec2::ZERO,
            length: 10.0,
            speed: 1.0,
            opacity: 0.5,
            angle: RAIN_ANGLE,
        };
        let dir = drop.travel_direction();
        assert!(dir.x > 0.0 && dir.y > 0.0);
        // Tail trails behind the head
        let tail = drop.tail();
        assert!(tail.x < 0.0 && tail.y < 0.0);
        assert!((tail.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_flash_opacity_decays() {
        let mut flash = Flash::new(400.0);
        assert!((flash.opacity() - 0.7).abs() < 1e-6);
        flash.elapsed = 200.0;
        assert!((flash.opacity() - 0.35).abs() < 1e-6);
        flash.elapsed = 400.0;
        assert!(!flash.is_alive());
        assert_eq!(flash.opacity(), 0.0);
    }

    #[test]
    fn test_spawn_bounds_sanitized() {
        let bounds = SpawnBounds::new(-10.0, f32::INFINITY);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
        assert!(bounds.is_empty());
        assert!(!SpawnBounds::new(800.0, 600.0).is_empty());
    }
}
