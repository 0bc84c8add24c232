use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particles::particle::{Flash, RAIN_REFERENCE_FRAME_MS};
use crate::particles::spawner::spawn_flash;
use crate::particles::update::update_flashes;

/// Chance of a new lightning flash per roll
pub const FLASH_CHANCE: f64 = 0.005;

/// How the per-frame flash roll relates to elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashTiming {
    /// One roll at `FLASH_CHANCE` per frame. Flash frequency follows the
    /// host's refresh rate.
    #[default]
    PerFrame,
    /// Probability scaled so the rate matches `PerFrame` at 16 ms frames
    /// regardless of the actual frame interval.
    TimeScaled,
}

impl FlashTiming {
    /// Probability of a flash appearing during a frame of `dt` milliseconds
    pub fn chance(&self, dt: f32) -> f64 {
        match self {
            FlashTiming::PerFrame => FLASH_CHANCE,
            FlashTiming::TimeScaled => {
                let frames = f64::from(dt.max(0.0)) / f64::from(RAIN_REFERENCE_FRAME_MS);
                1.0 - (1.0 - FLASH_CHANCE).powf(frames)
            }
        }
    }
}

/// Live lightning flashes and the roll that creates them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlashPool {
    flashes: Vec<Flash>,
    timing: FlashTiming,
    spawned: u64,
}

impl FlashPool {
    pub fn new(timing: FlashTiming) -> Self {
        Self {
            flashes: Vec::new(),
            timing,
            spawned: 0,
        }
    }

    /// Age live flashes, dropping expired ones
    pub fn update(&mut self, dt: f32) {
        update_flashes(&mut self.flashes, dt);
    }

    /// Roll for a new flash; returns it when one appeared
    pub fn roll<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<Flash> {
        let chance = self.timing.chance(dt).clamp(0.0, 1.0);
        if rng.gen_bool(chance) {
            let flash = spawn_flash(rng);
            self.flashes.push(flash);
            self.spawned += 1;
            Some(flash)
        } else {
            None
        }
    }

    /// Remove every flash and reset the spawn counter
    pub fn clear(&mut self) {
        self.flashes.clear();
        self.spawned = 0;
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }

    /// Flashes created since the last `clear`
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn set_timing(&mut self, timing: FlashTiming) {
        self.timing = timing;
    }
}
