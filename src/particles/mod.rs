pub mod particle;
pub mod spawner;
pub mod update;
pub mod layer;
pub mod flash;

pub use particle::{Cloud, Flash, FogBand, RainDrop, Snowflake, SpawnBounds, RAIN_ANGLE};
pub use layer::EffectLayer;
pub use flash::{FlashPool, FlashTiming, FLASH_CHANCE};
pub use update::RainTiming;

use serde::Serialize;

/// Live particle counts, per kind
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParticleStats {
    pub rain: usize,
    pub snow: usize,
    pub clouds: usize,
    pub fog: usize,
    pub flashes: usize,
    /// Flashes created since the last condition change
    pub flashes_spawned: u64,
}

impl ParticleStats {
    pub fn collect(layer: &EffectLayer, flashes: &FlashPool) -> Self {
        Self {
            rain: layer.rain().len(),
            snow: layer.snow().len(),
            clouds: layer.clouds().len(),
            fog: layer.fog().len(),
            flashes: flashes.len(),
            flashes_spawned: flashes.spawned(),
        }
    }

    /// All pooled particles, flashes excluded
    pub fn total_particles(&self) -> usize {
        self.rain + self.snow + self.clouds + self.fog
    }
}
