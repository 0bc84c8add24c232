use rand::Rng;

use crate::particles::particle::{Cloud, FogBand, RainDrop, Snowflake, SpawnBounds};
use crate::particles::spawner::{pool_size, spawn_clouds, spawn_fog, spawn_rain, spawn_snow};
use crate::particles::update::{update_clouds, update_fog, update_rain, update_snow, RainTiming};
use crate::weather::{Condition, WindLevel};

/// The effect set of one condition: its particle pool together with the
/// update and draw rules that apply to it.
///
/// Built once per condition change, so the per-frame code dispatches on a
/// single variant instead of re-checking the condition at every call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EffectLayer {
    /// No particles, nothing drawn
    #[default]
    Inert,
    /// Static sun glow in the upper right, no particles
    Glow,
    Rain {
        drops: Vec<RainDrop>,
        bounds: SpawnBounds,
    },
    Snow {
        flakes: Vec<Snowflake>,
        bounds: SpawnBounds,
    },
    Clouds {
        clouds: Vec<Cloud>,
        bounds: SpawnBounds,
    },
    Fog {
        bands: Vec<FogBand>,
        bounds: SpawnBounds,
    },
}

impl EffectLayer {
    /// Spawn a fresh layer for `condition` inside `bounds`
    pub fn spawn<R: Rng + ?Sized>(condition: Condition, bounds: SpawnBounds, rng: &mut R) -> Self {
        let count = pool_size(condition);
        if condition.is_rain_family() {
            return EffectLayer::Rain {
                drops: spawn_rain(rng, bounds, count),
                bounds,
            };
        }
        match condition {
            Condition::Rain | Condition::Drizzle | Condition::Thunder => unreachable!(),
            Condition::Snow => EffectLayer::Snow {
                flakes: spawn_snow(rng, bounds, count),
                bounds,
            },
            Condition::Clouds => EffectLayer::Clouds {
                clouds: spawn_clouds(rng, bounds, count),
                bounds,
            },
            Condition::Fog => EffectLayer::Fog {
                bands: spawn_fog(rng, bounds, count),
                bounds,
            },
            Condition::Clear => EffectLayer::Glow,
            Condition::None | Condition::Wind => EffectLayer::Inert,
        }
    }

    /// Advance every particle in the layer by `dt` milliseconds
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        wind: WindLevel,
        dt: f32,
        rain_timing: RainTiming,
        rng: &mut R,
    ) {
        match self {
            EffectLayer::Inert | EffectLayer::Glow => {}
            EffectLayer::Rain { drops, bounds } => {
                update_rain(drops, *bounds, wind, rain_timing.frames(dt), rng)
            }
            EffectLayer::Snow { flakes, bounds } => update_snow(flakes, *bounds, wind, dt, rng),
            EffectLayer::Clouds { clouds, bounds } => update_clouds(clouds, *bounds, wind, dt),
            EffectLayer::Fog { bands, bounds } => update_fog(bands, *bounds, wind, dt, rng),
        }
    }

    /// Live particles in the layer's pool
    pub fn len(&self) -> usize {
        match self {
            EffectLayer::Inert | EffectLayer::Glow => 0,
            EffectLayer::Rain { drops, .. } => drops.len(),
            EffectLayer::Snow { flakes, .. } => flakes.len(),
            EffectLayer::Clouds { clouds, .. } => clouds.len(),
            EffectLayer::Fog { bands, .. } => bands.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Viewport captured when the layer was spawned
    pub fn bounds(&self) -> Option<SpawnBounds> {
        match self {
            EffectLayer::Inert | EffectLayer::Glow => None,
            EffectLayer::Rain { bounds, .. }
            | EffectLayer::Snow { bounds, .. }
            | EffectLayer::Clouds { bounds, .. }
            | EffectLayer::Fog { bounds, .. } => Some(*bounds),
        }
    }

    pub fn rain(&self) -> &[RainDrop] {
        match self {
            EffectLayer::Rain { drops, .. } => drops,
            _ => &[],
        }
    }

    pub fn snow(&self) -> &[Snowflake] {
        match self {
            EffectLayer::Snow { flakes, .. } => flakes,
            _ => &[],
        }
    }

    pub fn clouds(&self) -> &[Cloud] {
        match self {
            EffectLayer::Clouds { clouds, .. } => clouds,
            _ => &[],
        }
    }

    pub fn fog(&self) -> &[FogBand] {
        match self {
            EffectLayer::Fog { bands, .. } => bands,
            _ => &[],
        }
    }
}
