use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particles::particle::{
    Cloud, Flash, FogBand, RainDrop, Snowflake, SpawnBounds, RAIN_REFERENCE_FRAME_MS,
};
use crate::particles::spawner::{fog_y, rain_x, uniform};
use crate::weather::WindLevel;

/// Rain speeds are multiplied by this to get units per reference frame
pub const RAIN_SPEED_SCALE: f32 = 8.0;

/// Drops recycle once they fall this far below the viewport
pub const RAIN_RECYCLE_OVERSHOOT: f32 = 20.0;

/// Snow wraps this far past any edge
pub const SNOW_EDGE: f32 = 5.0;

/// Clouds leave this much room off either side before wrapping
pub const CLOUD_EDGE: f32 = 50.0;

/// Fog bands wrap this far past the right edge
pub const FOG_EDGE: f32 = 60.0;

/// How far rain moves for a frame of a given length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainTiming {
    /// Step scaled by elapsed time, one full step per 16 ms
    #[default]
    TimeScaled,
    /// One full step every frame whatever its length. Visible speed follows
    /// the host's refresh rate.
    PerFrame,
}

impl RainTiming {
    /// Reference frames of rain motion covered by a frame of `dt` milliseconds
    pub fn frames(&self, dt: f32) -> f32 {
        match self {
            RainTiming::TimeScaled => dt / RAIN_REFERENCE_FRAME_MS,
            RainTiming::PerFrame => 1.0,
        }
    }
}

const SNOW_TIME_SCALE: f32 = 0.06;
const SNOW_FALL_BOOST: f32 = 1.6;
const CLOUD_BASE_DRIFT: f32 = 0.06;
const FOG_BASE_DRIFT: f32 = 0.05;

/// Move rain `frames` reference steps along its diagonal and recycle drops
/// that left the bottom
pub fn update_rain<R: Rng + ?Sized>(
    drops: &mut [RainDrop],
    bounds: SpawnBounds,
    wind: WindLevel,
    frames: f32,
    rng: &mut R,
) {

    for drop in drops.iter_mut() {
        let step = drop.speed * RAIN_SPEED_SCALE * frames;
        let dir = drop.travel_direction();
        drop.position.x += dir.x * step * wind.rain_factor();
        drop.position.y += dir.y * step;

        if drop.position.y > bounds.height + RAIN_RECYCLE_OVERSHOOT {
            drop.position.y = -RAIN_RECYCLE_OVERSHOOT;
            drop.position.x = rain_x(rng, bounds);
        }
    }
}

/// Let snow fall and drift, wrapping horizontally and re-seeding at the top
pub fn update_snow<R: Rng + ?Sized>(
    flakes: &mut [Snowflake],
    bounds: SpawnBounds,
    wind: WindLevel,
    dt: f32,
    rng: &mut R,
) {
    for flake in flakes.iter_mut() {
        flake.position.x += (flake.drift + wind.snow_push()) * dt * SNOW_TIME_SCALE;
        flake.position.y += flake.speed * dt * SNOW_TIME_SCALE * SNOW_FALL_BOOST;

        if flake.position.y > bounds.height + SNOW_EDGE {
            flake.position.y = -SNOW_EDGE;
            flake.position.x = uniform(rng, 0.0, bounds.width);
        }

        if flake.position.x < -SNOW_EDGE {
            flake.position.x = bounds.width + SNOW_EDGE;
        } else if flake.position.x > bounds.width + SNOW_EDGE {
            flake.position.x = -SNOW_EDGE;
        }
    }
}

/// Drift clouds to the right, re-entering from the left once fully gone
pub fn update_clouds(clouds: &mut [Cloud], bounds: SpawnBounds, wind: WindLevel, dt: f32) {
    for cloud in clouds.iter_mut() {
        cloud.position.x += cloud.speed * dt * (CLOUD_BASE_DRIFT + wind.value());

        if cloud.position.x - cloud.width > bounds.width + CLOUD_EDGE {
            cloud.position.x = -cloud.width - CLOUD_EDGE;
        }
    }
}

/// Drift fog bands; a wrapped band also gets a fresh vertical offset
pub fn update_fog<R: Rng + ?Sized>(
    bands: &mut [FogBand],
    bounds: SpawnBounds,
    wind: WindLevel,
    dt: f32,
    rng: &mut R,
) {
    for band in bands.iter_mut() {
        band.position.x += band.speed * dt * (FOG_BASE_DRIFT + wind.value());

        if band.position.x > bounds.width + FOG_EDGE {
            band.position.x = -band.width - FOG_EDGE;
            band.position.y = fog_y(rng, bounds, band.height);
        }
    }
}

/// Age flashes and drop the ones whose lifespan is over
pub fn update_flashes(flashes: &mut Vec<Flash>, dt: f32) {
    flashes.retain_mut(|flash| {
        flash.elapsed += dt;
        flash.is_alive()
    });
}
