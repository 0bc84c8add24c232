use glam::Vec2;
use rand::Rng;

use crate::particles::particle::{
    Cloud, Flash, FogBand, RainDrop, Snowflake, SpawnBounds, RAIN_ANGLE,
};
use crate::weather::Condition;

/// Pool sizes per condition
pub const RAIN_POOL: usize = 400;
pub const DRIZZLE_POOL: usize = 200;
pub const THUNDER_POOL: usize = 450;
pub const SNOW_POOL: usize = 220;
pub const CLOUD_POOL: usize = 8;
pub const FOG_POOL: usize = 7;

/// Rain spawns over the viewport grown by this much on every side
pub const RAIN_MARGIN: f32 = 100.0;

/// Clouds live in the top fraction of the viewport
pub const CLOUD_BAND: f32 = 0.4;

/// Lifespan range of a lightning flash (ms)
pub const FLASH_LIFESPAN_MS: (f32, f32) = (400.0, 800.0);

/// Number of particles a condition spawns into its pool
pub fn pool_size(condition: Condition) -> usize {
    match condition {
        Condition::Rain => RAIN_POOL,
        Condition::Drizzle => DRIZZLE_POOL,
        Condition::Thunder => THUNDER_POOL,
        Condition::Snow => SNOW_POOL,
        Condition::Clouds => CLOUD_POOL,
        Condition::Fog => FOG_POOL,
        Condition::Clear | Condition::None | Condition::Wind => 0,
    }
}

/// Uniform sample in [min, max). Unlike `gen_range` this never panics when
/// the range is empty or inverted, which happens with zero-area viewports.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

/// Horizontal position for a rain drop, margin included
pub fn rain_x<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds) -> f32 {
    uniform(rng, -RAIN_MARGIN, bounds.width + RAIN_MARGIN)
}

pub fn spawn_rain<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds, count: usize) -> Vec<RainDrop> {
    (0..count)
        .map(|_| RainDrop {
            position: Vec2::new(
                rain_x(rng, bounds),
                uniform(rng, -RAIN_MARGIN, bounds.height + RAIN_MARGIN),
            ),
            length: uniform(rng, 8.0, 24.0),
            speed: uniform(rng, 1.0, 2.5),
            opacity: uniform(rng, 0.35, 0.75),
            angle: RAIN_ANGLE,
        })
        .collect()
}

pub fn spawn_snow<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds, count: usize) -> Vec<Snowflake> {
    (0..count)
        .map(|_| Snowflake {
            position: Vec2::new(
                uniform(rng, 0.0, bounds.width),
                uniform(rng, 0.0, bounds.height),
            ),
            radius: uniform(rng, 0.8, 3.0),
            speed: uniform(rng, 0.3, 0.9),
            drift: uniform(rng, -0.25, 0.25),
            opacity: uniform(rng, 0.6, 0.95),
        })
        .collect()
}

pub fn spawn_clouds<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds, count: usize) -> Vec<Cloud> {
    (0..count)
        .map(|_| Cloud {
            position: Vec2::new(
                uniform(rng, 0.0, bounds.width),
                uniform(rng, 0.0, bounds.height * CLOUD_BAND),
            ),
            width: uniform(rng, 120.0, 340.0),
            height: uniform(rng, 50.0, 130.0),
            speed: uniform(rng, 0.08, 0.18),
            opacity: uniform(rng, 0.05, 0.13),
        })
        .collect()
}

pub fn spawn_fog<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds, count: usize) -> Vec<FogBand> {
    (0..count)
        .map(|_| {
            let width = bounds.width * uniform(rng, 0.6, 1.4);
            let height = uniform(rng, 40.0, 160.0);
            FogBand {
                // Bands may start partly or entirely left of the viewport
                position: Vec2::new(
                    uniform(rng, -width, bounds.width),
                    fog_y(rng, bounds, height),
                ),
                width,
                height,
                speed: uniform(rng, 0.02, 0.08),
                opacity: uniform(rng, 0.06, 0.18),
            }
        })
        .collect()
}

/// Vertical offset that keeps a band of `height` inside the viewport
pub fn fog_y<R: Rng + ?Sized>(rng: &mut R, bounds: SpawnBounds, height: f32) -> f32 {
    uniform(rng, 0.0, bounds.height - height)
}

pub fn spawn_flash<R: Rng + ?Sized>(rng: &mut R) -> Flash {
    Flash::new(uniform(rng, FLASH_LIFESPAN_MS.0, FLASH_LIFESPAN_MS.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds() -> SpawnBounds {
        SpawnBounds::new(1024.0, 768.0)
    }

    #[test]
    fn test_rain_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let drops = spawn_rain(&mut rng, bounds(), RAIN_POOL);
        assert_eq!(drops.len(), RAIN_POOL);
        for d in &drops {
            assert!(d.position.x >= -100.0 && d.position.x <= 1124.0);
            assert!(d.position.y >= -100.0 && d.position.y <= 868.0);
            assert!((8.0..=24.0).contains(&d.length));
            assert!((1.0..=2.5).contains(&d.speed));
            assert!((0.35..=0.75).contains(&d.opacity));
            assert_eq!(d.angle, RAIN_ANGLE);
        }
    }

    #[test]
    fn test_snow_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for f in spawn_snow(&mut rng, bounds(), SNOW_POOL) {
            assert!(f.position.x >= 0.0 && f.position.x <= 1024.0);
            assert!(f.position.y >= 0.0 && f.position.y <= 768.0);
            assert!((0.8..=3.0).contains(&f.radius));
            assert!((0.3..=0.9).contains(&f.speed));
            assert!((-0.25..=0.25).contains(&f.drift));
            assert!((0.6..=0.95).contains(&f.opacity));
        }
    }

    #[test]
    fn test_clouds_stay_in_upper_band() {
        let mut rng = StdRng::seed_from_u64(3);
        for c in spawn_clouds(&mut rng, bounds(), 200) {
            assert!(c.position.y <= 768.0 * CLOUD_BAND);
            assert!((120.0..=340.0).contains(&c.width));
            assert!((50.0..=130.0).contains(&c.height));
            assert!((0.08..=0.18).contains(&c.speed));
            assert!((0.05..=0.13).contains(&c.opacity));
        }
    }

    #[test]
    fn test_fog_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        for f in spawn_fog(&mut rng, bounds(), 100) {
            assert!(f.width >= 1024.0 * 0.6 && f.width <= 1024.0 * 1.4);
            assert!((40.0..=160.0).contains(&f.height));
            assert!(f.position.x >= -f.width && f.position.x <= 1024.0);
            assert!(f.position.y >= 0.0 && f.position.y + f.height <= 768.0 + 1e-3);
            assert!((0.02..=0.08).contains(&f.speed));
            assert!((0.06..=0.18).contains(&f.opacity));
        }
    }

    #[test]
    fn test_zero_area_viewport_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty = SpawnBounds::new(0.0, 0.0);
        assert_eq!(spawn_fog(&mut rng, empty, FOG_POOL).len(), FOG_POOL);
        assert_eq!(spawn_snow(&mut rng, empty, SNOW_POOL).len(), SNOW_POOL);
        assert_eq!(spawn_clouds(&mut rng, empty, CLOUD_POOL).len(), CLOUD_POOL);
    }

    #[test]
    fn test_flash_lifespan() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let flash = spawn_flash(&mut rng);
            assert_eq!(flash.elapsed, 0.0);
            assert!((400.0..=800.0).contains(&flash.lifespan));
        }
    }

    #[test]
    fn test_pool_sizes() {
        assert_eq!(pool_size(Condition::Rain), 400);
        assert_eq!(pool_size(Condition::Drizzle), 200);
        assert_eq!(pool_size(Condition::Thunder), 450);
        assert_eq!(pool_size(Condition::Snow), 220);
        assert_eq!(pool_size(Condition::Clouds), 8);
        assert_eq!(pool_size(Condition::Fog), 7);
        assert_eq!(pool_size(Condition::Clear), 0);
    }
}
