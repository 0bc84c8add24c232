use glam::Vec2;

use crate::particles::{Cloud, EffectLayer, Flash, FogBand, RainDrop, Snowflake};
use crate::renderer::surface::{DrawSurface, GradientStop, Rect, Rgba};
use crate::renderer::Viewport;

// Paint constants
const GLOW_INNER: Rgba = Rgba::new(255, 255, 255, 0.08);
const GLOW_OUTER: Rgba = Rgba::new(255, 255, 255, 0.0);
const CLOUD_FILL: Rgba = Rgba::new(0xdd, 0xe7, 0xff, 1.0);
const FOG_CLEAR: Rgba = Rgba::new(230, 236, 255, 0.0);
const FOG_DENSE: Rgba = Rgba::new(230, 236, 255, 0.9);
const RAIN_STROKE: Rgba = Rgba::new(200, 220, 255, 0.5);
const RAIN_LINE_WIDTH: f32 = 1.2;
const SNOW_FILL: Rgba = Rgba::new(255, 255, 255, 0.9);

/// Blobs making up one cloud silhouette
pub const CLOUD_BLOBS: usize = 5;

/// Paint one frame: backdrop, pooled particles, then flashes on top.
///
/// Layers are drawn in a fixed order (glow, clouds, fog, rain or snow,
/// flashes) so a flash is never hidden behind anything else.
pub fn render<S: DrawSurface + ?Sized>(
    surface: &mut S,
    viewport: &Viewport,
    layer: &EffectLayer,
    flashes: &[Flash],
) {
    let (w, h) = (viewport.width, viewport.height);
    surface.clear(w, h);

    if matches!(layer, EffectLayer::Glow) {
        draw_glow(surface, w, h);
    }

    for cloud in layer.clouds() {
        draw_cloud(surface, cloud);
    }

    for band in layer.fog() {
        draw_fog_band(surface, band);
    }

    for drop in layer.rain() {
        draw_rain_drop(surface, drop);
    }

    for flake in layer.snow() {
        draw_snowflake(surface, flake);
    }

    for flash in flashes {
        draw_flash(surface, flash, w, h);
    }
}

/// Soft sun glow centred near the top right corner
pub fn draw_glow<S: DrawSurface + ?Sized>(surface: &mut S, w: f32, h: f32) {
    let center = Vec2::new(w * 0.75, h * 0.05);
    let stops = [
        GradientStop::new(0.0, GLOW_INNER),
        GradientStop::new(1.0, GLOW_OUTER),
    ];
    surface.fill_radial_gradient(center, 20.0, w * 0.5, &stops);
}

/// Bounding box of each blob in a cloud.
///
/// The horizontal offsets wobble with the cloud's position so the
/// silhouette shifts as it drifts.
pub fn cloud_blobs(cloud: &Cloud) -> [Rect; CLOUD_BLOBS] {
    let Vec2 { x, y } = cloud.position;
    let (w, h) = (cloud.width, cloud.height);
    std::array::from_fn(|i| {
        let i = i as f32;
        let bx = x + (i - 2.0) * (w / 6.0) + ((x + i * 20.0) * 0.01).sin() * 4.0;
        let by = y + (i % 2.0) * (h / 6.0);
        Rect::new(bx, by, w / 3.0, h / 1.8)
    })
}

pub fn draw_cloud<S: DrawSurface + ?Sized>(surface: &mut S, cloud: &Cloud) {
    let color = CLOUD_FILL.fade(cloud.opacity);
    let radius = cloud.height / 2.0;
    for blob in cloud_blobs(cloud) {
        surface.fill_rounded_rect(blob, radius, color);
    }
}

pub fn draw_fog_band<S: DrawSurface + ?Sized>(surface: &mut S, band: &FogBand) {
    let stops = [
        GradientStop::new(0.0, FOG_CLEAR.fade(band.opacity)),
        GradientStop::new(0.5, FOG_DENSE.fade(band.opacity)),
        GradientStop::new(1.0, FOG_CLEAR.fade(band.opacity)),
    ];
    let rect = Rect::new(band.position.x, band.position.y, band.width, band.height);
    surface.fill_vertical_gradient(rect, &stops);
}

pub fn draw_rain_drop<S: DrawSurface + ?Sized>(surface: &mut S, drop: &RainDrop) {
    surface.stroke_line(
        drop.position,
        drop.tail(),
        RAIN_LINE_WIDTH,
        RAIN_STROKE.fade(drop.opacity),
    );
}

pub fn draw_snowflake<S: DrawSurface + ?Sized>(surface: &mut S, flake: &Snowflake) {
    surface.fill_circle(flake.position, flake.radius, SNOW_FILL.fade(flake.opacity));
}

pub fn draw_flash<S: DrawSurface + ?Sized>(surface: &mut S, flash: &Flash, w: f32, h: f32) {
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), Rgba::WHITE.fade(flash.opacity()));
}
