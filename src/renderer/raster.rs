use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};

use crate::renderer::surface::{sample_gradient, DrawSurface, GradientStop, Rect, Rgba};
use crate::renderer::Viewport;

/// CPU rasterizer painting into an RGBA image.
///
/// Shapes are sampled once per device pixel at the pixel centre and blended
/// source-over. Draw calls take css pixel coordinates; the pixel-ratio scale
/// set in `configure` maps them onto the backing image.
pub struct PixelSurface {
    image: RgbaImage,
    scale: f32,
}

impl PixelSurface {
    pub fn new(viewport: &Viewport) -> Self {
        let (width, height) = viewport.backing_size();
        Self {
            image: RgbaImage::new(width, height),
            scale: viewport.device_pixel_ratio,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Backing pixel at device coordinates, if inside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Visit every device pixel whose centre lies in the css-space box
    /// `min..max`, passing the css-space centre of that pixel to `shade`.
    fn shade_box<F>(&mut self, min: Vec2, max: Vec2, mut shade: F)
    where
        F: FnMut(Vec2) -> Option<Rgba>,
    {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 || self.scale <= 0.0 {
            return;
        }
        let lo = (min * self.scale).floor().max(Vec2::ZERO);
        let hi = (max * self.scale).ceil().min(Vec2::new(width as f32, height as f32));
        if !(lo.x < hi.x && lo.y < hi.y) {
            return;
        }

        for py in lo.y as u32..hi.y as u32 {
            for px in lo.x as u32..hi.x as u32 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) / self.scale;
                if let Some(color) = shade(center) {
                    blend(self.image.get_pixel_mut(px, py), color);
                }
            }
        }
    }
}

/// Source-over blend of `color` onto `dst`
fn blend(dst: &mut Pixel<u8>, color: Rgba) {
    let src_a = color.a.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let channel = |s: u8, d: u8| {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let c = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };
    *dst = Pixel([
        channel(color.r, dst[0]),
        channel(color.g, dst[1]),
        channel(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

/// Distance from `p` to the segment `a..b`
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether `p` lies in `rect` with corners rounded by `radius`
fn in_rounded_rect(p: Vec2, rect: Rect, radius: f32) -> bool {
    let min = rect.min();
    let max = rect.max();
    if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
        return false;
    }
    let r = radius.min(rect.width * 0.5).min(rect.height * 0.5).max(0.0);
    let inner_min = min + Vec2::splat(r);
    let inner_max = max - Vec2::splat(r);
    let nearest = p.clamp(inner_min, inner_max);
    p.distance_squared(nearest) <= r * r
}

impl DrawSurface for PixelSurface {
    fn configure(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.backing_size();
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
        self.scale = viewport.device_pixel_ratio;
    }

    fn clear(&mut self, width: f32, height: f32) {
        let (img_w, img_h) = self.image.dimensions();
        let w = ((width * self.scale).ceil().max(0.0) as u32).min(img_w);
        let h = ((height * self.scale).ceil().max(0.0) as u32).min(img_h);
        for y in 0..h {
            for x in 0..w {
                self.image.put_pixel(x, y, Pixel([0, 0, 0, 0]));
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.shade_box(rect.min(), rect.max(), |_| Some(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r_sq = radius * radius;
        self.shade_box(center - radius, center + radius, |p| {
            (p.distance_squared(center) <= r_sq).then_some(color)
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) {
        self.shade_box(rect.min(), rect.max(), |p| {
            in_rounded_rect(p, rect, radius).then_some(color)
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        // Keep hairlines visible at one device pixel
        let half = (width * 0.5).max(0.5 / self.scale.max(1.0));
        let min = from.min(to) - half;
        let max = from.max(to) + half;
        self.shade_box(min, max, |p| {
            (segment_distance(p, from, to) <= half).then_some(color)
        });
    }

    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[GradientStop],
    ) {
        if outer_radius <= 0.0 {
            return;
        }
        let span = (outer_radius - inner_radius).max(f32::EPSILON);
        let outer_sq = outer_radius * outer_radius;
        self.shade_box(center - outer_radius, center + outer_radius, |p| {
            let d_sq = p.distance_squared(center);
            if d_sq > outer_sq {
                return None;
            }
            let t = (d_sq.sqrt() - inner_radius) / span;
            Some(sample_gradient(stops, t.clamp(0.0, 1.0)))
        });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) {
        if rect.height <= 0.0 {
            return;
        }
        self.shade_box(rect.min(), rect.max(), |p| {
            let t = (p.y - rect.y) / rect.height;
            Some(sample_gradient(stops, t.clamp(0.0, 1.0)))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: f32, h: f32, dpr: f32) -> PixelSurface {
        PixelSurface::new(&Viewport::new(w, h, dpr))
    }

    #[test]
    fn test_backing_store_follows_pixel_ratio() {
        let mut s = surface(100.0, 50.0, 2.0);
        assert_eq!(s.image().dimensions(), (200, 100));

        s.configure(&Viewport::new(30.0, 20.0, 1.0));
        assert_eq!(s.image().dimensions(), (30, 20));
        assert_eq!(s.scale(), 1.0);
    }

    #[test]
    fn test_fill_rect_is_opaque() {
        let mut s = surface(10.0, 10.0, 1.0);
        s.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), Rgba::WHITE);
        assert_eq!(s.pixel(3, 3), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clear_erases() {
        let mut s = surface(10.0, 10.0, 1.0);
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Rgba::WHITE);
        s.clear(10.0, 10.0);
        assert_eq!(s.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_circle_scaled_by_pixel_ratio() {
        let mut s = surface(20.0, 20.0, 2.0);
        s.fill_circle(Vec2::new(10.0, 10.0), 2.0, Rgba::WHITE);
        // css (10, 10) lands on device (20, 20)
        assert_eq!(s.pixel(20, 20).map(|p| p[3]), Some(255));
        assert_eq!(s.pixel(2, 2).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_translucent_blend() {
        let mut s = surface(4.0, 4.0, 1.0);
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgba::new(255, 255, 255, 0.5));
        let p = s.pixel(1, 1).unwrap_or_default();
        assert_eq!(p[0], 255);
        assert!((p[3] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_stroke_covers_segment() {
        let mut s = surface(20.0, 20.0, 1.0);
        s.stroke_line(Vec2::new(2.0, 10.5), Vec2::new(18.0, 10.5), 1.2, Rgba::WHITE);
        assert_eq!(s.pixel(10, 10).map(|p| p[3]), Some(255));
        assert_eq!(s.pixel(10, 3).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_shapes_outside_image_are_ignored() {
        let mut s = surface(10.0, 10.0, 1.0);
        s.fill_circle(Vec2::new(-50.0, -50.0), 5.0, Rgba::WHITE);
        s.fill_rect(Rect::new(100.0, 100.0, 5.0, 5.0), Rgba::WHITE);
        assert!(s.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_zero_sized_surface() {
        let mut s = surface(0.0, 0.0, 1.0);
        s.clear(0.0, 0.0);
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Rgba::WHITE);
        assert_eq!(s.pixel(0, 0), None);
    }

    #[test]
    fn test_rounded_rect_trims_corners() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(in_rounded_rect(Vec2::new(5.0, 5.0), rect, 4.0));
        assert!(!in_rounded_rect(Vec2::new(0.2, 0.2), rect, 4.0));
        assert!(in_rounded_rect(Vec2::new(0.2, 0.2), rect, 0.0));
    }
}
