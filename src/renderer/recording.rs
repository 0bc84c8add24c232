use glam::Vec2;
use serde::Serialize;

use crate::renderer::surface::{DrawSurface, GradientStop, Rect, Rgba};
use crate::renderer::Viewport;

/// A single call made against a `RecordingSurface`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Configure { width: u32, height: u32, scale: f32 },
    Clear { width: f32, height: f32 },
    FillRect { rect: Rect, color: Rgba },
    FillCircle { center: [f32; 2], radius: f32, color: Rgba },
    FillRoundedRect { rect: Rect, radius: f32, color: Rgba },
    StrokeLine { from: [f32; 2], to: [f32; 2], width: f32, color: Rgba },
    RadialGradient { center: [f32; 2], inner_radius: f32, outer_radius: f32, stops: Vec<GradientStop> },
    VerticalGradient { rect: Rect, stops: Vec<GradientStop> },
}

/// Surface that records draw calls instead of producing pixels
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands recorded since the most recent `clear`
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn configure(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.backing_size();
        self.commands.push(DrawCommand::Configure {
            width,
            height,
            scale: viewport.device_pixel_ratio,
        });
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center: center.to_array(),
            radius,
            color,
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillRoundedRect { rect, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine {
            from: from.to_array(),
            to: to.to_array(),
            width,
            color,
        });
    }

    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[GradientStop],
    ) {
        self.commands.push(DrawCommand::RadialGradient {
            center: center.to_array(),
            inner_radius,
            outer_radius,
            stops: stops.to_vec(),
        });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::VerticalGradient {
            rect,
            stops: stops.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_frame_starts_at_clear() {
        let mut s = RecordingSurface::new();
        s.clear(10.0, 10.0);
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::WHITE);
        s.clear(10.0, 10.0);
        s.fill_circle(Vec2::ONE, 1.0, Rgba::WHITE);

        let frame = s.last_frame();
        assert_eq!(frame.len(), 2);
        assert!(matches!(frame[0], DrawCommand::Clear { .. }));
        assert!(matches!(frame[1], DrawCommand::FillCircle { .. }));
        assert_eq!(s.commands().len(), 4);
    }
}
