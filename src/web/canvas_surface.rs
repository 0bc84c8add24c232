use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::renderer::surface::{DrawSurface, GradientStop, Rect, Rgba};
use crate::renderer::Viewport;

/// `DrawSurface` backed by a canvas 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    fn log_js_error(op: &str, result: Result<(), JsValue>) {
        if let Err(err) = result {
            log::warn!("Canvas {} failed: {:?}", op, err);
        }
    }
}

impl DrawSurface for CanvasSurface {
    fn configure(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.backing_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let style = self.canvas.style();
        Self::log_js_error("style width", style.set_property("width", &format!("{}px", viewport.width)));
        Self::log_js_error("style height", style.set_property("height", &format!("{}px", viewport.height)));

        let dpr = f64::from(viewport.device_pixel_ratio);
        Self::log_js_error("set_transform", self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width.into(), height.into());
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.fill_rect(
            rect.x.into(),
            rect.y.into(),
            rect.width.into(),
            rect.height.into(),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.begin_path();
        Self::log_js_error(
            "arc",
            self.ctx.arc(
                center.x.into(),
                center.y.into(),
                radius.max(0.0).into(),
                0.0,
                std::f64::consts::TAU,
            ),
        );
        self.ctx.fill();
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) {
        let (x, y) = (f64::from(rect.x), f64::from(rect.y));
        let (w, h) = (f64::from(rect.width), f64::from(rect.height));
        let r = f64::from(radius).min(w / 2.0).min(h / 2.0).max(0.0);

        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        let corners = [
            (x + w, y, x + w, y + h),
            (x + w, y + h, x, y + h),
            (x, y + h, x, y),
            (x, y, x + w, y),
        ];
        for (x1, y1, x2, y2) in corners {
            Self::log_js_error("arc_to", self.ctx.arc_to(x1, y1, x2, y2, r));
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.ctx.set_line_width(width.into());
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x.into(), from.y.into());
        self.ctx.line_to(to.x.into(), to.y.into());
        self.ctx.stroke();
    }

    fn fill_radial_gradient(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        stops: &[GradientStop],
    ) {
        let (cx, cy) = (f64::from(center.x), f64::from(center.y));
        let outer = f64::from(outer_radius.max(0.0));
        let gradient = match self.ctx.create_radial_gradient(
            cx,
            cy,
            f64::from(inner_radius.max(0.0)),
            cx,
            cy,
            outer,
        ) {
            Ok(gradient) => gradient,
            Err(err) => {
                log::warn!("Canvas radial gradient failed: {:?}", err);
                return;
            }
        };
        for stop in stops {
            Self::log_js_error("add_color_stop", gradient.add_color_stop(stop.offset, &stop.color.to_css()));
        }

        self.ctx.set_fill_style(&gradient);
        self.ctx.begin_path();
        Self::log_js_error("arc", self.ctx.arc(cx, cy, outer, 0.0, std::f64::consts::TAU));
        self.ctx.fill();
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[GradientStop]) {
        let (x, y) = (f64::from(rect.x), f64::from(rect.y));
        let (w, h) = (f64::from(rect.width), f64::from(rect.height));
        let gradient = self.ctx.create_linear_gradient(x, y, x, y + h);
        for stop in stops {
            Self::log_js_error("add_color_stop", gradient.add_color_stop(stop.offset, &stop.color.to_css()));
        }
        self.ctx.set_fill_style(&gradient);
        self.ctx.fill_rect(x, y, w, h);
    }
}
