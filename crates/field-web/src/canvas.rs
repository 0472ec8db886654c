//! [`Surface`] over a 2D canvas context.

use std::f64::consts::TAU;

use field_core::surface::{ColorStops, Paint, Surface};
use field_core::{FieldError, Rgba, Viewport};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn create(document: &web::Document) -> Result<Self, FieldError> {
        let canvas = document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
            .ok_or_else(|| FieldError::SurfaceUnavailable("canvas element".into()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| FieldError::SurfaceUnavailable(format!("{e:?}")))?
            .and_then(|obj| obj.dyn_into::<web::CanvasRenderingContext2d>().ok())
            .ok_or_else(|| FieldError::SurfaceUnavailable("2d".into()))?;

        canvas.set_class_name("decision-field-canvas");
        let _ = canvas.set_attribute("aria-hidden", "true");
        let _ = canvas.set_attribute("role", "presentation");
        Ok(Self { canvas, ctx })
    }

    #[inline]
    pub fn element(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    /// Matches the backing store to CSS size × dpr and scales drawing to CSS px.
    pub fn resize(&mut self, viewport: Viewport, dpr: f64) {
        let w = viewport.width as f64;
        let h = viewport.height as f64;
        self.canvas.set_width((w * dpr).floor() as u32);
        self.canvas.set_height((h * dpr).floor() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{w}px"));
        let _ = style.set_property("height", &format!("{h}px"));
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn gradient_stops(gradient: &web::CanvasGradient, stops: &ColorStops) {
        for (offset, color) in stops {
            let _ = gradient.add_color_stop(*offset, &color.to_string());
        }
    }

    fn set_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            Paint::Radial {
                center,
                radius,
                stops,
            } => {
                let (x, y) = (center.x as f64, center.y as f64);
                match self
                    .ctx
                    .create_radial_gradient(x, y, 0.0, x, y, (*radius as f64).max(0.0))
                {
                    Ok(g) => {
                        Self::gradient_stops(&g, stops);
                        self.ctx.set_fill_style_canvas_gradient(&g);
                    }
                    Err(_) => self.fallback_fill(stops),
                }
            }
            Paint::Linear { from, to, stops } => {
                let g = self.ctx.create_linear_gradient(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                );
                Self::gradient_stops(&g, stops);
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
        }
    }

    // Degenerate gradients fall back to the first stop.
    fn fallback_fill(&self, stops: &ColorStops) {
        let color = stops.first().map_or(field_core::color::TRANSPARENT, |s| s.1);
        self.ctx.set_fill_style_str(&color.to_string());
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.set_fill(paint);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(a.x as f64, a.y as f64);
        self.ctx.line_to(b.x as f64, b.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.set_fill(paint);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }
}
