//! Drawing abstraction the renderer paints through.
//!
//! The web front-end implements [`Surface`] over a 2D canvas context; tests
//! use [`Recording`] to assert on draw order and counts.

use glam::Vec2;
use smallvec::SmallVec;

use crate::color::Rgba;

pub type ColorStops = SmallVec<[(f32, Rgba); 4]>;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Radial gradient from `center` (offset 0) out to `radius` (offset 1).
    Radial {
        center: Vec2,
        radius: f32,
        stops: ColorStops,
    },
    Linear {
        from: Vec2,
        to: Vec2,
        stops: ColorStops,
    },
}

impl Paint {
    pub fn radial(center: Vec2, radius: f32, inner: Rgba, outer: Rgba) -> Self {
        let mut stops = ColorStops::new();
        stops.push((0.0, inner));
        stops.push((1.0, outer));
        Paint::Radial {
            center,
            radius,
            stops,
        }
    }
}

pub trait Surface {
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint);
    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    Line {
        a: Vec2,
        b: Vec2,
        color: Rgba,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct Recording {
    pub ops: Vec<DrawOp>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. }))
    }
}

impl Surface for Recording {
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: &Paint) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            paint: paint.clone(),
        });
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32) {
        self.ops.push(DrawOp::Line { a, b, color, width });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            paint: paint.clone(),
        });
    }
}
