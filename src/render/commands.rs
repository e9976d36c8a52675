//! Backend-neutral draw primitives.
//!
//! Coordinates are device pixels with the origin at the surface's top-left
//! corner and `y` growing downwards.

use serde::{Deserialize, Serialize};

/// 8-bit straight-alpha colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Pos) -> Pos {
        Pos::new(self.x + by.x, self.y + by.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn offset(self, by: Pos) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Half-open: the left and top edges are inside, the right and bottom are not.
    pub fn contains(&self, p: Pos) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.width
            && p.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

impl Stroke {
    pub const fn new(width: f32, color: Rgba) -> Self {
        Self { color, width }
    }
}

/// One primitive for the drawing surface. Commands are applied in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Opaque fill replacing whatever was in `rect`.
    ClearRegion { rect: Rect, color: Rgba },
    LineSegment { from: Pos, to: Pos, stroke: Stroke },
    Polyline { points: Vec<Pos>, stroke: Stroke },
    /// Fill blended over existing content; low alpha fades older strokes.
    FilledRect { rect: Rect, color: Rgba },
    /// Text whose bottom-right corner sits at `anchor`.
    Text {
        anchor: Pos,
        text: String,
        size: f32,
        color: Rgba,
    },
}

/// Appends commands for one chart, translating chart-local coordinates by
/// the chart's origin on the surface.
pub struct RegionPainter<'a> {
    origin: Pos,
    out: &'a mut Vec<DrawCommand>,
}

impl<'a> RegionPainter<'a> {
    pub fn new(origin: Pos, out: &'a mut Vec<DrawCommand>) -> Self {
        Self { origin, out }
    }

    pub fn clear(&mut self, rect: Rect, color: Rgba) {
        self.out.push(DrawCommand::ClearRegion {
            rect: rect.offset(self.origin),
            color: color.with_alpha(255),
        });
    }

    pub fn fill(&mut self, rect: Rect, color: Rgba) {
        self.out.push(DrawCommand::FilledRect {
            rect: rect.offset(self.origin),
            color,
        });
    }

    pub fn line(&mut self, from: Pos, to: Pos, stroke: Stroke) {
        self.out.push(DrawCommand::LineSegment {
            from: from.offset(self.origin),
            to: to.offset(self.origin),
            stroke,
        });
    }

    pub fn polyline<I>(&mut self, points: I, stroke: Stroke)
    where
        I: IntoIterator<Item = Pos>,
    {
        let origin = self.origin;
        let points: Vec<Pos> = points.into_iter().map(|p| p.offset(origin)).collect();
        if points.is_empty() {
            return;
        }
        self.out.push(DrawCommand::Polyline { points, stroke });
    }

    pub fn text(&mut self, anchor: Pos, text: String, size: f32, color: Rgba) {
        self.out.push(DrawCommand::Text {
            anchor: anchor.offset(self.origin),
            text,
            size,
            color,
        });
    }
}
