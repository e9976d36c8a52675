//! Retained raster surface that executes [`DrawCommand`]s.
//!
//! The stroke trace relies on the surface keeping its pixels between frames
//! (segments are only ever appended and older strokes fade under translucent
//! fills), so this is a persistent `tiny_skia::Pixmap` rather than an immediate
//! mode canvas. Text is not rasterised here; it is kept as a list of labels for
//! the host to paint on top, and a label is dropped once an opaque fill covers
//! its anchor.

use tiny_skia::{BlendMode, Paint, PathBuilder, Pixmap, Transform};

use crate::render::{DrawCommand, Pos, Rect, Rgba, Stroke};

/// Text placed by a [`DrawCommand::Text`], bottom-right anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub anchor: Pos,
    pub text: String,
    pub size: f32,
    pub color: Rgba,
}

pub struct Surface {
    pixmap: Pixmap,
    labels: Vec<TextLabel>,
    dirty: bool,
}

impl Surface {
    /// Create a black surface. Zero dimensions are bumped to one pixel.
    ///
    /// Returns `None` when the pixmap cannot be allocated (too large).
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width.max(1), height.max(1))?;
        pixmap.fill(tiny_skia::Color::BLACK);
        Some(Self {
            pixmap,
            labels: Vec::new(),
            dirty: true,
        })
    }

    /// Back to black with no labels, keeping the size.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::BLACK);
        self.labels.clear();
        self.dirty = true;
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Whether pixels changed since the last [`take_dirty`](Self::take_dirty).
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Read back one pixel as premultiplied RGBA, for tests and probes.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
    }

    pub fn apply(&mut self, commands: &[DrawCommand]) {
        for cmd in commands {
            self.apply_one(cmd);
        }
    }

    fn apply_one(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::ClearRegion { rect, color } => {
                self.fill(*rect, *color, BlendMode::Source);
                self.drop_labels_in(rect);
            }
            DrawCommand::FilledRect { rect, color } => {
                self.fill(*rect, *color, BlendMode::SourceOver);
                if color.is_opaque() {
                    self.drop_labels_in(rect);
                }
            }
            DrawCommand::LineSegment { from, to, stroke } => {
                self.stroke_path([*from, *to].into_iter(), stroke);
            }
            DrawCommand::Polyline { points, stroke } => {
                self.stroke_path(points.iter().copied(), stroke);
            }
            DrawCommand::Text {
                anchor,
                text,
                size,
                color,
            } => {
                self.labels.push(TextLabel {
                    anchor: *anchor,
                    text: text.clone(),
                    size: *size,
                    color: *color,
                });
            }
        }
    }

    fn fill(&mut self, rect: Rect, color: Rgba, blend: BlendMode) {
        let Some(r) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.blend_mode = blend;
        paint.anti_alias = false;
        self.pixmap.fill_rect(r, &paint, Transform::identity(), None);
        self.dirty = true;
    }

    fn stroke_path(&mut self, mut points: impl Iterator<Item = Pos>, stroke: &Stroke) {
        let Some(first) = points.next() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        let mut segments = 0;
        for p in points {
            pb.line_to(p.x, p.y);
            segments += 1;
        }
        if segments == 0 {
            return;
        }
        let Some(path) = pb.finish() else {
            // zero-length paths have no bounds
            return;
        };
        let mut paint = Paint::default();
        let c = stroke.color;
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        paint.anti_alias = true;
        let sk_stroke = tiny_skia::Stroke {
            width: stroke.width,
            line_cap: tiny_skia::LineCap::Round,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &sk_stroke, Transform::identity(), None);
        self.dirty = true;
    }

    /// Drop labels whose last pixel, just up-left of the bottom-right
    /// anchor, lies inside `rect`.
    fn drop_labels_in(&mut self, rect: &Rect) {
        self.labels
            .retain(|l| !rect.contains(Pos::new(l.anchor.x - 0.5, l.anchor.y - 0.5)));
    }
}
