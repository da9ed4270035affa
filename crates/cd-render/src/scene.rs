//! A retained display list of 2D paint operations.
//!
//! The render pass emits `PaintOp`s into a `Scene`; a presenter (the wasm
//! surface adapter, or a test) replays them in order. Shapes are `kurbo`
//! values, colors are CSS color strings — the vocabulary of a Canvas2D
//! backend.

use kurbo::{BezPath, Circle, Line, Rect};

/// Horizontal anchor of a text op relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Stroke color and width.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// One drawing command.
#[derive(Debug, Clone)]
pub enum PaintOp {
    /// Clear the full surface to the background color.
    Clear {
        width: f64,
        height: f64,
        color: String,
    },
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        stroke: StrokeStyle,
    },
    Line {
        line: Line,
        stroke: StrokeStyle,
    },
    /// Filled and outlined circle (anchor handles).
    Circle {
        circle: Circle,
        fill: String,
        stroke: StrokeStyle,
    },
    /// Filled closed path (arrowheads).
    FillPath {
        path: BezPath,
        color: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: String,
        font: String,
        align: TextAlign,
    },
}

/// An ordered list of paint operations for one frame.
#[derive(Debug, Default)]
pub struct Scene {
    ops: Vec<PaintOp>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all ops. Call before repainting a frame into the same scene.
    pub fn reset(&mut self) {
        self.ops.clear();
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn clear(&mut self, width: f64, height: f64, color: impl Into<String>) {
        self.ops.push(PaintOp::Clear {
            width,
            height,
            color: color.into(),
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: impl Into<String>) {
        self.ops.push(PaintOp::FillRect {
            rect,
            color: color.into(),
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle) {
        self.ops.push(PaintOp::StrokeRect { rect, stroke });
    }

    pub fn line(&mut self, line: Line, stroke: StrokeStyle) {
        self.ops.push(PaintOp::Line { line, stroke });
    }

    pub fn circle(&mut self, circle: Circle, fill: impl Into<String>, stroke: StrokeStyle) {
        self.ops.push(PaintOp::Circle {
            circle,
            fill: fill.into(),
            stroke,
        });
    }

    pub fn fill_path(&mut self, path: BezPath, color: impl Into<String>) {
        self.ops.push(PaintOp::FillPath {
            path,
            color: color.into(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        text: impl Into<String>,
        color: impl Into<String>,
        font: impl Into<String>,
        align: TextAlign,
    ) {
        self.ops.push(PaintOp::Text {
            x,
            y,
            text: text.into(),
            color: color.into(),
            font: font.into(),
            align,
        });
    }

    /// The rendered text lines in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            PaintOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
