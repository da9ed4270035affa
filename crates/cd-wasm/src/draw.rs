//! Replay a `Scene` onto an HTML `<canvas>` via `CanvasRenderingContext2d`.
//!
//! Pure translation: every `PaintOp` maps onto one Canvas2D primitive; no
//! drawing decisions are made here.

use cd_render::kurbo::PathEl;
use cd_render::{PaintOp, Scene, StrokeStyle, TextAlign};
use web_sys::CanvasRenderingContext2d;

pub fn replay(ctx: &CanvasRenderingContext2d, scene: &Scene) {
    for op in scene.ops() {
        match op {
            PaintOp::Clear {
                width,
                height,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(0.0, 0.0, *width, *height);
            }
            PaintOp::FillRect { rect, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
            }
            PaintOp::StrokeRect { rect, stroke } => {
                apply_stroke(ctx, stroke);
                ctx.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
            }
            PaintOp::Line { line, stroke } => {
                apply_stroke(ctx, stroke);
                ctx.begin_path();
                ctx.move_to(line.p0.x, line.p0.y);
                ctx.line_to(line.p1.x, line.p1.y);
                ctx.stroke();
            }
            PaintOp::Circle {
                circle,
                fill,
                stroke,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(
                    circle.center.x,
                    circle.center.y,
                    circle.radius,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(fill);
                ctx.fill();
                apply_stroke(ctx, stroke);
                ctx.stroke();
            }
            PaintOp::FillPath { path, color } => {
                ctx.begin_path();
                for el in path.elements() {
                    match *el {
                        PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
                        PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
                        PathEl::QuadTo(c, p) => ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                        PathEl::CurveTo(c1, c2, p) => {
                            ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                        }
                        PathEl::ClosePath => ctx.close_path(),
                    }
                }
                ctx.set_fill_style_str(color);
                ctx.fill();
            }
            PaintOp::Text {
                x,
                y,
                text,
                color,
                font,
                align,
            } => {
                ctx.set_font(font);
                ctx.set_fill_style_str(color);
                ctx.set_text_baseline("alphabetic");
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                let _ = ctx.fill_text(text, *x, *y);
            }
        }
    }
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &StrokeStyle) {
    ctx.set_stroke_style_str(&stroke.color);
    ctx.set_line_width(stroke.width);
}
