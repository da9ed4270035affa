pub mod paint;
pub mod scene;

pub use paint::{SelectionView, Theme, format_method, format_property, paint_scene};
pub use scene::{PaintOp, Scene, StrokeStyle, TextAlign};

// Re-export kurbo so presenters can match on shape types without a direct
// dependency.
pub use kurbo;
