//! Diagram → paint operations.
//!
//! Walks the store and the current selection into a `Scene`, in fixed
//! order: clear, arrows (body, arrowhead, then anchors on top), blocks in
//! store order with their three stacked text sections. Reads only —
//! painting never mutates model or interaction state.

use crate::scene::{Scene, StrokeStyle, TextAlign};
use cd_core::{
    ANCHOR_RADIUS, ARROWHEAD_LEN, Anchor, AnchorEnd, Arrow, ArrowId, Attribute, Block, BlockId,
    CORNER_SIZE, DiagramStore, Point,
};
use kurbo::{BezPath, Circle, Line, Rect};

const FONT: &str = "14px Arial";
/// Name baseline below the block top.
const NAME_BASELINE: f64 = 20.0;
/// First field baseline below the block top.
const SECTION_TOP: f64 = 40.0;
const LINE_HEIGHT: f64 = 20.0;
/// Separator rule offset below the text baseline above it.
const SEPARATOR_GAP: f64 = 5.0;
/// Left inset of field text inside the block.
const TEXT_INSET: f64 = 5.0;
/// Arrowhead half-angle: ±30° around the line direction.
const ARROWHEAD_SPREAD: f64 = std::f64::consts::FRAC_PI_6;

/// Theme-dependent colors for the canvas.
pub struct Theme {
    pub bg: &'static str,
    pub block_fill: &'static str,
    pub block_stroke: &'static str,
    /// Stroke emphasis for the selected block or arrow, and its handles.
    pub selection: &'static str,
    pub separator: &'static str,
    pub arrow: &'static str,
    pub anchor_attached: &'static str,
    pub anchor_free: &'static str,
    pub anchor_outline: &'static str,
    pub name_text: &'static str,
    pub field_text: &'static str,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            bg: "#FFFFFF",
            block_fill: "#FFFFFF",
            block_stroke: "#000000",
            selection: "#CCE5FF",
            separator: "#CCE5FF",
            arrow: "#000000",
            anchor_attached: "red",
            anchor_free: "blue",
            anchor_outline: "#000000",
            name_text: "#6F42C1",
            field_text: "#000000",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            block_fill: "#2C2C2E",
            block_stroke: "#E5E5EA",
            selection: "#4FC3F7",
            separator: "#3A3A3C",
            arrow: "#E5E5EA",
            anchor_attached: "#FF6B6B",
            anchor_free: "#74C0FC",
            anchor_outline: "#1C1C1E",
            name_text: "#B794F6",
            field_text: "#E5E5EA",
        }
    }
}

/// The slice of interaction state the renderer reads. The surface adapter
/// builds one from the controller's selection each frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionView {
    pub block: Option<BlockId>,
    pub arrow: Option<ArrowId>,
}

/// Paint one frame of the diagram into `scene`.
pub fn paint_scene(
    scene: &mut Scene,
    store: &DiagramStore,
    selection: SelectionView,
    theme: &Theme,
) {
    let surface = store.surface();
    scene.clear(surface.width as f64, surface.height as f64, theme.bg);

    for arrow in store.arrows() {
        paint_arrow(scene, arrow, selection.arrow == Some(arrow.id), theme);
    }
    for block in store.blocks() {
        paint_block(scene, block, selection.block == Some(block.id), theme);
    }
    log::trace!(
        "painted {} arrows, {} blocks",
        store.arrows().len(),
        store.blocks().len()
    );
}

// ─── Arrows ──────────────────────────────────────────────────────────────

fn paint_arrow(scene: &mut Scene, arrow: &Arrow, selected: bool, theme: &Theme) {
    let (a, b) = arrow.endpoints();
    let color = if selected { theme.selection } else { theme.arrow };

    scene.line(
        Line::new((a.x as f64, a.y as f64), (b.x as f64, b.y as f64)),
        StrokeStyle::new(color, 1.0),
    );
    scene.fill_path(arrowhead(a, b), color);

    // Anchors after the line so they render on top of it.
    for end in AnchorEnd::BOTH {
        paint_anchor(scene, arrow.anchor(end), theme);
    }
}

/// Filled triangle at `b`, spread ±30° back along the `a`→`b` direction.
fn arrowhead(a: Point, b: Point) -> BezPath {
    let angle = ((b.y - a.y) as f64).atan2((b.x - a.x) as f64);
    let len = ARROWHEAD_LEN as f64;
    let tip = (b.x as f64, b.y as f64);

    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to((
        tip.0 - len * (angle - ARROWHEAD_SPREAD).cos(),
        tip.1 - len * (angle - ARROWHEAD_SPREAD).sin(),
    ));
    path.line_to((
        tip.0 - len * (angle + ARROWHEAD_SPREAD).cos(),
        tip.1 - len * (angle + ARROWHEAD_SPREAD).sin(),
    ));
    path.close_path();
    path
}

fn paint_anchor(scene: &mut Scene, anchor: &Anchor, theme: &Theme) {
    let fill = if anchor.is_attached() {
        theme.anchor_attached
    } else {
        theme.anchor_free
    };
    scene.circle(
        Circle::new((anchor.x as f64, anchor.y as f64), ANCHOR_RADIUS as f64),
        fill,
        StrokeStyle::new(theme.anchor_outline, 1.0),
    );
}

// ─── Blocks ──────────────────────────────────────────────────────────────

fn paint_block(scene: &mut Scene, block: &Block, selected: bool, theme: &Theme) {
    let x = block.x as f64;
    let y = block.y as f64;
    let w = block.width as f64;
    let h = block.height as f64;

    scene.fill_rect(Rect::new(x, y, x + w, y + h), theme.block_fill);

    // Outline sits 1px outside the fill so it never covers content.
    let outline = Rect::new(x - 1.0, y - 1.0, x + w + 1.0, y + h + 1.0);
    if selected {
        scene.stroke_rect(outline, StrokeStyle::new(theme.selection, 2.0));
        for corner in block.rect().corners() {
            paint_corner_handle(scene, corner, theme);
        }
    } else {
        scene.stroke_rect(outline, StrokeStyle::new(theme.block_stroke, 1.0));
    }

    paint_sections(scene, block, theme);
}

fn paint_corner_handle(scene: &mut Scene, corner: Point, theme: &Theme) {
    let half = (CORNER_SIZE / 2.0) as f64;
    let cx = corner.x as f64;
    let cy = corner.y as f64;
    scene.fill_rect(
        Rect::new(cx - half, cy - half, cx + half, cy + half),
        theme.selection,
    );
}

/// The three stacked sections: centered name, properties, methods — each
/// section closed by a 1px separator rule. Empty lists render nothing
/// beyond the rule.
fn paint_sections(scene: &mut Scene, block: &Block, theme: &Theme) {
    let x = block.x as f64;
    let y = block.y as f64;
    let w = block.width as f64;
    let left = x + TEXT_INSET;

    scene.text(
        x + w / 2.0,
        y + NAME_BASELINE,
        &block.class_info.name,
        theme.name_text,
        FONT,
        TextAlign::Center,
    );
    separator(scene, x, y + NAME_BASELINE + SEPARATOR_GAP, w, theme);

    let mut baseline = y + SECTION_TOP;
    for attr in &block.class_info.properties {
        scene.text(
            left,
            baseline,
            format_property(attr),
            theme.field_text,
            FONT,
            TextAlign::Left,
        );
        baseline += LINE_HEIGHT;
    }
    let props_height = block.class_info.properties.len() as f64 * LINE_HEIGHT;
    separator(
        scene,
        x,
        y + NAME_BASELINE + props_height + SEPARATOR_GAP,
        w,
        theme,
    );

    for attr in &block.class_info.methods {
        scene.text(
            left,
            baseline,
            format_method(attr),
            theme.name_text,
            FONT,
            TextAlign::Left,
        );
        baseline += LINE_HEIGHT;
    }
}

fn separator(scene: &mut Scene, x: f64, y: f64, width: f64, theme: &Theme) {
    scene.fill_rect(Rect::new(x, y, x + width, y + 1.0), theme.separator);
}

// ─── Text formatting ─────────────────────────────────────────────────────

/// `<glyphs> name: type` for a property line.
pub fn format_property(attr: &Attribute) -> String {
    format!("{} {}: {}", glyphs(attr), attr.name, attr.ty)
}

/// `<glyphs> name(param, param): returnType` for a method line.
pub fn format_method(attr: &Attribute) -> String {
    let params = attr.parameters.as_deref().unwrap_or_default().join(", ");
    format!("{} {}({}): {}", glyphs(attr), attr.name, params, attr.ty)
}

/// Access-modifier glyph (`+` public or unspecified, `-` private, `#`
/// protected) plus `*` when the modifiers include `readonly`.
fn glyphs(attr: &Attribute) -> String {
    let access = match attr.visibility() {
        Some("private") => '-',
        Some("protected") => '#',
        _ => '+',
    };
    let mut out = String::from(access);
    if attr.is_readonly() {
        out.push('*');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PaintOp;
    use cd_core::{ClassInfo, DiagramStore, Surface};
    use pretty_assertions::assert_eq;

    fn sample_store() -> (DiagramStore, BlockId) {
        let mut store = DiagramStore::new(Surface {
            width: 1120.0,
            height: 620.0,
        });
        let mut info = ClassInfo::named("Foo");
        info.properties
            .push(Attribute::property("bar", "number").with_modifier("public"));
        let id = store.add_block(info);
        (store, id)
    }

    #[test]
    fn frame_starts_with_clear() {
        let (store, _) = sample_store();
        let mut scene = Scene::new();
        paint_scene(&mut scene, &store, SelectionView::default(), &Theme::light());
        assert!(matches!(
            scene.ops().first(),
            Some(PaintOp::Clear {
                width,
                height,
                ..
            }) if *width == 1120.0 && *height == 620.0
        ));
    }

    #[test]
    fn block_renders_its_property_line() {
        let (store, _) = sample_store();
        let mut scene = Scene::new();
        paint_scene(&mut scene, &store, SelectionView::default(), &Theme::light());

        let texts: Vec<&str> = scene.texts().collect();
        assert_eq!(texts, vec!["Foo", "+ bar: number"]);
    }

    #[test]
    fn empty_sections_render_rules_only() {
        let mut store = DiagramStore::new(Surface::default());
        store.add_block(ClassInfo::named("Empty"));
        let mut scene = Scene::new();
        paint_scene(&mut scene, &store, SelectionView::default(), &Theme::light());

        let texts: Vec<&str> = scene.texts().collect();
        assert_eq!(texts, vec!["Empty"]);
        // Two separator rules: one under the name, one closing properties.
        let rules = scene
            .ops()
            .iter()
            .filter(|op| matches!(op, PaintOp::FillRect { rect, .. } if rect.height() == 1.0))
            .count();
        assert_eq!(rules, 2);
    }

    #[test]
    fn selected_block_gets_highlight_and_handles() {
        let (store, block) = sample_store();
        let mut scene = Scene::new();
        paint_scene(
            &mut scene,
            &store,
            SelectionView {
                block: Some(block),
                arrow: None,
            },
            &Theme::light(),
        );

        let handles = scene
            .ops()
            .iter()
            .filter(|op| {
                matches!(op, PaintOp::FillRect { rect, color }
                    if color == "#CCE5FF" && rect.width() == CORNER_SIZE as f64)
            })
            .count();
        assert_eq!(handles, 4);
        assert!(scene.ops().iter().any(|op| {
            matches!(op, PaintOp::StrokeRect { stroke, .. } if stroke.color == "#CCE5FF")
        }));
    }

    #[test]
    fn anchors_paint_after_arrow_line_and_encode_attachment() {
        let mut store = DiagramStore::new(Surface::default());
        let block = store.add_block(ClassInfo::named("Foo"));
        let arrow = store.add_arrow();
        store.set_anchor_attachment(arrow, AnchorEnd::Start, Some(block));

        let mut scene = Scene::new();
        paint_scene(&mut scene, &store, SelectionView::default(), &Theme::light());

        let line_at = scene
            .ops()
            .iter()
            .position(|op| matches!(op, PaintOp::Line { .. }))
            .unwrap();
        let circles: Vec<(usize, &str)> = scene
            .ops()
            .iter()
            .enumerate()
            .filter_map(|(i, op)| match op {
                PaintOp::Circle { fill, .. } => Some((i, fill.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), 2);
        assert!(circles.iter().all(|(i, _)| *i > line_at));
        assert_eq!(circles[0].1, "red");
        assert_eq!(circles[1].1, "blue");
    }

    #[test]
    fn arrowhead_triangle_spreads_behind_the_tip() {
        let path = arrowhead(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let els: Vec<kurbo::PathEl> = path.elements().to_vec();
        assert_eq!(els.len(), 4); // move, two lines, close
        match (els[1], els[2]) {
            (kurbo::PathEl::LineTo(p1), kurbo::PathEl::LineTo(p2)) => {
                // ±30° of a length-10 head behind (100, 0)
                assert!((p1.x - (100.0 - 10.0 * ARROWHEAD_SPREAD.cos())).abs() < 1e-6);
                assert!((p1.y - 10.0 * ARROWHEAD_SPREAD.sin()).abs() < 1e-6);
                assert!((p2.y + 10.0 * ARROWHEAD_SPREAD.sin()).abs() < 1e-6);
            }
            other => panic!("unexpected arrowhead elements: {other:?}"),
        }
    }

    #[test]
    fn method_lines_include_parameters() {
        let attr = Attribute {
            name: "find".into(),
            ty: "Promise<User>".into(),
            access_modifiers: ["private".to_string(), "readonly".to_string()]
                .into_iter()
                .collect(),
            parameters: Some(vec!["string".into(), "number".into()]),
        };
        assert_eq!(format_method(&attr), "-* find(string, number): Promise<User>");

        let prop = Attribute::property("count", "number").with_modifier("protected");
        assert_eq!(format_property(&prop), "# count: number");
    }
}
