//! The diagram store — sole owner and mutator of blocks and arrows.
//!
//! Every other component reads entities through `blocks()` / `arrows()` and
//! mutates them only through the methods here. The store never triggers
//! redraws; the surface adapter re-renders after calling into it.

use crate::geom::{Point, Rect};
use crate::id::{ArrowId, BlockId};
use crate::model::*;
use rand::Rng;

/// The drawing surface dimensions, in surface-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Ordered collections of diagram entities. Insertion order is draw order,
/// which hit-testing relies on (later entities occlude earlier ones).
#[derive(Debug, Default)]
pub struct DiagramStore {
    blocks: Vec<Block>,
    arrows: Vec<Arrow>,
    surface: Surface,
}

impl DiagramStore {
    pub fn new(surface: Surface) -> Self {
        Self {
            blocks: Vec::new(),
            arrows: Vec::new(),
            surface,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Update the surface dimensions (host canvas resized). Existing
    /// entities keep their coordinates; only future placements change.
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn arrow(&self, id: ArrowId) -> Option<&Arrow> {
        self.arrows.iter().find(|a| a.id == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    fn arrow_mut(&mut self, id: ArrowId) -> Option<&mut Arrow> {
        self.arrows.iter_mut().find(|a| a.id == id)
    }

    // ─── Entity lifecycle ────────────────────────────────────────────────

    /// Add a block at a pseudo-random position chosen so the full default
    /// rectangle fits within the surface bounds.
    pub fn add_block(&mut self, class_info: ClassInfo) -> BlockId {
        let id = BlockId::next();
        let mut rng = rand::rng();
        let max_x = (self.surface.width - DEFAULT_BLOCK_SIZE).max(0.0);
        let max_y = (self.surface.height - DEFAULT_BLOCK_SIZE).max(0.0);
        let x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        let y = if max_y > 0.0 {
            rng.random_range(0.0..=max_y)
        } else {
            0.0
        };
        log::debug!("add {id} ({}) at ({x:.0}, {y:.0})", class_info.name);
        self.blocks.push(Block::new(id, x, y, class_info));
        id
    }

    /// Add a default arrow: a horizontal span just left of the surface
    /// center, pointing right.
    pub fn add_arrow(&mut self) -> ArrowId {
        let id = ArrowId::next();
        let start = Point::new(
            self.surface.width / 2.0 - 20.0,
            self.surface.height / 2.0,
        );
        log::debug!("add {id} at ({:.0}, {:.0})", start.x, start.y);
        self.arrows.push(Arrow {
            id,
            start: Anchor::free(start.x, start.y),
            end: Anchor::free(start.x + ARROW_SPAN, start.y),
        });
        id
    }

    /// Remove a block. Arrows referencing it are kept: their anchors are
    /// detached and hold their last position. Unknown ids are a no-op.
    pub fn remove_block(&mut self, id: BlockId) {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        if self.blocks.len() == before {
            return;
        }
        for arrow in &mut self.arrows {
            for end in AnchorEnd::BOTH {
                let anchor = arrow.anchor_mut(end);
                if anchor.attached_block == Some(id) {
                    anchor.attached_block = None;
                }
            }
        }
        log::debug!("removed {id}");
    }

    /// Remove an arrow. Unknown ids are a no-op.
    pub fn remove_arrow(&mut self, id: ArrowId) {
        self.arrows.retain(|a| a.id != id);
    }

    // ─── Geometry mutations ──────────────────────────────────────────────

    /// Replace a block's rectangle, clamping width and height to
    /// `MIN_BLOCK_EXTENT`. The caller's corner-anchored transform has
    /// already placed the origin; clamping only shortens the dragged edge.
    pub fn update_block_geometry(&mut self, id: BlockId, rect: Rect) {
        if let Some(block) = self.block_mut(id) {
            block.x = rect.x;
            block.y = rect.y;
            block.width = rect.width.max(MIN_BLOCK_EXTENT);
            block.height = rect.height.max(MIN_BLOCK_EXTENT);
        }
    }

    /// Move one arrow endpoint. Moving an anchor always detaches it —
    /// attachment is a point-in-time hit, not a live follow.
    pub fn update_anchor_position(&mut self, arrow: ArrowId, end: AnchorEnd, point: Point) {
        if let Some(a) = self.arrow_mut(arrow) {
            let anchor = a.anchor_mut(end);
            anchor.x = point.x;
            anchor.y = point.y;
            anchor.attached_block = None;
        }
    }

    /// Record which block an anchor sits on. Stale block ids are dropped
    /// rather than stored.
    pub fn set_anchor_attachment(
        &mut self,
        arrow: ArrowId,
        end: AnchorEnd,
        block: Option<BlockId>,
    ) {
        let block = block.filter(|id| self.block(*id).is_some());
        if let Some(a) = self.arrow_mut(arrow) {
            a.anchor_mut(end).attached_block = block;
        }
    }

    // ─── Class payload mutations ─────────────────────────────────────────

    /// Replace the field at `index`. A stale index is a logged no-op —
    /// indices can go stale between a host panel render and its callback.
    pub fn set_block_field(
        &mut self,
        id: BlockId,
        kind: FieldKind,
        index: usize,
        attr: Attribute,
    ) -> bool {
        let Some(block) = self.block_mut(id) else {
            return false;
        };
        let fields = block.fields_mut(kind);
        match fields.get_mut(index) {
            Some(slot) => {
                *slot = attr;
                true
            }
            None => {
                log::debug!("stale field index {index} for {id} ({kind:?})");
                false
            }
        }
    }

    /// Append a field to a block's property or method list.
    pub fn push_block_field(&mut self, id: BlockId, kind: FieldKind, attr: Attribute) {
        if let Some(block) = self.block_mut(id) {
            block.fields_mut(kind).push(attr);
        }
    }

    /// Remove the field at `index`. A stale index is a logged no-op.
    pub fn remove_block_field(&mut self, id: BlockId, kind: FieldKind, index: usize) -> bool {
        let Some(block) = self.block_mut(id) else {
            return false;
        };
        let fields = block.fields_mut(kind);
        if index < fields.len() {
            fields.remove(index);
            true
        } else {
            log::debug!("stale field index {index} for {id} ({kind:?})");
            false
        }
    }

    /// Rename a block's class.
    pub fn rename_block(&mut self, id: BlockId, name: impl Into<String>) {
        if let Some(block) = self.block_mut(id) {
            block.class_info.name = name.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> DiagramStore {
        DiagramStore::new(Surface {
            width: 1120.0,
            height: 620.0,
        })
    }

    #[test]
    fn add_block_stays_within_surface() {
        let mut store = store();
        for _ in 0..32 {
            let id = store.add_block(ClassInfo::named("Foo"));
            let block = store.block(id).unwrap();
            assert!(block.x >= 0.0 && block.rect().right() <= 1120.0);
            assert!(block.y >= 0.0 && block.rect().bottom() <= 620.0);
            assert_eq!(block.width, DEFAULT_BLOCK_SIZE);
            assert_eq!(block.height, DEFAULT_BLOCK_SIZE);
        }
    }

    #[test]
    fn add_block_on_tiny_surface_pins_to_origin() {
        let mut store = DiagramStore::new(Surface {
            width: 100.0,
            height: 100.0,
        });
        let id = store.add_block(ClassInfo::named("Big"));
        let block = store.block(id).unwrap();
        assert_eq!((block.x, block.y), (0.0, 0.0));
    }

    #[test]
    fn default_arrow_spans_right_of_center() {
        let mut store = store();
        let id = store.add_arrow();
        let arrow = store.arrow(id).unwrap();
        assert_eq!(arrow.start.position(), Point::new(540.0, 310.0));
        assert_eq!(arrow.end.position(), Point::new(620.0, 310.0));
    }

    #[test]
    fn removing_block_detaches_anchors_but_keeps_arrow() {
        let mut store = store();
        let block = store.add_block(ClassInfo::named("Foo"));
        let arrow = store.add_arrow();
        store.set_anchor_attachment(arrow, AnchorEnd::Start, Some(block));
        let pos = store.arrow(arrow).unwrap().start.position();

        store.remove_block(block);
        let anchor = store.arrow(arrow).unwrap().start;
        assert_eq!(anchor.attached_block, None);
        assert_eq!(anchor.position(), pos);
        assert_eq!(store.arrows().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = store();
        let block = store.add_block(ClassInfo::named("Foo"));
        store.remove_block(block);
        store.remove_block(block);
        assert!(store.blocks().is_empty());

        let arrow = store.add_arrow();
        store.remove_arrow(arrow);
        store.remove_arrow(arrow);
        assert!(store.arrows().is_empty());
    }

    #[test]
    fn geometry_update_clamps_to_min_extent() {
        let mut store = store();
        let id = store.add_block(ClassInfo::named("Foo"));
        store.update_block_geometry(id, Rect::new(100.0, 100.0, 100.0, -20.0));
        let block = store.block(id).unwrap();
        assert_eq!(block.width, 100.0);
        assert_eq!(block.height, MIN_BLOCK_EXTENT);
        assert_eq!((block.x, block.y), (100.0, 100.0));
    }

    #[test]
    fn moving_anchor_detaches_it() {
        let mut store = store();
        let block = store.add_block(ClassInfo::named("Foo"));
        let arrow = store.add_arrow();
        store.set_anchor_attachment(arrow, AnchorEnd::End, Some(block));
        assert!(store.arrow(arrow).unwrap().end.is_attached());

        store.update_anchor_position(arrow, AnchorEnd::End, Point::new(5.0, 6.0));
        let anchor = store.arrow(arrow).unwrap().end;
        assert_eq!(anchor.attached_block, None);
        assert_eq!(anchor.position(), Point::new(5.0, 6.0));
    }

    #[test]
    fn attachment_ignores_stale_block_ids() {
        let mut store = store();
        let block = store.add_block(ClassInfo::named("Foo"));
        let arrow = store.add_arrow();
        store.remove_block(block);
        store.set_anchor_attachment(arrow, AnchorEnd::Start, Some(block));
        assert_eq!(store.arrow(arrow).unwrap().start.attached_block, None);
    }

    #[test]
    fn field_edits_through_store() {
        let mut store = store();
        let id = store.add_block(ClassInfo::named("Foo"));
        store.push_block_field(
            id,
            FieldKind::Property,
            Attribute::property("bar", "number").with_modifier("public"),
        );
        store.push_block_field(id, FieldKind::Method, Attribute::method("run", "void"));

        assert!(store.set_block_field(
            id,
            FieldKind::Property,
            0,
            Attribute::property("baz", "string"),
        ));
        assert_eq!(store.block(id).unwrap().fields(FieldKind::Property)[0].name, "baz");

        // Stale indices are a no-op, never a panic.
        assert!(!store.set_block_field(id, FieldKind::Property, 5, Attribute::property("x", "y")));
        assert!(!store.remove_block_field(id, FieldKind::Method, 3));

        assert!(store.remove_block_field(id, FieldKind::Method, 0));
        assert!(store.block(id).unwrap().fields(FieldKind::Method).is_empty());
    }

    #[test]
    fn rename_block_updates_payload() {
        let mut store = store();
        let id = store.add_block(ClassInfo::named("Foo"));
        store.rename_block(id, "Bar");
        assert_eq!(store.block(id).unwrap().class_info.name, "Bar");
    }
}
