//! The interaction controller: pointer gestures → store mutations.
//!
//! Owns the transient interaction state (current gesture, selection) and is
//! the only component that translates raw input events into Diagram Store
//! mutations. Every transition is a total function — any pointer coordinate
//! is valid input, and pointer-up always completes the gesture, never rolls
//! it back.

use crate::hit::{HitTarget, ResizeCorner, block_at, hit_test};
use crate::input::{InputEvent, Modifiers};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use cd_core::{AnchorEnd, ArrowId, BlockId, DiagramStore, Point};

/// The current pointer gesture.
///
/// A closed enum: the three drag kinds are mutually exclusive by
/// construction, and `Idle` carries no stale handle or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Moving a block; `offset` is pointer − block origin at press time.
    DraggingBlock { block: BlockId, offset: (f32, f32) },
    /// Resizing a block by one corner handle.
    ResizingBlock { block: BlockId, corner: ResizeCorner },
    /// Moving one arrow endpoint.
    DraggingAnchor { arrow: ArrowId, end: AnchorEnd },
}

/// The selected entity. Gesture-scoped: pointer-up clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Block(BlockId),
    Arrow(ArrowId),
}

impl Selection {
    pub fn block(self) -> Option<BlockId> {
        match self {
            Selection::Block(id) => Some(id),
            _ => None,
        }
    }

    pub fn arrow(self) -> Option<ArrowId> {
        match self {
            Selection::Arrow(id) => Some(id),
            _ => None,
        }
    }
}

/// Pointer/keyboard state machine over a `DiagramStore`.
#[derive(Debug, Default)]
pub struct Controller {
    mode: Mode,
    selection: Selection,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Feed one input event. Returns `true` when the model or the selection
    /// changed and the host should re-render.
    pub fn handle(&mut self, store: &mut DiagramStore, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(store, Point::new(*x, *y)),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(store, Point::new(*x, *y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(store, Point::new(*x, *y)),
            InputEvent::Key { key, modifiers } => self.key_down(store, key, *modifiers),
        }
    }

    /// Hit-test the press position and enter the matching gesture.
    pub fn pointer_down(&mut self, store: &mut DiagramStore, p: Point) -> bool {
        let previous = self.selection;
        match hit_test(store, p) {
            Some(HitTarget::Anchor { arrow, end }) => {
                log::debug!("drag anchor {arrow}/{end:?}");
                self.mode = Mode::DraggingAnchor { arrow, end };
                self.selection = Selection::None;
            }
            Some(HitTarget::ResizeHandle { block, corner }) => {
                log::debug!("resize {block} by {corner:?}");
                self.mode = Mode::ResizingBlock { block, corner };
                self.selection = Selection::Block(block);
            }
            Some(HitTarget::BlockBody { block }) => {
                let origin = store
                    .block(block)
                    .map(|b| b.rect().origin())
                    .unwrap_or_default();
                log::debug!("drag {block}");
                self.mode = Mode::DraggingBlock {
                    block,
                    offset: (p.x - origin.x, p.y - origin.y),
                };
                self.selection = Selection::Block(block);
            }
            Some(HitTarget::ArrowBody { arrow }) => {
                // Body clicks select the arrow as a unit; there is no body
                // drag gesture.
                self.mode = Mode::Idle;
                self.selection = Selection::Arrow(arrow);
            }
            None => {
                self.mode = Mode::Idle;
                self.selection = Selection::None;
            }
        }
        self.mode != Mode::Idle || self.selection != previous
    }

    /// Advance the active gesture to the new pointer position.
    pub fn pointer_move(&mut self, store: &mut DiagramStore, p: Point) -> bool {
        match self.mode {
            Mode::Idle => false,
            Mode::DraggingBlock { block, offset } => {
                let Some(b) = store.block(block) else {
                    return false;
                };
                let mut rect = b.rect();
                // No surface clamping: off-surface positions are accepted.
                rect.x = p.x - offset.0;
                rect.y = p.y - offset.1;
                store.update_block_geometry(block, rect);
                true
            }
            Mode::ResizingBlock { block, corner } => {
                let Some(b) = store.block(block) else {
                    return false;
                };
                let rect = corner.resize(b.rect(), p);
                store.update_block_geometry(block, rect);
                true
            }
            Mode::DraggingAnchor { arrow, end } => {
                store.update_anchor_position(arrow, end, p);
                true
            }
        }
    }

    /// Complete the gesture unconditionally: re-attach a dragged anchor to
    /// whatever block sits under the release point, then reset to `Idle`
    /// and clear the selection — even when released off-target.
    pub fn pointer_up(&mut self, store: &mut DiagramStore, p: Point) -> bool {
        if let Mode::DraggingAnchor { arrow, end } = self.mode {
            let target = block_at(store, p);
            store.set_anchor_attachment(arrow, end, target);
            log::debug!("anchor {arrow}/{end:?} released on {target:?}");
        }
        let changed = self.mode != Mode::Idle || self.selection != Selection::None;
        self.mode = Mode::Idle;
        self.selection = Selection::None;
        changed
    }

    /// Handle a key press through the shortcut map.
    pub fn key_down(&mut self, store: &mut DiagramStore, key: &str, modifiers: Modifiers) -> bool {
        match ShortcutMap::resolve(key, modifiers) {
            Some(ShortcutAction::DeleteSelection) => self.delete_selected(store),
            Some(ShortcutAction::Deselect) => {
                let changed = self.mode != Mode::Idle || self.selection != Selection::None;
                self.mode = Mode::Idle;
                self.selection = Selection::None;
                changed
            }
            None => false,
        }
    }

    /// Remove the selected entity from the store and clear the selection.
    /// Also the entry point for host UI delete buttons. No-op when nothing
    /// is selected.
    pub fn delete_selected(&mut self, store: &mut DiagramStore) -> bool {
        let removed = match self.selection {
            Selection::Block(id) => {
                store.remove_block(id);
                true
            }
            Selection::Arrow(id) => {
                store.remove_arrow(id);
                true
            }
            Selection::None => false,
        };
        if removed {
            self.mode = Mode::Idle;
            self.selection = Selection::None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cd_core::{ClassInfo, Rect, Surface};
    use pretty_assertions::assert_eq;

    fn store_with_block(rect: Rect) -> (DiagramStore, BlockId) {
        let mut store = DiagramStore::new(Surface::default());
        let id = store.add_block(ClassInfo::named("Foo"));
        store.update_block_geometry(id, rect);
        (store, id)
    }

    #[test]
    fn press_on_body_enters_drag_and_selects() {
        let (mut store, block) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        assert!(ctl.pointer_down(&mut store, Point::new(110.0, 110.0)));
        assert_eq!(
            ctl.mode(),
            Mode::DraggingBlock {
                block,
                offset: (10.0, 10.0)
            }
        );
        assert_eq!(ctl.selection(), Selection::Block(block));
    }

    #[test]
    fn press_on_empty_surface_clears_selection() {
        let (mut store, _) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        ctl.pointer_down(&mut store, Point::new(110.0, 110.0));
        ctl.pointer_down(&mut store, Point::new(500.0, 500.0));
        assert_eq!(ctl.mode(), Mode::Idle);
        assert_eq!(ctl.selection(), Selection::None);
    }

    #[test]
    fn pointer_up_always_returns_to_idle() {
        let (mut store, block) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let arrow = store.add_arrow();
        let anchor = store.arrow(arrow).unwrap().start.position();
        let mut ctl = Controller::new();

        // From each gesture, released far off any target.
        let presses = [
            Point::new(110.0, 110.0), // body
            Point::new(100.0, 100.0), // corner handle
            anchor,                   // anchor
        ];
        for press in presses {
            // Re-pin the geometry the previous iteration dragged around.
            store.update_block_geometry(block, Rect::new(100.0, 100.0, 50.0, 50.0));
            store.update_anchor_position(arrow, AnchorEnd::Start, anchor);
            ctl.pointer_down(&mut store, press);
            ctl.pointer_move(&mut store, Point::new(-400.0, 900.0));
            ctl.pointer_up(&mut store, Point::new(-400.0, 900.0));
            assert!(ctl.is_idle());
            assert_eq!(ctl.selection(), Selection::None);
        }

        // And from Idle it stays Idle.
        assert!(!ctl.pointer_up(&mut store, Point::new(0.0, 0.0)));
    }

    #[test]
    fn move_without_gesture_is_a_no_op() {
        let (mut store, block) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        assert!(!ctl.pointer_move(&mut store, Point::new(300.0, 300.0)));
        assert_eq!(store.block(block).unwrap().rect(), Rect::new(100.0, 100.0, 50.0, 50.0));
    }

    #[test]
    fn arrow_body_click_selects_arrow_for_deletion() {
        let mut store = DiagramStore::new(Surface {
            width: 1120.0,
            height: 620.0,
        });
        let arrow = store.add_arrow();
        let mut ctl = Controller::new();

        ctl.pointer_down(&mut store, Point::new(580.0, 310.0));
        assert_eq!(ctl.selection(), Selection::Arrow(arrow));
        assert_eq!(ctl.mode(), Mode::Idle);

        assert!(ctl.key_down(&mut store, "Delete", Modifiers::NONE));
        assert!(store.arrows().is_empty());
        assert_eq!(ctl.selection(), Selection::None);
    }

    #[test]
    fn delete_key_removes_selected_block_mid_gesture() {
        let (mut store, block) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        ctl.pointer_down(&mut store, Point::new(110.0, 110.0));
        assert!(ctl.key_down(&mut store, "Delete", Modifiers::NONE));
        assert!(store.block(block).is_none());
        assert!(ctl.is_idle());

        // Nothing selected anymore: a second Delete is a no-op.
        assert!(!ctl.key_down(&mut store, "Delete", Modifiers::NONE));
    }

    #[test]
    fn escape_abandons_the_gesture() {
        let (mut store, _) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        ctl.pointer_down(&mut store, Point::new(110.0, 110.0));
        assert!(ctl.key_down(&mut store, "Escape", Modifiers::NONE));
        assert!(ctl.is_idle());
        assert_eq!(ctl.selection(), Selection::None);
    }

    #[test]
    fn dragging_a_deleted_block_is_total() {
        let (mut store, block) = store_with_block(Rect::new(100.0, 100.0, 50.0, 50.0));
        let mut ctl = Controller::new();

        ctl.pointer_down(&mut store, Point::new(110.0, 110.0));
        store.remove_block(block);
        assert!(!ctl.pointer_move(&mut store, Point::new(200.0, 200.0)));
        ctl.pointer_up(&mut store, Point::new(200.0, 200.0));
        assert!(ctl.is_idle());
    }
}
