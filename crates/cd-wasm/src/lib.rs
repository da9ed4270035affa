//! WASM surface adapter — exposes the diagram engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host forwards pointer
//! and keyboard events with surface-local coordinates (device-pixel scaling
//! already applied) and calls `render` again after any method that returns
//! `true`. All interaction semantics live in the crates below; this layer
//! only translates.

mod draw;

use cd_core::{Attribute, BlockId, ClassInfo, DiagramStore, FieldKind, Surface, analyze};
use cd_editor::{Controller, InputEvent, Modifiers};
use cd_render::{Scene, SelectionView, Theme, paint_scene};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main JS-facing canvas controller: owns the store, the interaction
/// controller, and a reusable scene buffer.
#[wasm_bindgen]
pub struct DiagramCanvas {
    store: DiagramStore,
    controller: Controller,
    scene: Scene,
    dark_mode: bool,
}

#[wasm_bindgen]
impl DiagramCanvas {
    /// Create a canvas controller for a surface of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            store: DiagramStore::new(Surface { width, height }),
            controller: Controller::new(),
            scene: Scene::new(),
            dark_mode: false,
        }
    }

    /// Update the surface dimensions after a host canvas resize.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.store.set_surface(Surface { width, height });
    }

    /// Switch between the light and dark theme.
    pub fn set_theme(&mut self, dark: bool) {
        self.dark_mode = dark;
    }

    /// Paint the current frame onto a Canvas2D context.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) {
        let selection = self.controller.selection();
        let view = SelectionView {
            block: selection.block(),
            arrow: selection.arrow(),
        };
        let theme = if self.dark_mode {
            Theme::dark()
        } else {
            Theme::light()
        };
        self.scene.reset();
        paint_scene(&mut self.scene, &self.store, view, &theme);
        draw::replay(ctx, &self.scene);
    }

    // ─── Pointer / keyboard events ───────────────────────────────────────

    /// Handle pointer down. Returns `true` when the host should re-render.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::from_pointer_down(x, y, modifiers(shift, ctrl, alt, meta));
        self.controller.handle(&mut self.store, &event)
    }

    /// Handle pointer move. Returns `true` when the host should re-render.
    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::from_pointer_move(x, y, modifiers(shift, ctrl, alt, meta));
        self.controller.handle(&mut self.store, &event)
    }

    /// Handle pointer up. Returns `true` when the host should re-render.
    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.controller
            .handle(&mut self.store, &InputEvent::from_pointer_up(x, y))
    }

    /// Handle a key press (`KeyboardEvent.key` naming).
    pub fn handle_key_down(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.controller
            .key_down(&mut self.store, key, modifiers(shift, ctrl, alt, meta))
    }

    // ─── UI-chrome API ───────────────────────────────────────────────────

    /// Analyze source text and add a block for its first class.
    ///
    /// Returns a JSON string: `{"id":"block_1"}` on success, or
    /// `{"error":"..."}` with the message the host shows to the user.
    pub fn add_class_source(&mut self, source: &str) -> String {
        match analyze(source) {
            Ok(info) => format!(r#"{{"id":"{}"}}"#, self.store.add_block(info)),
            Err(err) => {
                log::warn!("class extraction failed: {err}");
                format!(r#"{{"error":"{err}"}}"#)
            }
        }
    }

    /// Add a block from a `ClassInfo` JSON payload, returning its id.
    pub fn add_class_json(&mut self, json: &str) -> Option<String> {
        let info: ClassInfo = serde_json::from_str(json).ok()?;
        Some(self.store.add_block(info).to_string())
    }

    /// Add a default arrow, returning its id.
    pub fn add_arrow(&mut self) -> String {
        self.store.add_arrow().to_string()
    }

    /// Remove the selected entity, if any.
    pub fn delete_selected(&mut self) -> bool {
        self.controller.delete_selected(&mut self.store)
    }

    /// Id of the selected block, if a block is selected.
    pub fn selected_block(&self) -> Option<String> {
        self.controller.selection().block().map(|id| id.to_string())
    }

    /// JSON view of a block's class payload, for the host side panel.
    pub fn class_info_json(&self, id: &str) -> Option<String> {
        let id: BlockId = id.parse().ok()?;
        self.store
            .block(id)
            .and_then(|b| serde_json::to_string(&b.class_info).ok())
    }

    /// Rename a block's class.
    pub fn rename_block(&mut self, id: &str, name: &str) -> bool {
        let Ok(id) = id.parse::<BlockId>() else {
            return false;
        };
        self.store.rename_block(id, name);
        self.store.block(id).is_some()
    }

    /// Append a field from an `Attribute` JSON payload.
    /// `kind` is `"property"` or `"method"`.
    pub fn push_field(&mut self, id: &str, kind: &str, json: &str) -> bool {
        let (Ok(id), Some(kind), Ok(attr)) = (
            id.parse::<BlockId>(),
            parse_kind(kind),
            serde_json::from_str::<Attribute>(json),
        ) else {
            return false;
        };
        self.store.push_block_field(id, kind, attr);
        true
    }

    /// Replace the field at `index` from an `Attribute` JSON payload.
    pub fn set_field(&mut self, id: &str, kind: &str, index: usize, json: &str) -> bool {
        let (Ok(id), Some(kind), Ok(attr)) = (
            id.parse::<BlockId>(),
            parse_kind(kind),
            serde_json::from_str::<Attribute>(json),
        ) else {
            return false;
        };
        self.store.set_block_field(id, kind, index, attr)
    }

    /// Remove the field at `index`. Stale indices are a no-op.
    pub fn delete_field(&mut self, id: &str, kind: &str, index: usize) -> bool {
        let (Ok(id), Some(kind)) = (id.parse::<BlockId>(), parse_kind(kind)) else {
            return false;
        };
        self.store.remove_block_field(id, kind, index)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn parse_kind(kind: &str) -> Option<FieldKind> {
    match kind {
        "property" => Some(FieldKind::Property),
        "method" => Some(FieldKind::Method),
        _ => None,
    }
}
