//! Entity model for class-diagram documents.
//!
//! Three entity kinds: `Block` (a rectangle carrying a structural class
//! payload), `Arrow` (a directed segment), and `Anchor` (one end of an
//! arrow, optionally referencing a block). Anchors are exclusively owned by
//! their arrow; block references are weak — stored by id, validated lazily
//! on read, and detached (never cascaded) when the block goes away.

use crate::geom::{Point, Rect};
use crate::id::{ArrowId, BlockId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default edge length of a freshly placed block.
pub const DEFAULT_BLOCK_SIZE: f32 = 150.0;

/// Smallest width/height a resize can leave behind.
pub const MIN_BLOCK_EXTENT: f32 = 16.0;

/// Edge length of a corner resize handle; the hit box is the same square.
pub const CORNER_SIZE: f32 = 8.0;

/// Draw and hit radius of an arrow anchor.
pub const ANCHOR_RADIUS: f32 = 6.0;

/// Horizontal span of a freshly created arrow.
pub const ARROW_SPAN: f32 = 80.0;

/// Length of the arrowhead triangle sides.
pub const ARROWHEAD_LEN: f32 = 10.0;

// ─── Class payload ───────────────────────────────────────────────────────

/// A property or method of a class.
///
/// `ty` is the declared type for properties and the return type for
/// methods. All names and types are opaque strings — the editor imposes no
/// validation on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Declaration modifiers in source order, e.g. `["private", "readonly"]`.
    pub access_modifiers: SmallVec<[String; 2]>,
    /// Parameter type names. Present only for methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl Attribute {
    pub fn property(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            access_modifiers: SmallVec::new(),
            parameters: None,
        }
    }

    pub fn method(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            access_modifiers: SmallVec::new(),
            parameters: Some(Vec::new()),
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.access_modifiers.push(modifier.into());
        self
    }

    /// The leading visibility modifier, if any (`public`, `private`, ...).
    pub fn visibility(&self) -> Option<&str> {
        self.access_modifiers.first().map(String::as_str)
    }

    pub fn is_readonly(&self) -> bool {
        self.access_modifiers.iter().any(|m| m == "readonly")
    }
}

/// Structural description of one class: the payload of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub properties: Vec<Attribute>,
    pub methods: Vec<Attribute>,
}

impl ClassInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Which attribute list of a block a field edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Property,
    Method,
}

// ─── Entities ────────────────────────────────────────────────────────────

/// A rectangular diagram node representing one structural class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub class_info: ClassInfo,
}

impl Block {
    pub(crate) fn new(id: BlockId, x: f32, y: f32, class_info: ClassInfo) -> Self {
        Self {
            id,
            x,
            y,
            width: DEFAULT_BLOCK_SIZE,
            height: DEFAULT_BLOCK_SIZE,
            class_info,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn fields(&self, kind: FieldKind) -> &[Attribute] {
        match kind {
            FieldKind::Property => &self.class_info.properties,
            FieldKind::Method => &self.class_info.methods,
        }
    }

    pub(crate) fn fields_mut(&mut self, kind: FieldKind) -> &mut Vec<Attribute> {
        match kind {
            FieldKind::Property => &mut self.class_info.properties,
            FieldKind::Method => &mut self.class_info.methods,
        }
    }
}

/// Which end of an arrow an anchor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorEnd {
    Start,
    End,
}

impl AnchorEnd {
    pub const BOTH: [AnchorEnd; 2] = [AnchorEnd::Start, AnchorEnd::End];
}

/// A draggable endpoint handle of an arrow.
///
/// Anchors are free-floating: `attached_block` is metadata recording which
/// block the anchor was last dropped on, not a live positional constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
    pub attached_block: Option<BlockId>,
}

impl Anchor {
    pub fn free(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            attached_block: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_attached(&self) -> bool {
        self.attached_block.is_some()
    }
}

/// A directed connector between two anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ArrowId,
    pub start: Anchor,
    pub end: Anchor,
}

impl Arrow {
    pub fn anchor(&self, end: AnchorEnd) -> &Anchor {
        match end {
            AnchorEnd::Start => &self.start,
            AnchorEnd::End => &self.end,
        }
    }

    pub(crate) fn anchor_mut(&mut self, end: AnchorEnd) -> &mut Anchor {
        match end {
            AnchorEnd::Start => &mut self.start,
            AnchorEnd::End => &mut self.end,
        }
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.start.position(), self.end.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_modifier_queries() {
        let attr = Attribute::property("count", "number")
            .with_modifier("private")
            .with_modifier("readonly");
        assert_eq!(attr.visibility(), Some("private"));
        assert!(attr.is_readonly());
        assert!(attr.parameters.is_none());

        let plain = Attribute::method("run", "void");
        assert_eq!(plain.visibility(), None);
        assert!(!plain.is_readonly());
        assert_eq!(plain.parameters.as_deref(), Some(&[][..]));
    }

    #[test]
    fn arrow_anchor_lookup() {
        let arrow = Arrow {
            id: crate::id::ArrowId::next(),
            start: Anchor::free(1.0, 2.0),
            end: Anchor::free(3.0, 4.0),
        };
        assert_eq!(arrow.anchor(AnchorEnd::Start).position(), Point::new(1.0, 2.0));
        assert_eq!(arrow.anchor(AnchorEnd::End).position(), Point::new(3.0, 4.0));
    }
}
