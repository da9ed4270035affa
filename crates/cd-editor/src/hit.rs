//! Hit testing: pointer position → interaction target.
//!
//! Priority is fixed to resolve overlapping targets: anchors beat resize
//! handles, handles beat block bodies, block bodies beat arrow bodies
//! (arrows draw beneath blocks). Within one class of target the most
//! recently added entity wins — iteration runs in reverse store order,
//! consistent with draw order.

use cd_core::{
    ANCHOR_RADIUS, AnchorEnd, ArrowId, BlockId, CORNER_SIZE, DiagramStore, MIN_BLOCK_EXTENT,
    Point, Rect, segment_distance,
};

/// Pointer distance within which an arrow body counts as hit.
pub const ARROW_BODY_TOLERANCE: f32 = 5.0;

/// One of the four corner resize handles of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeCorner {
    /// Hit-test and draw order.
    pub const ALL: [ResizeCorner; 4] = [
        ResizeCorner::TopLeft,
        ResizeCorner::TopRight,
        ResizeCorner::BottomLeft,
        ResizeCorner::BottomRight,
    ];

    /// Position of this corner on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let [tl, tr, bl, br] = rect.corners();
        match self {
            ResizeCorner::TopLeft => tl,
            ResizeCorner::TopRight => tr,
            ResizeCorner::BottomLeft => bl,
            ResizeCorner::BottomRight => br,
        }
    }

    /// The diagonally opposite corner — the one a resize keeps fixed.
    pub fn opposite(self) -> ResizeCorner {
        match self {
            ResizeCorner::TopLeft => ResizeCorner::BottomRight,
            ResizeCorner::TopRight => ResizeCorner::BottomLeft,
            ResizeCorner::BottomLeft => ResizeCorner::TopRight,
            ResizeCorner::BottomRight => ResizeCorner::TopLeft,
        }
    }

    /// Corner-anchored resize: the dragged corner follows the pointer while
    /// the opposite corner keeps its absolute position. Width and height
    /// clamp to `MIN_BLOCK_EXTENT` on the dragged side, so the anchored
    /// corner stays fixed even through a degenerate crossing.
    pub fn resize(self, rect: Rect, pointer: Point) -> Rect {
        let right = rect.right();
        let bottom = rect.bottom();
        match self {
            ResizeCorner::TopLeft => {
                let w = (right - pointer.x).max(MIN_BLOCK_EXTENT);
                let h = (bottom - pointer.y).max(MIN_BLOCK_EXTENT);
                Rect::new(right - w, bottom - h, w, h)
            }
            ResizeCorner::TopRight => {
                let w = (pointer.x - rect.x).max(MIN_BLOCK_EXTENT);
                let h = (bottom - pointer.y).max(MIN_BLOCK_EXTENT);
                Rect::new(rect.x, bottom - h, w, h)
            }
            ResizeCorner::BottomLeft => {
                let w = (right - pointer.x).max(MIN_BLOCK_EXTENT);
                let h = (pointer.y - rect.y).max(MIN_BLOCK_EXTENT);
                Rect::new(right - w, rect.y, w, h)
            }
            ResizeCorner::BottomRight => Rect::new(
                rect.x,
                rect.y,
                (pointer.x - rect.x).max(MIN_BLOCK_EXTENT),
                (pointer.y - rect.y).max(MIN_BLOCK_EXTENT),
            ),
        }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    Anchor { arrow: ArrowId, end: AnchorEnd },
    ResizeHandle { block: BlockId, corner: ResizeCorner },
    BlockBody { block: BlockId },
    ArrowBody { arrow: ArrowId },
}

/// Find the interaction target at `p`, or `None` for empty surface.
pub fn hit_test(store: &DiagramStore, p: Point) -> Option<HitTarget> {
    // Anchors first: drawn on top, and small targets near block edges
    // would otherwise be unreachable.
    for arrow in store.arrows().iter().rev() {
        for end in AnchorEnd::BOTH {
            if arrow.anchor(end).position().distance(p) <= ANCHOR_RADIUS {
                return Some(HitTarget::Anchor {
                    arrow: arrow.id,
                    end,
                });
            }
        }
    }

    // Corner handles: a square test, corner ± half the handle size.
    let half = CORNER_SIZE / 2.0;
    for block in store.blocks().iter().rev() {
        for corner in ResizeCorner::ALL {
            let c = corner.position(block.rect());
            if (p.x - c.x).abs() <= half && (p.y - c.y).abs() <= half {
                return Some(HitTarget::ResizeHandle {
                    block: block.id,
                    corner,
                });
            }
        }
    }

    if let Some(block) = block_at(store, p) {
        return Some(HitTarget::BlockBody { block });
    }

    for arrow in store.arrows().iter().rev() {
        let (a, b) = arrow.endpoints();
        if segment_distance(p, a, b) <= ARROW_BODY_TOLERANCE {
            return Some(HitTarget::ArrowBody { arrow: arrow.id });
        }
    }

    None
}

/// The topmost block whose body contains `p`. Also used for anchor
/// re-attachment on release.
pub fn block_at(store: &DiagramStore, p: Point) -> Option<BlockId> {
    store
        .blocks()
        .iter()
        .rev()
        .find(|b| b.rect().contains(p))
        .map(|b| b.id)
}
