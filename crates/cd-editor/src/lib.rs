pub mod controller;
pub mod hit;
pub mod input;
pub mod shortcuts;

pub use controller::{Controller, Mode, Selection};
pub use hit::{ARROW_BODY_TOLERANCE, HitTarget, ResizeCorner, block_at, hit_test};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
