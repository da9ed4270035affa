//! Opaque entity handles.
//!
//! Blocks and arrows are referenced by id everywhere outside the store —
//! anchors carry a weak back-reference to their block, the controller's
//! selection state survives store reordering, and ids cross the wasm
//! boundary as strings. Ids come from one process-wide atomic counter so
//! they stay unique even if a host embeds several engines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_raw() -> u64 {
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Handle for a class block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(u64);

/// Handle for an arrow.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrowId(u64);

impl BlockId {
    pub(crate) fn next() -> Self {
        Self(next_raw())
    }
}

impl ArrowId {
    pub(crate) fn next() -> Self {
        Self(next_raw())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block_{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block_{}", self.0)
    }
}

impl fmt::Debug for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arrow_{}", self.0)
    }
}

impl fmt::Display for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arrow_{}", self.0)
    }
}

/// Parse error for the string form of an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed entity id")
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for BlockId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("block_")
            .and_then(|n| n.parse().ok())
            .map(BlockId)
            .ok_or(ParseIdError)
    }
}

impl FromStr for ArrowId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("arrow_")
            .and_then(|n| n.parse().ok())
            .map(ArrowId)
            .ok_or(ParseIdError)
    }
}
