//! Position mapping across an edit
//!
//! Each content edit comes with the list of ranges it replaced. Overlay
//! anchors from before the edit are carried through those replacements so the
//! overlays stay attached to the same content without being recomputed.

use serde::{Deserialize, Serialize};

/// One replaced range: `old_size` positions at `start` became `new_size` positions
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStep {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl ReplaceStep {
    pub fn insert(at: usize, size: usize) -> Self {
        Self { start: at, old_size: 0, new_size: size }
    }

    pub fn delete(start: usize, size: usize) -> Self {
        Self { start, old_size: size, new_size: 0 }
    }

    pub fn replace(start: usize, old_size: usize, new_size: usize) -> Self {
        Self { start, old_size, new_size }
    }

    fn map(&self, pos: usize, assoc: i8) -> MapResult {
        let end = self.start + self.old_size;
        if pos < self.start {
            return MapResult { pos, deleted: false };
        }
        if pos > end {
            return MapResult { pos: pos - self.old_size + self.new_size, deleted: false };
        }

        // Inside or on the edge of the replaced range
        let side = if self.old_size == 0 {
            assoc
        } else if pos == self.start {
            -1
        } else if pos == end {
            1
        } else {
            assoc
        };
        let mapped = if side < 0 { self.start } else { self.start + self.new_size };
        MapResult {
            pos: mapped,
            deleted: pos > self.start && pos < end,
        }
    }
}

/// Where a position ended up, and whether the content around it was removed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapResult {
    pub pos: usize,
    pub deleted: bool,
}

/// Ordered list of replace steps making up one edit
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Mapping {
    #[serde(default)]
    pub steps: Vec<ReplaceStep>,
}

impl Mapping {
    pub fn new(steps: Vec<ReplaceStep>) -> Self {
        Self { steps }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Map a position; `assoc` < 0 sticks to content on the left, > 0 to the right
    pub fn map(&self, pos: usize, assoc: i8) -> MapResult {
        let mut result = MapResult { pos, deleted: false };
        for step in &self.steps {
            let next = step.map(result.pos, assoc);
            result = MapResult {
                pos: next.pos,
                deleted: result.deleted || next.deleted,
            };
        }
        result
    }
}
