//! Explicit page-break markers
//!
//! A marker is a `pb` node in the host document. The marker's `direction`
//! says on which side its spacer lives: a `before` marker starts a new page,
//! an `after` marker ends the current one.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Which side of the marker the page boundary falls on
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BreakDirection {
    Before,
    After,
}

impl BreakDirection {
    /// Overlay side used when anchoring this marker's spacer
    pub fn side(self) -> Side {
        match self {
            BreakDirection::Before => Side::Before,
            BreakDirection::After => Side::After,
        }
    }
}

/// What produced the break
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BreakKind {
    #[default]
    PageBreak = 0,
    Figure = 1,
}

/// Overlay side relative to its anchor position, -1 before and +1 after
#[derive(Serialize_repr, Deserialize_repr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Side {
    Before = -1,
    After = 1,
}

impl Side {
    pub fn as_assoc(self) -> i8 {
        self as i8
    }
}

/// Attributes of a `pb` node
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    /// Stable unique marker id
    #[serde(rename = "bid")]
    pub id: String,

    #[serde(rename = "type")]
    pub direction: BreakDirection,

    #[serde(default)]
    pub kind: BreakKind,
}

impl Marker {
    pub fn new(id: impl Into<String>, direction: BreakDirection) -> Self {
        Self {
            id: id.into(),
            direction,
            kind: BreakKind::PageBreak,
        }
    }
}
