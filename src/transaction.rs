//! Transactions seen by the pagination core
//!
//! A transaction is either a content edit, a selection change, or a recompute
//! request issued by pagination itself. Only content edits carry a document,
//! so a recompute request can never look like a content change and the
//! measure → recompute cycle cannot feed itself.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};
use crate::models::{Document, Mapping};

/// Which overlay collections to rebuild
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct RecomputeFlags(u8);

impl RecomputeFlags {
    pub const NONE: RecomputeFlags = RecomputeFlags(0);
    /// Rebuild marker spacers
    pub const DIVIDERS: RecomputeFlags = RecomputeFlags(1);
    /// Rebuild page skeletons
    pub const PAGE_COUNT: RecomputeFlags = RecomputeFlags(2);
    pub const ALL: RecomputeFlags = RecomputeFlags(3);

    pub fn from_bits(bits: u8) -> Self {
        RecomputeFlags(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: RecomputeFlags) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for RecomputeFlags {
    type Output = RecomputeFlags;

    fn bitor(self, rhs: RecomputeFlags) -> RecomputeFlags {
        RecomputeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for RecomputeFlags {
    fn bitor_assign(&mut self, rhs: RecomputeFlags) {
        self.0 |= rhs.0;
    }
}

/// Content-neutral request to rebuild overlays
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeRequest {
    pub flags: RecomputeFlags,
    /// Page count measured when the request was issued
    pub page_count: usize,
}

/// A content edit: the document after the edit and how positions moved
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContentEdit {
    pub document: Document,
    #[serde(default)]
    pub mapping: Mapping,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Transaction {
    Content(ContentEdit),
    Selection,
    Recompute(RecomputeRequest),
}

impl Transaction {
    pub fn content(document: Document, mapping: Mapping) -> Self {
        Transaction::Content(ContentEdit { document, mapping })
    }

    /// Whether applying this transaction can change the document
    pub fn changes_content(&self) -> bool {
        matches!(self, Transaction::Content(_))
    }
}
