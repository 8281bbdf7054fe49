//! Overlay display list
//!
//! Everything the host needs to draw page chrome and spacers, with all
//! heights and texts already resolved. The host turns each overlay into a
//! widget anchored at `anchor` on `side`; it performs no layout math itself.

use serde::{Deserialize, Serialize};
use crate::models::{BreakDirection, BreakKind, Mapping, Side};

/// Identity of one overlay instance; rebuilt overlays get fresh ids
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

/// One positioned overlay
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,

    /// Document position the widget is attached to
    pub anchor: usize,

    pub side: Side,

    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl Overlay {
    /// Same placement and content, identity ignored
    pub fn same_geometry(&self, other: &Overlay) -> bool {
        self.anchor == other.anchor && self.side == other.side && self.kind == other.kind
    }

    pub fn as_spacer(&self) -> Option<&SpacerOverlay> {
        match &self.kind {
            OverlayKind::Spacer(spacer) => Some(spacer),
            _ => None,
        }
    }

    pub fn as_skeletons(&self) -> Option<&SkeletonStack> {
        match &self.kind {
            OverlayKind::PageSkeletons(stack) => Some(stack),
            _ => None,
        }
    }
}

/// What an overlay draws
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayKind {
    /// One skeleton per page, stacked in a single container
    PageSkeletons(SkeletonStack),

    /// Header drawn above the first line of content
    FirstPageHeader(ChromeBand),

    /// Variable-height block pushing a marker onto a page boundary
    Spacer(SpacerOverlay),
}

/// Page skeletons for the whole document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SkeletonStack {
    pub pages: Vec<PageSkeleton>,
}

impl SkeletonStack {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Chrome for one page: the content slot, then footer, gap and next header
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSkeleton {
    pub index: usize,
    pub first_page: bool,
    /// The last skeleton hides its gap and header
    pub is_last: bool,
    /// Height of the transparent slot the page's content shows through
    pub content_offset: f64,
    pub footer: ChromeBand,
    pub gap: GapBand,
    pub header: ChromeBand,
    /// How far the breaker extends past the editor's side margins
    pub bleed_left: f64,
    pub bleed_right: f64,
}

/// Header or footer band
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChromeBand {
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub left: String,
    pub right: String,
}

/// Space between two pages
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GapBand {
    pub height: f64,
    pub border_size: f64,
    pub background: String,
}

/// Spacer attached to a marker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacerOverlay {
    pub marker_id: String,
    pub direction: BreakDirection,
    pub break_kind: BreakKind,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_background: Option<String>,
}

/// A collection of overlays, replaced wholesale on rebuild
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct OverlaySet {
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    pub fn new(overlays: Vec<Overlay>) -> Self {
        Self { overlays }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Carry every anchor through an edit; overlays inside deleted content are dropped
    pub fn map(&self, mapping: &Mapping) -> OverlaySet {
        let overlays = self
            .overlays
            .iter()
            .filter_map(|overlay| {
                let result = mapping.map(overlay.anchor, overlay.side.as_assoc());
                if result.deleted {
                    return None;
                }
                Some(Overlay {
                    anchor: result.pos,
                    ..overlay.clone()
                })
            })
            .collect();
        OverlaySet { overlays }
    }

    /// Pairwise geometry equality, identities ignored
    pub fn same_geometry(&self, other: &OverlaySet) -> bool {
        self.overlays.len() == other.overlays.len()
            && self
                .overlays
                .iter()
                .zip(other.overlays.iter())
                .all(|(a, b)| a.same_geometry(b))
    }

    /// Spacers in anchor order
    pub fn spacers(&self) -> impl Iterator<Item = &SpacerOverlay> {
        self.overlays.iter().filter_map(Overlay::as_spacer)
    }

    /// Skeleton stack, if this set carries one
    pub fn skeletons(&self) -> Option<&SkeletonStack> {
        self.overlays.iter().find_map(Overlay::as_skeletons)
    }
}
