//! Host editing-surface contract
//!
//! The pagination core does not render anything itself. It reads rendered
//! geometry from the host and, during a divider pass, makes temporary
//! adjustments (spacer heights, extra page skeletons) so that markers further
//! down are measured against the layout the new spacers will produce.
//!
//! Two implementations ship with the crate: the DOM surface in
//! `api::dom` and the headless [`SimulatedSurface`].

pub mod simulated;

use crate::models::{BreakDirection, BreakKind, Document};
use crate::overlay::Overlay;

pub use simulated::{SimulatedConfig, SimulatedSurface};

/// Element rendered directly before or after a marker
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// Marker id when the neighbor is a spacer, `None` for ordinary content
    pub spacer_for: Option<String>,
    /// Offset of the neighbor's top edge
    pub top: f64,
}

impl Neighbor {
    /// Whether this neighbor is the spacer of marker `id`
    pub fn is_spacer_for(&self, id: &str) -> bool {
        self.spacer_for.as_deref() == Some(id)
    }
}

/// Current rendered geometry of one marker
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMarker {
    pub id: String,
    pub direction: BreakDirection,
    pub kind: BreakKind,
    pub top: f64,
    pub height: f64,
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
}

impl RenderedMarker {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Bottom of the marker block.
    ///
    /// When the previous sibling is this marker's own spacer, spacer and marker
    /// move together and the block is measured from the spacer's top.
    pub fn block_bottom(&self) -> f64 {
        match &self.previous {
            Some(prev) if prev.is_spacer_for(&self.id) => prev.top + self.height,
            _ => self.bottom(),
        }
    }

    /// Whether this marker's own spacer sits on the side its direction requires
    pub fn has_required_spacer(&self) -> bool {
        let neighbor = match self.direction {
            BreakDirection::Before => &self.previous,
            BreakDirection::After => &self.next,
        };
        neighbor.as_ref().map_or(false, |n| n.is_spacer_for(&self.id))
    }
}

/// Rendered state of the page skeleton container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonContainer {
    /// Number of page skeletons currently rendered
    pub page_count: usize,
    /// Bounding-box bottom of the last skeleton, same coordinate space as
    /// [`LayoutSurface::content_bottom`]
    pub last_rect_bottom: Option<f64>,
    /// Offset bottom (top + height) of the last skeleton inside the editor
    pub last_edge: Option<f64>,
}

/// Read and adjust the rendered layout of the editor
pub trait LayoutSurface {
    /// Every rendered marker, in document order
    fn markers(&self) -> Vec<RenderedMarker>;

    /// Fresh geometry for one marker
    fn marker(&self, id: &str) -> Option<RenderedMarker>;

    /// Whether a spacer tagged with this marker id is rendered
    fn has_spacer(&self, id: &str) -> bool;

    /// Page skeleton container, if it has been rendered yet
    fn skeleton_container(&self) -> Option<SkeletonContainer>;

    /// Bounding-box bottom of the last content element
    fn content_bottom(&self) -> Option<f64>;

    /// Total scroll height of the editor content
    fn content_height(&self) -> f64;

    fn set_spacer_height(&mut self, id: &str, height: f64);

    /// Insert a temporary spacer next to a marker
    fn insert_spacer(&mut self, id: &str, direction: BreakDirection, height: f64);

    /// Append `count` blank page skeletons
    fn append_skeletons(&mut self, count: usize);

    /// Remove skeletons from the end until `count` remain
    fn truncate_skeletons(&mut self, count: usize);

    /// Set the editor container's minimum height
    fn set_min_height(&mut self, height: f64);
}

/// A surface that can render overlays itself
///
/// The DOM surface leaves rendering to the host editor; headless surfaces
/// implement this so a session can run whole update cycles on its own.
pub trait OverlayRenderer {
    fn render(&mut self, document: &Document, overlays: &[Overlay]);
}
