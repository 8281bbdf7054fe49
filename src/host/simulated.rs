//! Headless layout surface
//!
//! Lays blocks out in a single vertical column with fixed metrics: paragraphs
//! wrap at a fixed character count, markers and opaque blocks have fixed
//! heights, spacers are as tall as they say. Page skeletons float behind the
//! column and do not displace content. This is enough to drive whole
//! pagination cycles without a browser.

use crate::layout::skeleton::stack_bottom;
use crate::models::{BlockNode, BreakDirection, BreakKind, Document, PaginationConfig};
use crate::overlay::{Overlay, OverlayKind};
use super::{LayoutSurface, Neighbor, OverlayRenderer, RenderedMarker, SkeletonContainer};

/// Metrics of the simulated layout
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedConfig {
    pub line_height: f64,
    pub chars_per_line: usize,
    pub marker_height: f64,
    pub block_height: f64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            chars_per_line: 80,
            marker_height: 2.0,
            block_height: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum FlowItem {
    Content { height: f64 },
    Marker { id: String, direction: BreakDirection, kind: BreakKind, height: f64 },
    Spacer { marker_id: String, height: f64 },
}

impl FlowItem {
    fn height(&self) -> f64 {
        match self {
            FlowItem::Content { height }
            | FlowItem::Marker { height, .. }
            | FlowItem::Spacer { height, .. } => *height,
        }
    }
}

/// In-memory [`LayoutSurface`]
#[derive(Clone, Debug)]
pub struct SimulatedSurface {
    config: PaginationConfig,
    metrics: SimulatedConfig,
    flow: Vec<FlowItem>,
    skeletons: Option<usize>,
    first_header: bool,
    min_height: Option<f64>,
}

impl SimulatedSurface {
    /// Surface showing `document` with no overlays rendered yet
    pub fn new(config: PaginationConfig, metrics: SimulatedConfig, document: &Document) -> Self {
        let mut surface = Self {
            config,
            metrics,
            flow: Vec::new(),
            skeletons: None,
            first_header: false,
            min_height: None,
        };
        surface.render_overlays(document, &[]);
        surface
    }

    /// Re-render the document with the given overlays
    pub fn render_overlays(&mut self, document: &Document, overlays: &[Overlay]) {
        let mut flow = Vec::new();
        let mut skeletons = None;
        let mut first_header = false;

        let mut pending = overlays.iter().peekable();
        for (pos, node) in document.positioned() {
            let end = pos + node.node_size();
            while let Some(overlay) = pending.next_if(|o| o.anchor <= pos) {
                self.place(overlay, &mut flow, &mut skeletons, &mut first_header);
            }
            flow.push(self.block_item(node));
            while let Some(overlay) = pending.next_if(|o| o.anchor < end) {
                self.place(overlay, &mut flow, &mut skeletons, &mut first_header);
            }
        }
        for overlay in pending {
            self.place(overlay, &mut flow, &mut skeletons, &mut first_header);
        }

        self.flow = flow;
        self.skeletons = skeletons;
        self.first_header = first_header;
    }

    fn place(
        &self,
        overlay: &Overlay,
        flow: &mut Vec<FlowItem>,
        skeletons: &mut Option<usize>,
        first_header: &mut bool,
    ) {
        match &overlay.kind {
            OverlayKind::PageSkeletons(stack) => *skeletons = Some(stack.page_count()),
            OverlayKind::FirstPageHeader(_) => *first_header = true,
            OverlayKind::Spacer(spacer) => flow.push(FlowItem::Spacer {
                marker_id: spacer.marker_id.clone(),
                height: spacer.height,
            }),
        }
    }

    fn block_item(&self, node: &BlockNode) -> FlowItem {
        match node {
            BlockNode::Paragraph { text } => {
                let chars = text.chars().count();
                let per_line = self.metrics.chars_per_line.max(1);
                let lines = ((chars + per_line - 1) / per_line).max(1);
                FlowItem::Content { height: lines as f64 * self.metrics.line_height }
            }
            BlockNode::PageBreak { attrs } => FlowItem::Marker {
                id: attrs.id.clone(),
                direction: attrs.direction,
                kind: attrs.kind,
                height: self.metrics.marker_height,
            },
            BlockNode::Block { .. } => FlowItem::Content { height: self.metrics.block_height },
        }
    }

    /// Top of the content column
    fn origin(&self) -> f64 {
        if self.first_header {
            self.config.header_area()
        } else {
            0.0
        }
    }

    fn tops(&self) -> Vec<f64> {
        self.flow
            .iter()
            .scan(self.origin(), |y, item| {
                let top = *y;
                *y += item.height();
                Some(top)
            })
            .collect()
    }

    fn flow_bottom(&self) -> f64 {
        self.origin() + self.flow.iter().map(FlowItem::height).sum::<f64>()
    }

    fn neighbor(&self, index: usize, tops: &[f64]) -> Neighbor {
        let spacer_for = match &self.flow[index] {
            FlowItem::Spacer { marker_id, .. } => Some(marker_id.clone()),
            _ => None,
        };
        Neighbor { spacer_for, top: tops[index] }
    }

    fn rendered_marker(&self, index: usize, tops: &[f64]) -> Option<RenderedMarker> {
        let FlowItem::Marker { id, direction, kind, height } = &self.flow[index] else {
            return None;
        };
        Some(RenderedMarker {
            id: id.clone(),
            direction: *direction,
            kind: *kind,
            top: tops[index],
            height: *height,
            previous: index.checked_sub(1).map(|i| self.neighbor(i, tops)),
            next: (index + 1 < self.flow.len()).then(|| self.neighbor(index + 1, tops)),
        })
    }

    fn marker_index(&self, id: &str) -> Option<usize> {
        self.flow.iter().position(|item| {
            matches!(item, FlowItem::Marker { id: marker_id, .. } if marker_id == id)
        })
    }

    /// Minimum height set by the last stabilization pass
    pub fn min_height(&self) -> Option<f64> {
        self.min_height
    }

    /// Height of the spacer tagged with `id`, if one is rendered
    pub fn spacer_height(&self, id: &str) -> Option<f64> {
        self.flow.iter().find_map(|item| match item {
            FlowItem::Spacer { marker_id, height } if marker_id == id => Some(*height),
            _ => None,
        })
    }

    /// Number of spacers in the flow
    pub fn spacer_count(&self) -> usize {
        self.flow.iter().filter(|item| matches!(item, FlowItem::Spacer { .. })).count()
    }
}

impl LayoutSurface for SimulatedSurface {
    fn markers(&self) -> Vec<RenderedMarker> {
        let tops = self.tops();
        (0..self.flow.len())
            .filter_map(|index| self.rendered_marker(index, &tops))
            .collect()
    }

    fn marker(&self, id: &str) -> Option<RenderedMarker> {
        let index = self.marker_index(id)?;
        self.rendered_marker(index, &self.tops())
    }

    fn has_spacer(&self, id: &str) -> bool {
        self.spacer_height(id).is_some()
    }

    fn skeleton_container(&self) -> Option<SkeletonContainer> {
        let page_count = self.skeletons?;
        let last = (page_count > 0).then(|| stack_bottom(&self.config, page_count));
        Some(SkeletonContainer {
            page_count,
            last_rect_bottom: last,
            last_edge: last,
        })
    }

    fn content_bottom(&self) -> Option<f64> {
        (!self.flow.is_empty()).then(|| self.flow_bottom())
    }

    fn content_height(&self) -> f64 {
        let skeleton_bottom = self.skeleton_container().and_then(|c| c.last_edge).unwrap_or(0.0);
        self.flow_bottom()
            .max(skeleton_bottom)
            .max(self.min_height.unwrap_or(0.0))
    }

    fn set_spacer_height(&mut self, id: &str, height: f64) {
        for item in &mut self.flow {
            if let FlowItem::Spacer { marker_id, height: current } = item {
                if marker_id == id {
                    *current = height;
                }
            }
        }
    }

    fn insert_spacer(&mut self, id: &str, direction: BreakDirection, height: f64) {
        let Some(index) = self.marker_index(id) else {
            return;
        };
        let spacer = FlowItem::Spacer { marker_id: id.to_string(), height };
        match direction {
            BreakDirection::Before => self.flow.insert(index, spacer),
            BreakDirection::After => self.flow.insert(index + 1, spacer),
        }
    }

    fn append_skeletons(&mut self, count: usize) {
        if let Some(pages) = self.skeletons.as_mut() {
            *pages += count;
        }
    }

    fn truncate_skeletons(&mut self, count: usize) {
        if let Some(pages) = self.skeletons.as_mut() {
            *pages = (*pages).min(count);
        }
    }

    fn set_min_height(&mut self, height: f64) {
        self.min_height = Some(height);
    }
}

impl OverlayRenderer for SimulatedSurface {
    fn render(&mut self, document: &Document, overlays: &[Overlay]) {
        self.render_overlays(document, overlays);
    }
}
