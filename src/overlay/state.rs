//! Overlay state machine
//!
//! Holds the two overlay collections (marker spacers and page skeletons) and
//! the version counter the update coordinator watches. States are values:
//! every transition returns a new state and leaves the prior one intact.

use serde::Serialize;
use crate::layout::skeleton::{build_skeletons, first_page_header};
use crate::models::{Document, Mapping, MeasurementTable, PaginationConfig, Side};
use crate::transaction::{RecomputeFlags, RecomputeRequest};
use super::display_list::{Overlay, OverlayId, OverlayKind, OverlaySet, SpacerOverlay};

/// Debug color of `before` spacers
pub const DEBUG_BEFORE_BACKGROUND: &str = "green";
/// Debug color of `after` spacers
pub const DEBUG_AFTER_BACKGROUND: &str = "blue";

/// Versioned overlay collections
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    dividers: OverlaySet,
    page_skeletons: OverlaySet,
    version: u64,
}

impl OverlayState {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dividers(&self) -> &OverlaySet {
        &self.dividers
    }

    pub fn page_skeletons(&self) -> &OverlaySet {
        &self.page_skeletons
    }

    /// Number of pages the skeleton collection describes
    pub fn page_count(&self) -> usize {
        self.page_skeletons.skeletons().map_or(0, |stack| stack.page_count())
    }

    /// Whether both collections match `other` in geometry
    pub fn same_geometry(&self, other: &OverlayState) -> bool {
        self.dividers.same_geometry(&other.dividers)
            && self.page_skeletons.same_geometry(&other.page_skeletons)
    }
}

/// Builds and transitions [`OverlayState`]s
pub struct OverlayStateMachine {
    config: PaginationConfig,
    next_id: u64,
}

impl OverlayStateMachine {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config, next_id: 0 }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Build both collections from scratch (version 0)
    pub fn initialize(
        &mut self,
        document: &Document,
        table: &MeasurementTable,
        page_count: usize,
    ) -> OverlayState {
        OverlayState {
            dividers: self.build_dividers(document, table),
            page_skeletons: self.build_page_skeletons(page_count, false),
            version: 0,
        }
    }

    /// Carry overlays through a content edit without recomputing anything
    pub fn on_edit_applied(&self, mapping: &Mapping, prior: &OverlayState) -> OverlayState {
        OverlayState {
            dividers: prior.dividers.map(mapping),
            page_skeletons: prior.page_skeletons.map(mapping),
            version: prior.version,
        }
    }

    /// Rebuild the collections selected by the request's flags.
    ///
    /// The version moves by exactly one when anything was rebuilt; a request
    /// with no flags returns the prior state unchanged.
    pub fn on_recompute_requested(
        &mut self,
        request: &RecomputeRequest,
        document: &Document,
        table: &MeasurementTable,
        prior: &OverlayState,
    ) -> OverlayState {
        if request.flags.is_empty() {
            return prior.clone();
        }

        let dividers = if request.flags.contains(RecomputeFlags::DIVIDERS) {
            self.build_dividers(document, table)
        } else {
            prior.dividers.clone()
        };
        let page_skeletons = if request.flags.contains(RecomputeFlags::PAGE_COUNT) {
            self.build_page_skeletons(request.page_count, true)
        } else {
            prior.page_skeletons.clone()
        };

        log::debug!(
            "overlays rebuilt (flags={}): {} spacers, {} pages, version {}",
            request.flags.bits(),
            dividers.len(),
            request.page_count,
            prior.version + 1
        );

        OverlayState {
            dividers,
            page_skeletons,
            version: prior.version + 1,
        }
    }

    /// Merged overlays for rendering, ordered by anchor.
    ///
    /// At a shared anchor, `after` overlays close the preceding node and come
    /// first; `before` overlays open the following one.
    pub fn query(&self, state: &OverlayState) -> Vec<Overlay> {
        let mut merged: Vec<Overlay> = state
            .page_skeletons
            .iter()
            .chain(state.dividers.iter())
            .cloned()
            .collect();
        // Stable: skeletons stay ahead of spacers sharing an anchor and side
        merged.sort_by_key(|overlay| (overlay.anchor, overlay.side == Side::Before));
        merged
    }

    fn next_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build_dividers(&mut self, document: &Document, table: &MeasurementTable) -> OverlaySet {
        if table.is_empty() {
            return OverlaySet::empty();
        }

        let placements: Vec<_> = document
            .markers()
            .into_iter()
            .filter_map(|placed| {
                table.get(&placed.marker.id).map(|measurement| {
                    let side = measurement.direction.side();
                    let anchor = match side {
                        Side::Before => placed.pos,
                        Side::After => placed.end(),
                    };
                    (anchor, side, placed.marker.id.clone(), *measurement)
                })
            })
            .collect();

        let overlays = placements
            .into_iter()
            .map(|(anchor, side, marker_id, measurement)| {
                let color = match side {
                    Side::Before => DEBUG_BEFORE_BACKGROUND,
                    Side::After => DEBUG_AFTER_BACKGROUND,
                };
                let debug_background = self.config.show_divider_debug.then(|| color.to_string());
                Overlay {
                    id: self.next_id(),
                    anchor,
                    side,
                    kind: OverlayKind::Spacer(SpacerOverlay {
                        marker_id,
                        direction: measurement.direction,
                        break_kind: measurement.kind,
                        height: measurement.spacer_height,
                        debug_background,
                    }),
                }
            })
            .collect();
        OverlaySet::new(overlays)
    }

    /// Skeleton stack at the document start; rebuilt stacks also get the first-page header
    fn build_page_skeletons(&mut self, page_count: usize, with_first_header: bool) -> OverlaySet {
        let mut overlays = vec![Overlay {
            id: self.next_id(),
            anchor: 0,
            side: Side::Before,
            kind: OverlayKind::PageSkeletons(build_skeletons(&self.config, page_count)),
        }];
        if with_first_header {
            overlays.push(Overlay {
                id: self.next_id(),
                anchor: 0,
                side: Side::Before,
                kind: OverlayKind::FirstPageHeader(first_page_header(&self.config)),
            });
        }
        OverlaySet::new(overlays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BlockNode, BreakDirection, BreakKind, Marker, PageBreakMeasurement, ReplaceStep,
    };

    fn document() -> Document {
        Document::new(vec![
            BlockNode::paragraph("one"),
            BlockNode::page_break(Marker::new("a", BreakDirection::After)),
            BlockNode::paragraph("two"),
            BlockNode::page_break(Marker::new("b", BreakDirection::Before)),
            BlockNode::paragraph("three"),
        ])
    }

    fn table() -> MeasurementTable {
        let mut table = MeasurementTable::new();
        let entries = [("a", BreakDirection::After, 300.0), ("b", BreakDirection::Before, 120.0)];
        for (id, direction, height) in entries {
            table.record(
                id,
                PageBreakMeasurement {
                    kind: BreakKind::PageBreak,
                    direction,
                    spacer_height: height,
                    last_measured_bottom: 0.0,
                },
            );
        }
        table
    }

    fn request(flags: RecomputeFlags) -> RecomputeRequest {
        RecomputeRequest { flags, page_count: 3 }
    }

    /// Rebuild `prior` over the test document and table
    fn rebuild(
        machine: &mut OverlayStateMachine,
        flags: RecomputeFlags,
        prior: &OverlayState,
    ) -> OverlayState {
        machine.on_recompute_requested(&request(flags), &document(), &table(), prior)
    }

    #[test]
    fn test_initialize() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let state = machine.initialize(&document(), &MeasurementTable::new(), 2);
        assert_eq!(state.version(), 0);
        assert!(state.dividers().is_empty());
        assert_eq!(state.page_count(), 2);
        // No first-page header before the first rebuild
        assert_eq!(state.page_skeletons().len(), 1);
    }

    #[test]
    fn test_spacer_anchors_follow_direction() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let state = machine.initialize(&document(), &table(), 1);
        let spacers: Vec<_> = state.dividers().iter().collect();
        assert_eq!(spacers.len(), 2);
        // "one" is 0..5, marker a is 5..6
        assert_eq!((spacers[0].anchor, spacers[0].side), (6, Side::After));
        // "two" is 6..11, marker b starts at 11
        assert_eq!((spacers[1].anchor, spacers[1].side), (11, Side::Before));
        assert_eq!(spacers[1].as_spacer().unwrap().height, 120.0);
    }

    #[test]
    fn test_markers_without_measurement_are_skipped() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let mut table = MeasurementTable::new();
        table.record(
            "b",
            PageBreakMeasurement {
                kind: BreakKind::PageBreak,
                direction: BreakDirection::Before,
                spacer_height: 5.0,
                last_measured_bottom: 0.0,
            },
        );
        let state = machine.initialize(&document(), &table, 1);
        assert_eq!(state.dividers().len(), 1);
        assert_eq!(state.dividers().spacers().next().unwrap().marker_id, "b");
    }

    #[test]
    fn test_both_flags_bump_version_once() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &MeasurementTable::new(), 1);
        let next = rebuild(&mut machine, RecomputeFlags::ALL, &initial);
        assert_eq!(next.version(), 1);
        assert_eq!(next.dividers().len(), 2);
        assert_eq!(next.page_count(), 3);
        // Skeleton stack plus first-page header
        assert_eq!(next.page_skeletons().len(), 2);
    }

    #[test]
    fn test_single_flag_keeps_other_collection() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &MeasurementTable::new(), 1);
        let next = rebuild(&mut machine, RecomputeFlags::DIVIDERS, &initial);
        assert_eq!(next.version(), 1);
        assert_eq!(next.page_skeletons(), initial.page_skeletons());
        assert_eq!(next.page_count(), 1);
    }

    #[test]
    fn test_empty_flags_is_noop() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &MeasurementTable::new(), 1);
        let next = rebuild(&mut machine, RecomputeFlags::NONE, &initial);
        assert_eq!(next, initial);
    }

    #[test]
    fn test_rebuild_is_geometry_stable() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &MeasurementTable::new(), 1);
        let first = rebuild(&mut machine, RecomputeFlags::ALL, &initial);
        let second = rebuild(&mut machine, RecomputeFlags::ALL, &first);
        assert!(first.same_geometry(&second));
        assert_ne!(first.dividers(), second.dividers());
        assert_eq!(second.version(), 2);
    }

    #[test]
    fn test_edit_remaps_without_version_bump() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &table(), 1);
        let mapping = Mapping::new(vec![ReplaceStep::insert(1, 4)]);
        let mapped = machine.on_edit_applied(&mapping, &initial);
        assert_eq!(mapped.version(), 0);
        let anchors: Vec<_> = mapped.dividers().iter().map(|o| o.anchor).collect();
        assert_eq!(anchors, vec![10, 15]);
        assert_eq!(mapped.page_skeletons().iter().next().unwrap().anchor, 0);
    }

    #[test]
    fn test_debug_backgrounds() {
        let config = PaginationConfig {
            show_divider_debug: true,
            ..Default::default()
        };
        let mut machine = OverlayStateMachine::new(config);
        let state = machine.initialize(&document(), &table(), 1);
        let colors: Vec<_> =
            state.dividers().spacers().map(|s| s.debug_background.clone()).collect();
        assert_eq!(colors, vec![Some("blue".to_string()), Some("green".to_string())]);
    }

    #[test]
    fn test_query_orders_by_anchor() {
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let doc = document();
        let initial = machine.initialize(&doc, &MeasurementTable::new(), 1);
        let state = rebuild(&mut machine, RecomputeFlags::ALL, &initial);
        let merged = machine.query(&state);
        assert_eq!(merged.len(), 4);
        assert!(matches!(merged[0].kind, OverlayKind::PageSkeletons(_)));
        assert!(matches!(merged[1].kind, OverlayKind::FirstPageHeader(_)));
        let anchors: Vec<_> = merged.iter().map(|o| o.anchor).collect();
        assert_eq!(anchors, vec![0, 0, 6, 11]);
    }

    #[test]
    fn test_query_puts_after_spacer_first_at_shared_anchor() {
        // "one" 0..5, a 5..6, b 6..7: both spacers anchor at 6
        let doc = Document::new(vec![
            BlockNode::paragraph("one"),
            BlockNode::page_break(Marker::new("a", BreakDirection::After)),
            BlockNode::page_break(Marker::new("b", BreakDirection::Before)),
        ]);
        let mut machine = OverlayStateMachine::new(PaginationConfig::default());
        let state = machine.initialize(&doc, &table(), 1);
        let order: Vec<_> = machine
            .query(&state)
            .iter()
            .filter_map(|o| o.as_spacer().map(|s| (o.anchor, s.marker_id.clone())))
            .collect();
        assert_eq!(order, vec![(6, "a".to_string()), (6, "b".to_string())]);
    }
}
