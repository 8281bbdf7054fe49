//! Update coordinator
//!
//! Runs after the host has rendered a transaction and decides what, if
//! anything, pagination has to do about it:
//!
//! - Phase A, on content changes only: measure marker drift and page count
//!   against the rendered layout and ask for a recompute when either is off.
//! - Phase B, whenever the overlay version went up: schedule a stabilization
//!   frame that pins the container height to the last page skeleton.
//!
//! Recompute requests never change the document, so the cycle ends after the
//! rebuild they trigger.

pub mod diagnostics;

use crate::host::LayoutSurface;
use crate::layout::divider::{must_recalculate, recompute_spacers};
use crate::layout::page_count::{estimate_page_count, ExtentSample};
use crate::models::{Document, MeasurementTable, PaginationConfig};
use crate::overlay::OverlayState;
use crate::transaction::{RecomputeFlags, RecomputeRequest};

pub use diagnostics::{DiagnosticEvent, Diagnostics, LogDiagnostics, RecordingDiagnostics};

/// Prior and current editor state around one render
pub struct ViewUpdate<'a> {
    pub prev_document: &'a Document,
    pub document: &'a Document,
    pub prev_state: &'a OverlayState,
    pub state: &'a OverlayState,
}

/// One-shot stabilization callback, valid for the version it captured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StabilizationTicket {
    pub version: u64,
}

/// What the coordinator asks the host to do after a render
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// Dispatch this as a recompute transaction
    pub recompute: Option<RecomputeRequest>,
    /// Run this on the next animation frame
    pub stabilization: Option<StabilizationTicket>,
}

pub struct UpdateCoordinator<D: Diagnostics = LogDiagnostics> {
    config: PaginationConfig,
    seen_version: u64,
    diagnostics: D,
}

impl<D: Diagnostics> UpdateCoordinator<D> {
    pub fn new(config: PaginationConfig, initial_version: u64, diagnostics: D) -> Self {
        Self {
            config,
            seen_version: initial_version,
            diagnostics,
        }
    }

    pub fn seen_version(&self) -> u64 {
        self.seen_version
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    /// Handle one render-update notification
    pub fn on_view_update<S: LayoutSurface + ?Sized>(
        &mut self,
        update: &ViewUpdate<'_>,
        surface: &mut S,
        table: &mut MeasurementTable,
    ) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        if update.prev_document != update.document {
            outcome.recompute = self.measure_drift(surface, table);
        }

        let prev_version = update.prev_state.version();
        let version = update.state.version();
        if version > prev_version {
            self.seen_version = version;
            outcome.stabilization = Some(StabilizationTicket { version });
        }

        outcome
    }

    /// Phase A: compare rendered layout with what the overlays assume
    pub fn measure_drift<S: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        table: &mut MeasurementTable,
    ) -> Option<RecomputeRequest> {
        let mut flags = RecomputeFlags::NONE;

        let markers = surface.markers();
        if must_recalculate(&markers, table) {
            *table = recompute_spacers(surface, std::mem::take(table), &self.config);
            flags |= RecomputeFlags::DIVIDERS;

            let sample = ExtentSample::measure(&*surface);
            self.diagnostics.record(DiagnosticEvent::SpacersRecomputed {
                markers: markers.len(),
                existing_pages: sample.rendered_count(),
                estimated_pages: estimate_page_count(&sample, &self.config),
            });
        }

        let sample = ExtentSample::measure(&*surface);
        let existing = sample.rendered_count();
        let estimated = estimate_page_count(&sample, &self.config);
        if existing != estimated {
            flags |= RecomputeFlags::PAGE_COUNT;
            self.diagnostics.record(DiagnosticEvent::PageCountChanged {
                existing_pages: existing,
                estimated_pages: estimated,
            });
        }

        if flags.is_empty() {
            None
        } else {
            Some(RecomputeRequest {
                flags,
                page_count: estimated,
            })
        }
    }

    /// Phase B callback: pin the container height unless a newer version superseded it
    pub fn stabilize<S: LayoutSurface + ?Sized>(
        &mut self,
        ticket: StabilizationTicket,
        surface: &mut S,
    ) -> bool {
        if ticket.version < self.seen_version {
            self.diagnostics.record(DiagnosticEvent::StaleFrameSkipped {
                ticket_version: ticket.version,
                latest_version: self.seen_version,
            });
            return false;
        }

        let last_edge = surface.skeleton_container().and_then(|container| container.last_edge);
        let Some(min_height) = last_edge else {
            return false;
        };
        surface.set_min_height(min_height);
        self.diagnostics.record(DiagnosticEvent::Stabilized {
            version: ticket.version,
            min_height,
        });
        true
    }
}
