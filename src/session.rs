//! Pagination session
//!
//! Owns everything one paginated editor needs between notifications: the
//! document, the overlay state and its machine, the measurement table, the
//! update coordinator and the host surface. Hosts drive it with
//! [`apply`](PaginationSession::apply) and
//! [`view_updated`](PaginationSession::view_updated); surfaces that render
//! overlays themselves can use [`dispatch`](PaginationSession::dispatch) to run
//! a whole cycle at once.

use std::collections::VecDeque;

use crate::coordinator::{
    Diagnostics, LogDiagnostics, StabilizationTicket, UpdateCoordinator, UpdateOutcome, ViewUpdate,
};
use crate::error::Result;
use crate::host::{LayoutSurface, OverlayRenderer};
use crate::layout::page_count::{estimate_page_count, ExtentSample};
use crate::models::{Document, MeasurementTable, PaginationConfig};
use crate::overlay::{Overlay, OverlayState, OverlayStateMachine};
use crate::transaction::{RecomputeRequest, Transaction};

/// Document and overlay state before the last applied transaction
#[derive(Clone, Debug)]
struct Snapshot {
    document: Document,
    state: OverlayState,
}

pub struct PaginationSession<S: LayoutSurface, D: Diagnostics = LogDiagnostics> {
    machine: OverlayStateMachine,
    coordinator: UpdateCoordinator<D>,
    document: Document,
    state: OverlayState,
    table: MeasurementTable,
    surface: S,
    prior: Option<Snapshot>,
    outbox: VecDeque<RecomputeRequest>,
    frames: VecDeque<StabilizationTicket>,
}

impl<S: LayoutSurface> PaginationSession<S, LogDiagnostics> {
    pub fn new(config: PaginationConfig, document: Document, surface: S) -> Result<Self> {
        Self::with_diagnostics(config, document, surface, LogDiagnostics::new())
    }
}

impl<S: LayoutSurface, D: Diagnostics> PaginationSession<S, D> {
    /// Validate the configuration and build the initial overlays
    pub fn with_diagnostics(
        config: PaginationConfig,
        document: Document,
        surface: S,
        diagnostics: D,
    ) -> Result<Self> {
        config.validate()?;

        let page_count = estimate_page_count(&ExtentSample::measure(&surface), &config);
        let table = MeasurementTable::new();
        let mut machine = OverlayStateMachine::new(config.clone());
        let state = machine.initialize(&document, &table, page_count);
        log::info!(
            "pagination initialized: {} pages, {} markers",
            page_count,
            document.markers().len()
        );

        Ok(Self {
            machine,
            coordinator: UpdateCoordinator::new(config, state.version(), diagnostics),
            document,
            state,
            table,
            surface,
            prior: None,
            outbox: VecDeque::new(),
            frames: VecDeque::new(),
        })
    }

    /// Advance the overlay state through one transaction
    pub fn apply(&mut self, transaction: Transaction) {
        self.prior = Some(Snapshot {
            document: self.document.clone(),
            state: self.state.clone(),
        });

        match transaction {
            Transaction::Content(edit) => {
                self.state = self.machine.on_edit_applied(&edit.mapping, &self.state);
                self.document = edit.document;
            }
            Transaction::Selection => {}
            Transaction::Recompute(request) => {
                self.state = self
                    .machine
                    .on_recompute_requested(&request, &self.document, &self.table, &self.state);
            }
        }
    }

    /// Notify the session that the host rendered the last applied transaction.
    ///
    /// Recompute requests and stabilization tickets are also queued; take them
    /// with [`take_recompute_requests`](Self::take_recompute_requests) and
    /// [`take_frames`](Self::take_frames).
    pub fn view_updated(&mut self) -> UpdateOutcome {
        let Some(prior) = self.prior.take() else {
            return UpdateOutcome::default();
        };

        let update = ViewUpdate {
            prev_document: &prior.document,
            document: &self.document,
            prev_state: &prior.state,
            state: &self.state,
        };
        let outcome = self.coordinator.on_view_update(&update, &mut self.surface, &mut self.table);

        if let Some(request) = outcome.recompute {
            self.outbox.push_back(request);
        }
        if let Some(ticket) = outcome.stabilization {
            self.frames.push_back(ticket);
        }
        outcome
    }

    pub fn take_recompute_requests(&mut self) -> Vec<RecomputeRequest> {
        self.outbox.drain(..).collect()
    }

    pub fn take_frames(&mut self) -> Vec<StabilizationTicket> {
        self.frames.drain(..).collect()
    }

    /// Fire a scheduled stabilization frame; `false` when it was stale
    pub fn run_stabilization(&mut self, ticket: StabilizationTicket) -> bool {
        self.coordinator.stabilize(ticket, &mut self.surface)
    }

    /// Fire every queued frame in order, returning how many stabilized
    pub fn run_pending_frames(&mut self) -> usize {
        let tickets = self.take_frames();
        tickets
            .into_iter()
            .filter(|ticket| self.run_stabilization(*ticket))
            .count()
    }

    /// Merged overlays for the current state
    pub fn overlays(&self) -> Vec<Overlay> {
        self.machine.query(&self.state)
    }

    pub fn config(&self) -> &PaginationConfig {
        self.machine.config()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn diagnostics(&self) -> &D {
        self.coordinator.diagnostics()
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        self.coordinator.diagnostics_mut()
    }
}

impl<S: LayoutSurface + OverlayRenderer, D: Diagnostics> PaginationSession<S, D> {
    /// Render the current overlays onto the surface
    pub fn render(&mut self) {
        let overlays = self.overlays();
        self.surface.render(&self.document, &overlays);
    }

    /// Run apply, render and notify until no recompute is pending.
    ///
    /// Recompute transactions never change the document, so a content edit
    /// settles after at most one follow-up cycle. Returns the number of
    /// cycles run. Stabilization frames stay queued.
    pub fn dispatch(&mut self, transaction: Transaction) -> usize {
        let mut pending = VecDeque::from([transaction]);
        let mut cycles = 0;
        while let Some(transaction) = pending.pop_front() {
            self.apply(transaction);
            self.render();
            self.view_updated();
            pending.extend(self.outbox.drain(..).map(Transaction::Recompute));
            cycles += 1;
        }
        cycles
    }
}
