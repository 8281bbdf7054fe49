//! Diagnostics sink for the update coordinator
//!
//! Each sink numbers the events it receives, so log lines from consecutive
//! update cycles can be told apart without a process-wide counter.

use serde::Serialize;

/// Something the coordinator decided
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DiagnosticEvent {
    /// Markers drifted and their spacers were recomputed
    SpacersRecomputed { markers: usize, existing_pages: usize, estimated_pages: usize },

    /// Rendered page count no longer matches the estimate
    PageCountChanged { existing_pages: usize, estimated_pages: usize },

    /// A stabilization frame fixed the container's minimum height
    Stabilized { version: u64, min_height: f64 },

    /// A stabilization frame fired after a newer version was seen
    StaleFrameSkipped { ticket_version: u64, latest_version: u64 },
}

pub trait Diagnostics {
    fn record(&mut self, event: DiagnosticEvent);
}

/// Default sink: sequence-numbered `log` output
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    sequence: u64,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Diagnostics for LogDiagnostics {
    fn record(&mut self, event: DiagnosticEvent) {
        let seq = self.sequence;
        self.sequence += 1;
        match event {
            DiagnosticEvent::SpacersRecomputed { markers, existing_pages, estimated_pages } => {
                log::debug!(
                    "breaks: {} - markers: {} - exist: {} - calc: {}",
                    seq, markers, existing_pages, estimated_pages
                )
            }
            DiagnosticEvent::PageCountChanged { existing_pages, estimated_pages } => {
                log::debug!(
                    "pageCount: {} - exist: {} - calc: {}",
                    seq, existing_pages, estimated_pages
                )
            }
            DiagnosticEvent::Stabilized { version, min_height } => {
                log::debug!(
                    "stabilize: {} - version: {} - minHeight: {}px",
                    seq, version, min_height
                )
            }
            DiagnosticEvent::StaleFrameSkipped { ticket_version, latest_version } => {
                log::debug!(
                    "stale frame: {} - ticket: {} - latest: {}",
                    seq, ticket_version, latest_version
                )
            }
        }
    }
}

/// Sink that keeps every event with its sequence number
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    sequence: u64,
    events: Vec<(u64, DiagnosticEvent)>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[(u64, DiagnosticEvent)] {
        &self.events
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&mut self, event: DiagnosticEvent) {
        self.events.push((self.sequence, event));
        self.sequence += 1;
    }
}
