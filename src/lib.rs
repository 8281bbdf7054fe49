//! Pagination WASM Module
//!
//! Page boundaries for a live rich-text editor: per-page header, footer and
//! gap chrome, plus spacers that push explicit page-break markers onto the
//! next page. The document itself is never modified; everything is an overlay
//! recomputed from the rendered layout.

pub mod error;
pub mod models;
pub mod host;
pub mod layout;
pub mod overlay;
pub mod transaction;
pub mod coordinator;
pub mod session;
pub mod api;

// Re-export commonly used types
pub use error::{PaginationError, Result};
pub use models::*;
pub use host::{LayoutSurface, OverlayRenderer, SimulatedConfig, SimulatedSurface};
pub use overlay::{Overlay, OverlayKind, OverlayState, OverlayStateMachine};
pub use transaction::{RecomputeFlags, RecomputeRequest, Transaction};
pub use coordinator::{
    DiagnosticEvent, Diagnostics, LogDiagnostics, RecordingDiagnostics, UpdateCoordinator,
};
pub use session::PaginationSession;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        crate::wasm_warn!("logger already initialized");
    }

    log::info!("Pagination WASM module initialized");
}
