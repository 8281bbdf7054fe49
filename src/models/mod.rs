//! Data model for pagination
//!
//! Geometry configuration, the read-only document view, page-break markers,
//! edit position mapping and the per-marker measurement table.

pub mod config;
pub mod document;
pub mod mapping;
pub mod marker;
pub mod measurement;

// Re-export commonly used types
pub use config::{render_template, PaginationConfig, PAGE_PLACEHOLDER};
pub use document::{BlockNode, Document, PlacedMarker};
pub use mapping::{MapResult, Mapping, ReplaceStep};
pub use marker::{BreakDirection, BreakKind, Marker, Side};
pub use measurement::{MeasurementTable, PageBreakMeasurement, PageInfo};
