//! Pagination WASM API
//!
//! The JavaScript-facing side of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and serialization across the boundary
//! - `dom`: [`LayoutSurface`](crate::host::LayoutSurface) over the editor DOM
//! - `engine`: the `PaginationPlus` class

pub mod helpers;
pub mod dom;
pub mod engine;

pub use dom::DomSurface;
pub use engine::PaginationPlus;
