//! Page geometry
//!
//! - `page_count`: how many pages the content needs
//! - `divider`: spacer heights that push markers onto page boundaries
//! - `skeleton`: per-page header, footer and gap chrome

pub mod divider;
pub mod page_count;
pub mod skeleton;

pub use divider::{
    must_recalculate, recompute_spacers, spacer_height, MIN_HEIGHT_GUARD, MIN_SPACER_HEIGHT,
};
pub use page_count::{adjust_page_count, estimate_page_count, initial_page_count, ExtentSample};
pub use skeleton::{build_skeletons, first_page_header, stack_bottom};
