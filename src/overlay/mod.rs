//! Page overlays
//!
//! The display list handed to the host ([`display_list`]) and the versioned
//! state machine that builds it ([`state`]).

pub mod display_list;
pub mod state;

pub use display_list::{
    ChromeBand, GapBand, Overlay, OverlayId, OverlayKind, OverlaySet, PageSkeleton, SkeletonStack,
    SpacerOverlay,
};
pub use state::{OverlayState, OverlayStateMachine};
