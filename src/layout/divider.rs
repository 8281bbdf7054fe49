//! Divider (spacer) heights for page-break markers
//!
//! Every marker gets a spacer whose height pushes the marker's edge onto the
//! next page boundary. Markers are processed top to bottom and re-measured one
//! at a time, because growing one spacer moves every marker below it.

use crate::host::{LayoutSurface, RenderedMarker};
use crate::models::{MeasurementTable, PageBreakMeasurement, PageInfo, PaginationConfig};
use super::page_count::{estimate_page_count, ExtentSample};

/// Marker movement (px) tolerated before spacers are recomputed
pub const MIN_HEIGHT_GUARD: f64 = 4.0;

/// Smallest spacer ever emitted
pub const MIN_SPACER_HEIGHT: f64 = 1.0;

/// Extra skeletons kept on top of one per marker while a pass runs
const SKELETON_HEADROOM: usize = 2;

/// Whether the rendered markers no longer match the recorded measurements
pub fn must_recalculate(markers: &[RenderedMarker], table: &MeasurementTable) -> bool {
    if markers.len() != table.len() {
        return true;
    }

    let moved = markers.iter().any(|marker| match table.get(&marker.id) {
        Some(recorded) => {
            (marker.block_bottom() - recorded.last_measured_bottom).abs() > MIN_HEIGHT_GUARD
        }
        None => true,
    });
    if moved {
        return true;
    }

    // A spacer must sit next to its marker on the marker's side
    markers.iter().any(|marker| !marker.has_required_spacer())
}

/// Page position of a marker block bottom and the spacer height it needs
pub fn spacer_height(block_bottom: f64, config: &PaginationConfig) -> (PageInfo, f64) {
    let info = PageInfo::locate(block_bottom, config.page_stride());
    let height =
        config.page_height + config.header_area() + config.page_gap - info.margin_within_page;
    (info, height.max(MIN_SPACER_HEIGHT))
}

/// Recompute every marker's spacer against the live surface.
///
/// Returns the next measurement table, keyed by the markers rendered now;
/// entries of markers that disappeared are not carried over.
pub fn recompute_spacers<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    previous: MeasurementTable,
    config: &PaginationConfig,
) -> MeasurementTable {
    let ids: Vec<String> = surface.markers().into_iter().map(|marker| marker.id).collect();
    if ids.is_empty() {
        return MeasurementTable::new();
    }

    let reservation = reserve_skeletons(surface, ids.len(), config);

    let mut next = MeasurementTable::new();
    let mut inserted = 0;
    for id in &ids {
        let Some(marker) = surface.marker(id) else {
            log::warn!("marker {} vanished during divider pass", id);
            continue;
        };

        let bottom = marker.block_bottom();
        let (info, height) = spacer_height(bottom, config);

        if surface.has_spacer(id) {
            surface.set_spacer_height(id, height);
        } else {
            surface.insert_spacer(id, marker.direction, height);
            inserted += 1;
        }

        log::debug!(
            "spacer {}: bottom={} page={} within={} height={}",
            id, bottom, info.page_index, info.margin_within_page, height
        );

        next.record(
            id.clone(),
            PageBreakMeasurement {
                kind: marker.kind,
                direction: marker.direction,
                spacer_height: height,
                last_measured_bottom: bottom,
            },
        );
    }

    release_skeletons(surface, reservation);

    let superseded = previous.ids().filter(|id| !next.contains(id)).count();
    log::debug!(
        "divider pass: {} markers, {} spacers inserted, {} stale entries superseded",
        next.len(), inserted, superseded
    );
    next
}

/// Skeletons appended for the duration of a pass
struct SkeletonReservation {
    committed: usize,
    target: usize,
}

/// Make sure no marker runs out of pages to align against mid-pass
fn reserve_skeletons<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    marker_count: usize,
    config: &PaginationConfig,
) -> Option<SkeletonReservation> {
    let container = surface.skeleton_container()?;
    let estimate = estimate_page_count(&ExtentSample::measure(&*surface), config);
    let reservation = SkeletonReservation {
        committed: container.page_count,
        target: estimate + marker_count + SKELETON_HEADROOM,
    };
    if reservation.committed < reservation.target {
        surface.append_skeletons(reservation.target - reservation.committed);
    }
    Some(reservation)
}

/// Trim back to the committed count; the page-count rebuild owns that number
fn release_skeletons<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    reservation: Option<SkeletonReservation>,
) {
    if let Some(reservation) = reservation {
        if reservation.target > reservation.committed {
            surface.truncate_skeletons(reservation.committed);
        }
    }
}
