//! Page count estimation
//!
//! Instead of laying the whole document out again on every keystroke, the
//! estimator compares where the content ends with where the last rendered page
//! ends and adds or removes whole pages to close the gap.

use crate::host::LayoutSurface;
use crate::models::PaginationConfig;

/// Gaps between -10px and 0 are measurement noise
pub const LOW_DEAD_ZONE: f64 = -10.0;

/// Distance from a full page inside which the last page is kept
pub const SHRINK_MARGIN: f64 = 10.0;

/// Rendered extent the estimate is based on
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExtentSample {
    /// Skeletons are rendered; both bottoms come from bounding boxes
    Rendered {
        page_count: usize,
        content_bottom: Option<f64>,
        last_skeleton_bottom: Option<f64>,
    },
    /// Nothing rendered yet, only the raw content height is known
    Unpaged { content_height: f64 },
}

impl ExtentSample {
    /// Sample the surface's current geometry
    pub fn measure<S: LayoutSurface + ?Sized>(surface: &S) -> Self {
        match surface.skeleton_container() {
            Some(container) => ExtentSample::Rendered {
                page_count: container.page_count,
                content_bottom: surface.content_bottom(),
                last_skeleton_bottom: container.last_rect_bottom,
            },
            None => ExtentSample::Unpaged {
                content_height: surface.content_height(),
            },
        }
    }

    /// Page count currently rendered (0 before the first render)
    pub fn rendered_count(&self) -> usize {
        match self {
            ExtentSample::Rendered { page_count, .. } => *page_count,
            ExtentSample::Unpaged { .. } => 0,
        }
    }
}

/// Pages needed for `content_height` when nothing is paginated yet
pub fn initial_page_count(content_height: f64, content_area: f64) -> usize {
    let pages = (content_height / content_area).ceil();
    if pages.is_finite() && pages >= 1.0 {
        pages as usize
    } else {
        1
    }
}

/// New page count given the current rendered extent
pub fn estimate_page_count(sample: &ExtentSample, config: &PaginationConfig) -> usize {
    let content_area = config.content_area_height();
    match *sample {
        ExtentSample::Unpaged { content_height } => {
            initial_page_count(content_height, content_area)
        }
        ExtentSample::Rendered {
            page_count,
            content_bottom: Some(content_bottom),
            last_skeleton_bottom: Some(skeleton_bottom),
        } => adjust_page_count(page_count, content_bottom - skeleton_bottom, config),
        // Container without a measurable last page or last element
        ExtentSample::Rendered { .. } => 1,
    }
}

/// Apply the gap between content bottom and last skeleton bottom to `current`
pub fn adjust_page_count(current: usize, gap: f64, config: &PaginationConfig) -> usize {
    let shrink_threshold = -(config.page_height - SHRINK_MARGIN);

    if gap > 0.0 {
        let add = (gap / config.content_area_height()).ceil() as usize;
        return current + add;
    }

    if gap <= shrink_threshold {
        let remove = (gap / config.page_stride()).floor();
        let next = current as f64 + remove;
        return if next < 1.0 { 1 } else { next as usize };
    }

    // Low dead zone [-10, 0] and mid dead zone (shrink threshold, -10)
    current.max(1)
}
