//! Page skeleton chrome
//!
//! A skeleton is the repeated chrome of one page: a transparent slot the
//! content shows through, then the footer, the gap and the next page's header.
//! The first page's slot also covers its own header, which is drawn by the
//! separate first-page header overlay.

use crate::models::{render_template, PaginationConfig};
use crate::overlay::{ChromeBand, GapBand, PageSkeleton, SkeletonStack};

/// Build `page_count` skeletons (at least one)
pub fn build_skeletons(config: &PaginationConfig, page_count: usize) -> SkeletonStack {
    let count = page_count.max(1);
    let pages = (0..count)
        .map(|index| page_skeleton(config, index, index + 1 == count))
        .collect();
    SkeletonStack { pages }
}

fn page_skeleton(config: &PaginationConfig, index: usize, is_last: bool) -> PageSkeleton {
    let first_page = index == 0;
    let content_offset = if first_page {
        config.header_area() + config.content_area_height()
    } else {
        config.content_area_height()
    };
    let page_number = index + 1;

    PageSkeleton {
        index,
        first_page,
        is_last,
        content_offset,
        footer: ChromeBand {
            height: config.page_footer_height,
            margin_top: config.content_margin_bottom,
            margin_bottom: config.margin_bottom,
            left: render_template(&config.footer_left, page_number),
            right: render_template(&config.footer_right, page_number),
        },
        gap: GapBand {
            height: config.page_gap,
            border_size: config.page_gap_border_size,
            background: config.page_break_background.clone(),
        },
        // This header belongs to the following page
        header: header_band(config, page_number + 1),
        bleed_left: config.margin_left,
        bleed_right: config.margin_right,
    }
}

/// Header drawn at the very top of the document
pub fn first_page_header(config: &PaginationConfig) -> ChromeBand {
    header_band(config, 1)
}

fn header_band(config: &PaginationConfig, page_number: usize) -> ChromeBand {
    ChromeBand {
        height: config.page_header_height,
        margin_top: config.margin_top,
        margin_bottom: config.content_margin_top,
        left: render_template(&config.header_left, page_number),
        right: render_template(&config.header_right, page_number),
    }
}

/// Offset bottom of the last skeleton when `page_count` pages are rendered.
///
/// Every page but the last ends with footer, gap and header; the last one ends
/// after its footer.
pub fn stack_bottom(config: &PaginationConfig, page_count: usize) -> f64 {
    let count = page_count.max(1) as f64;
    count * config.page_stride() - config.page_gap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_distinguished() {
        let config = PaginationConfig::default();
        let stack = build_skeletons(&config, 3);
        assert_eq!(stack.page_count(), 3);
        assert!(stack.pages[0].first_page);
        assert_eq!(stack.pages[0].content_offset, 60.0 + 680.0);
        assert!(!stack.pages[1].first_page);
        assert_eq!(stack.pages[1].content_offset, 680.0);
        assert!(stack.pages[2].is_last);
        assert!(!stack.pages[1].is_last);
    }

    #[test]
    fn test_footer_page_numbers() {
        let config = PaginationConfig {
            footer_left: "Report".to_string(),
            footer_right: "Page {page}".to_string(),
            header_right: "{page}".to_string(),
            ..Default::default()
        };
        let stack = build_skeletons(&config, 2);
        assert_eq!(stack.pages[0].footer.right, "Page 1");
        assert_eq!(stack.pages[1].footer.right, "Page 2");
        assert_eq!(stack.pages[0].footer.left, "Report");
        assert_eq!(stack.pages[0].header.right, "2");
        assert_eq!(first_page_header(&config).right, "1");
    }

    #[test]
    fn test_zero_pages_builds_one() {
        let stack = build_skeletons(&PaginationConfig::default(), 0);
        assert_eq!(stack.page_count(), 1);
        assert!(stack.pages[0].first_page && stack.pages[0].is_last);
    }

    #[test]
    fn test_stack_bottom() {
        let config = PaginationConfig::default();
        assert_eq!(stack_bottom(&config, 1), 800.0);
        assert_eq!(stack_bottom(&config, 3), 3.0 * 850.0 - 50.0);
    }
}
