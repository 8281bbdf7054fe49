//! Page geometry configuration
//!
//! The configuration is supplied once, when pagination is attached to an
//! editor, and never changes afterwards. All measurements are CSS pixels.

use serde::{Deserialize, Serialize};
use crate::error::{PaginationError, Result};

/// Placeholder replaced by the 1-based page number in header/footer templates
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Immutable page geometry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    /// Full height of one page, chrome included
    pub page_height: f64,

    /// Height of the gap between two pages
    pub page_gap: f64,

    /// Border width drawn on the sides of the gap
    pub page_gap_border_size: f64,

    /// Height of the header text band
    pub page_header_height: f64,

    /// Height of the footer text band
    pub page_footer_height: f64,

    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,

    /// Space between the header band and the first line of content
    pub content_margin_top: f64,

    /// Space between the last line of content and the footer band
    pub content_margin_bottom: f64,

    pub footer_left: String,
    pub footer_right: String,
    pub header_left: String,
    pub header_right: String,

    /// Background color of the inter-page gap
    pub page_break_background: String,

    /// Paint spacers (green before, blue after) to make them visible
    pub show_divider_debug: bool,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_height: 800.0,
            page_gap: 50.0,
            page_gap_border_size: 1.0,
            page_header_height: 30.0,
            page_footer_height: 30.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 50.0,
            margin_right: 50.0,
            content_margin_top: 10.0,
            content_margin_bottom: 10.0,
            footer_left: String::new(),
            footer_right: PAGE_PLACEHOLDER.to_string(),
            header_left: String::new(),
            header_right: String::new(),
            page_break_background: "#ffffff".to_string(),
            show_divider_debug: false,
        }
    }
}

impl PaginationConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PaginationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every measurement is usable and the page has room for content
    pub fn validate(&self) -> Result<()> {
        let measurements = [
            ("pageHeight", self.page_height),
            ("pageGap", self.page_gap),
            ("pageGapBorderSize", self.page_gap_border_size),
            ("pageHeaderHeight", self.page_header_height),
            ("pageFooterHeight", self.page_footer_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
            ("contentMarginTop", self.content_margin_top),
            ("contentMarginBottom", self.content_margin_bottom),
        ];

        for (name, value) in measurements {
            if !value.is_finite() || value < 0.0 {
                return Err(PaginationError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if self.content_area_height() <= 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "pageHeight {} leaves no content area after header ({}) and footer ({})",
                self.page_height,
                self.header_area(),
                self.footer_area()
            )));
        }

        Ok(())
    }

    /// Header band plus the margins above and below it
    pub fn header_area(&self) -> f64 {
        self.page_header_height + self.content_margin_top + self.margin_top
    }

    /// Footer band plus the margins above and below it
    pub fn footer_area(&self) -> f64 {
        self.page_footer_height + self.content_margin_bottom + self.margin_bottom
    }

    /// Height left for document content on one page
    pub fn content_area_height(&self) -> f64 {
        self.page_height - self.header_area() - self.footer_area()
    }

    /// Distance between the same edge of two consecutive pages
    pub fn page_stride(&self) -> f64 {
        self.page_height + self.page_gap
    }
}

/// Replace every `{page}` placeholder with the page number
pub fn render_template(template: &str, page_number: usize) -> String {
    template.replace(PAGE_PLACEHOLDER, &page_number.to_string())
}
