//! Per-marker spacer measurements
//!
//! The table remembers, for each marker id, the spacer height computed on the
//! last recompute pass and the marker bottom it was computed from. It is a
//! plain value: the divider calculator takes the previous table and returns
//! the next one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use super::marker::{BreakDirection, BreakKind};

/// Spacer measurement recorded for one marker
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageBreakMeasurement {
    pub kind: BreakKind,
    pub direction: BreakDirection,
    /// Height given to the marker's spacer, always >= 1
    pub spacer_height: f64,
    /// Marker block bottom the height was derived from
    pub last_measured_bottom: f64,
}

/// Marker id -> measurement
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MeasurementTable {
    entries: HashMap<String, PageBreakMeasurement>,
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&PageBreakMeasurement> {
        self.entries.get(id)
    }

    /// Record a measurement, replacing any previous one for the same marker
    pub fn record(&mut self, id: impl Into<String>, measurement: PageBreakMeasurement) {
        self.entries.insert(id.into(), measurement);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Page a vertical offset falls on, and how far into that page it is
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageInfo {
    pub page_index: usize,
    pub margin_within_page: f64,
}

impl PageInfo {
    /// `divmod(bottom, stride)`
    pub fn locate(bottom: f64, stride: f64) -> Self {
        let page_index = (bottom / stride).floor().max(0.0);
        Self {
            page_index: page_index as usize,
            margin_within_page: bottom - page_index * stride,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate() {
        let info = PageInfo::locate(950.0, 850.0);
        assert_eq!(info.page_index, 1);
        assert_eq!(info.margin_within_page, 100.0);

        let first = PageInfo::locate(120.0, 850.0);
        assert_eq!(first.page_index, 0);
        assert_eq!(first.margin_within_page, 120.0);
    }

    #[test]
    fn test_record_replaces() {
        let mut table = MeasurementTable::new();
        let m = PageBreakMeasurement {
            kind: BreakKind::PageBreak,
            direction: BreakDirection::After,
            spacer_height: 10.0,
            last_measured_bottom: 100.0,
        };
        table.record("a", m);
        table.record("a", PageBreakMeasurement { spacer_height: 20.0, ..m });
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").unwrap().spacer_height, 20.0);
    }
}
