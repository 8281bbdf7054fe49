//! Read-only view of the host document
//!
//! The pagination core never edits the document. It only walks the top-level
//! blocks to find page-break markers and their positions. Positions follow the
//! usual rich-text convention: every block occupies `node_size` positions and
//! the first block starts at 0.

use serde::{Deserialize, Serialize};
use super::marker::Marker;

/// One top-level block of the document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    /// Text paragraph
    Paragraph {
        #[serde(default)]
        text: String,
    },

    /// Explicit page-break marker
    #[serde(rename = "pb")]
    PageBreak { attrs: Marker },

    /// Any other block the pagination core does not look inside
    Block { name: String, size: usize },
}

impl BlockNode {
    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockNode::Paragraph { text: text.into() }
    }

    pub fn page_break(marker: Marker) -> Self {
        BlockNode::PageBreak { attrs: marker }
    }

    /// Number of positions the node occupies
    pub fn node_size(&self) -> usize {
        match self {
            // open + text + close
            BlockNode::Paragraph { text } => text.chars().count() + 2,
            BlockNode::PageBreak { .. } => 1,
            BlockNode::Block { size, .. } => (*size).max(1),
        }
    }

    pub fn marker(&self) -> Option<&Marker> {
        match self {
            BlockNode::PageBreak { attrs } => Some(attrs),
            _ => None,
        }
    }
}

/// A marker together with where it sits in the document
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker<'a> {
    pub marker: &'a Marker,
    /// Position just before the marker node
    pub pos: usize,
    pub node_size: usize,
}

impl PlacedMarker<'_> {
    /// Position just after the marker node
    pub fn end(&self) -> usize {
        self.pos + self.node_size
    }
}

/// The host document (top-level blocks only)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<BlockNode>,
}

impl Document {
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }

    /// Iterate blocks with their start positions
    pub fn positioned(&self) -> impl Iterator<Item = (usize, &BlockNode)> {
        self.blocks.iter().scan(0usize, |offset, node| {
            let pos = *offset;
            *offset += node.node_size();
            Some((pos, node))
        })
    }

    /// All page-break markers in document order
    pub fn markers(&self) -> Vec<PlacedMarker<'_>> {
        self.positioned()
            .filter_map(|(pos, node)| {
                node.marker().map(|marker| PlacedMarker {
                    marker,
                    pos,
                    node_size: node.node_size(),
                })
            })
            .collect()
    }

    /// Total number of positions in the document
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(BlockNode::node_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marker::BreakDirection;

    fn sample() -> Document {
        Document::new(vec![
            BlockNode::paragraph("Hello"),
            BlockNode::page_break(Marker::new("a", BreakDirection::After)),
            BlockNode::Block { name: "image".to_string(), size: 1 },
            BlockNode::page_break(Marker::new("b", BreakDirection::Before)),
        ])
    }

    #[test]
    fn test_marker_positions() {
        let doc = sample();
        let markers = doc.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].marker.id, "a");
        assert_eq!(markers[0].pos, 7);
        assert_eq!(markers[0].end(), 8);
        assert_eq!(markers[1].marker.id, "b");
        assert_eq!(markers[1].pos, 9);
        assert_eq!(doc.content_size(), 10);
    }

    #[test]
    fn test_document_json() {
        let json = r#"{"blocks": [
            {"type": "paragraph", "text": "Hi"},
            {"type": "pb", "attrs": {"bid": "x", "type": "before"}},
            {"type": "block", "name": "table", "size": 14}
        ]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(doc.markers()[0].marker.direction, BreakDirection::Before);
        assert_eq!(doc.content_size(), 4 + 1 + 14);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::default();
        assert!(doc.markers().is_empty());
        assert_eq!(doc.content_size(), 0);
    }
}
