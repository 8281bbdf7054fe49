//! Spacer alignment across many pages
//!
//! Once the layout has settled, every marker's page edge (the marker bottom
//! for `before` markers, the spacer bottom for `after` markers) must sit right
//! below a page header: `edge mod stride == header area`.

use pagination_wasm::coordinator::RecordingDiagnostics;
use pagination_wasm::host::{LayoutSurface, SimulatedConfig, SimulatedSurface};
use pagination_wasm::layout::MIN_SPACER_HEIGHT;
use pagination_wasm::models::{
    BlockNode, BreakDirection, Document, Mapping, Marker, PaginationConfig, ReplaceStep,
};
use pagination_wasm::session::PaginationSession;
use pagination_wasm::transaction::Transaction;

type Session = PaginationSession<SimulatedSurface, RecordingDiagnostics>;

fn paragraphs(count: usize) -> Vec<BlockNode> {
    (0..count).map(|i| BlockNode::paragraph(format!("line {}", i))).collect()
}

fn document() -> Document {
    let mut blocks = paragraphs(10);
    blocks.push(BlockNode::page_break(Marker::new("m0", BreakDirection::Before)));
    blocks.extend(paragraphs(50));
    blocks.push(BlockNode::page_break(Marker::new("m1", BreakDirection::After)));
    blocks.extend(paragraphs(5));
    blocks.push(BlockNode::page_break(Marker::new("m2", BreakDirection::Before)));
    blocks.extend(paragraphs(80));
    blocks.push(BlockNode::page_break(Marker::new("m3", BreakDirection::After)));
    blocks.extend(paragraphs(3));
    Document::new(blocks)
}

fn touch(session: &mut Session) {
    let end = session.document().content_size();
    let mut blocks = session.document().blocks.clone();
    let tail = BlockNode::paragraph(format!("tail {}", blocks.len()));
    let size = tail.node_size();
    blocks.push(tail);
    let mapping = Mapping::new(vec![ReplaceStep::insert(end, size)]);
    session.dispatch(Transaction::content(Document::new(blocks), mapping));
}

fn settled(config: PaginationConfig) -> Session {
    settled_with(config, SimulatedConfig::default(), document())
}

fn settled_with(config: PaginationConfig, metrics: SimulatedConfig, document: Document) -> Session {
    let surface = SimulatedSurface::new(config.clone(), metrics, &document);
    let diagnostics = RecordingDiagnostics::new();
    let mut session = PaginationSession::with_diagnostics(config, document, surface, diagnostics)
        .expect("valid config");
    session.render();
    // First pass runs before the first-page header exists, second one heals the shift
    touch(&mut session);
    touch(&mut session);
    session
}

fn edges(session: &Session) -> Vec<(String, f64)> {
    let surface = session.surface();
    surface
        .markers()
        .into_iter()
        .map(|marker| {
            let edge = match marker.direction {
                BreakDirection::Before => marker.bottom(),
                BreakDirection::After => {
                    marker.bottom() + surface.spacer_height(&marker.id).unwrap_or_default()
                }
            };
            (marker.id, edge)
        })
        .collect()
}

fn assert_aligned(session: &Session) {
    let config = session.config();
    let stride = config.page_stride();
    let mut last_page = None;
    for (id, edge) in edges(session) {
        let within = edge.rem_euclid(stride);
        assert!(
            (within - config.header_area()).abs() < 1e-6,
            "{} ends at {} ({} into its page)",
            id,
            edge,
            within
        );

        let page = (edge / stride).floor() as i64;
        if let Some(previous) = last_page {
            assert!(page > previous, "{} shares page {} with the marker before it", id, page);
        }
        last_page = Some(page);
    }
}

fn unmargined() -> PaginationConfig {
    PaginationConfig {
        margin_top: 0.0,
        margin_bottom: 0.0,
        content_margin_top: 0.0,
        content_margin_bottom: 0.0,
        ..Default::default()
    }
}

#[test]
fn test_markers_land_below_header() {
    let session = settled(unmargined());
    assert_eq!(session.table().len(), 4);
    assert_aligned(&session);
}

#[test]
fn test_alignment_with_default_margins() {
    let session = settled(PaginationConfig::default());
    assert_eq!(session.config().header_area(), 60.0);
    assert_aligned(&session);
}

#[test]
fn test_every_spacer_at_least_one_pixel() {
    let session = settled(PaginationConfig::default());
    for spacer in session.state().dividers().spacers() {
        assert!(spacer.height >= MIN_SPACER_HEIGHT, "{} is {}px", spacer.marker_id, spacer.height);
    }
}

#[test]
fn test_settled_layout_is_stable() {
    let mut session = settled(PaginationConfig::default());
    let table = session.table().clone();
    let dividers = session.state().dividers().clone();

    touch(&mut session);
    assert_eq!(session.table(), &table);
    assert!(session.state().dividers().same_geometry(&dividers));
    assert_aligned(&session);
}

#[test]
fn test_page_count_covers_content() {
    let session = settled(PaginationConfig::default());
    let config = session.config();
    let last_skeleton = session
        .surface()
        .skeleton_container()
        .and_then(|container| container.last_rect_bottom)
        .expect("skeletons rendered");
    let content_bottom = session.surface().content_bottom().expect("content rendered");
    // At most the low dead zone past the last page, and never a whole spare page
    assert!(content_bottom - last_skeleton <= 0.0);
    assert!(content_bottom - last_skeleton > -(config.page_height - 10.0));
}

#[test]
fn test_adjacent_after_and_before_markers_settle() {
    // Markers taller than the drift guard, sharing one position between them
    let document = Document::new(vec![
        BlockNode::paragraph("top"),
        BlockNode::page_break(Marker::new("a", BreakDirection::After)),
        BlockNode::page_break(Marker::new("b", BreakDirection::Before)),
        BlockNode::paragraph("bottom"),
    ]);
    let metrics = SimulatedConfig { marker_height: 10.0, ..Default::default() };
    let mut session = settled_with(unmargined(), metrics, document);

    for id in ["a", "b"] {
        let marker = session.surface().marker(id).expect("marker rendered");
        assert!(marker.has_required_spacer(), "{} is not next to its own spacer", id);
    }
    // header 30 + "top" 20 + a 10, then a's spacer to the next page
    assert_eq!(session.surface().spacer_height("a"), Some(820.0));
    assert_eq!(session.surface().marker("b").unwrap().bottom(), 1730.0);
    assert_aligned(&session);

    let version = session.state().version();
    let table = session.table().clone();
    for _ in 0..4 {
        touch(&mut session);
        assert_eq!(session.state().version(), version);
        assert_eq!(session.table(), &table);
    }
    assert_aligned(&session);
}
