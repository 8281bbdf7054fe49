//! DOM surface and browser entry point
//!
//! Runs in a real browser through wasm-bindgen-test.

#![cfg(target_arch = "wasm32")]

use pagination_wasm::api::{DomSurface, PaginationPlus};
use pagination_wasm::host::LayoutSurface;
use pagination_wasm::models::{BlockNode, BreakDirection, Document, Marker, PaginationConfig};
use pagination_wasm::transaction::Transaction;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn div(html_document: &web_sys::Document, style: &str) -> HtmlElement {
    let element = html_document.create_element("div").unwrap().dyn_into::<HtmlElement>().unwrap();
    element.set_attribute("style", style).unwrap();
    element
}

/// Editor root with a paragraph, a `before` marker and another paragraph
fn editor() -> HtmlElement {
    let html_document = web_sys::window().unwrap().document().unwrap();
    let root = div(&html_document, "position: relative");
    root.append_child(&div(&html_document, "height: 40px")).unwrap();

    let marker = div(&html_document, "height: 2px");
    marker.dataset().set("break", "before").unwrap();
    marker.dataset().set("bid", "m").unwrap();
    root.append_child(&marker).unwrap();

    root.append_child(&div(&html_document, "height: 40px")).unwrap();
    html_document.body().unwrap().append_child(&root).unwrap();
    root
}

#[wasm_bindgen_test]
fn test_reads_marker_geometry() {
    let root = editor();
    let surface = DomSurface::new(root, PaginationConfig::default()).unwrap();

    let markers = surface.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id, "m");
    assert_eq!(markers[0].direction, BreakDirection::Before);
    assert_eq!(markers[0].height, 2.0);
    assert!(!markers[0].has_required_spacer());
    assert!(surface.skeleton_container().is_none());
}

#[wasm_bindgen_test]
fn test_temporary_spacer_moves_marker() {
    let root = editor();
    let mut surface = DomSurface::new(root, PaginationConfig::default()).unwrap();
    let before = surface.marker("m").unwrap().top;

    surface.insert_spacer("m", BreakDirection::Before, 100.0);
    assert!(surface.has_spacer("m"));
    let marker = surface.marker("m").unwrap();
    assert!((marker.top - before - 100.0).abs() < 1.0);
    assert!(marker.has_required_spacer());
    assert!((marker.block_bottom() - (before + 2.0)).abs() < 1.0);

    surface.set_spacer_height("m", 50.0);
    assert!((surface.marker("m").unwrap().top - before - 50.0).abs() < 1.0);
}

#[wasm_bindgen_test]
fn test_min_height() {
    let root = editor();
    let mut surface = DomSurface::new(root.clone(), PaginationConfig::default()).unwrap();
    surface.set_min_height(1650.0);
    assert_eq!(root.style().get_property_value("min-height").unwrap(), "1650px");
}

#[wasm_bindgen_test]
fn test_pagination_plus_lifecycle() {
    let root = editor();
    let document = Document::new(vec![
        BlockNode::paragraph("one"),
        BlockNode::page_break(Marker::new("m", BreakDirection::Before)),
        BlockNode::paragraph("two"),
    ]);
    let document = serde_wasm_bindgen::to_value(&document).unwrap();
    let dispatch = js_sys::Function::new_no_args("");

    let plugin = PaginationPlus::new(root.clone(), JsValue::UNDEFINED, document, dispatch).unwrap();
    assert!(root.class_list().contains("rm-with-pagination"));
    assert_eq!(plugin.version(), 0.0);
    assert!(plugin.page_count() >= 1);

    let selection = serde_wasm_bindgen::to_value(&Transaction::Selection).unwrap();
    plugin.apply_transaction(selection).unwrap();
    plugin.view_updated().unwrap();
    assert_eq!(plugin.version(), 0.0);

    let decorations = plugin.decorations().unwrap();
    assert!(js_sys::Array::is_array(&decorations));
}

#[wasm_bindgen_test]
fn test_rejects_bad_config() {
    let root = editor();
    let config = serde_wasm_bindgen::to_value(&PaginationConfig {
        page_height: 10.0,
        ..Default::default()
    })
    .unwrap();
    let document = serde_wasm_bindgen::to_value(&Document::default()).unwrap();
    let result = PaginationPlus::new(root, config, document, js_sys::Function::new_no_args(""));
    assert!(result.is_err());
}
