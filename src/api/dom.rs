//! DOM layout surface
//!
//! Reads marker and skeleton geometry from the editor's rendered DOM and
//! applies the temporary adjustments of a divider pass. Rendering proper
//! stays with the host editor, which turns the display list into elements:
//!
//! - markers carry `data-break` (`before` / `after`) and `data-bid`
//! - spacers are `.vdiv-spacer` elements tagged with their marker's `data-bid`
//! - the skeleton container is `[data-rm-pagination]`, one child per page,
//!   each ending in a `.breaker` band
//!
//! DOM failures during a pass are logged and skipped.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use crate::error::{PaginationError, Result};
use crate::host::{LayoutSurface, Neighbor, RenderedMarker, SkeletonContainer};
use crate::models::{BreakDirection, BreakKind, PaginationConfig};
use crate::overlay::state::{DEBUG_AFTER_BACKGROUND, DEBUG_BEFORE_BACKGROUND};

pub const MARKER_SELECTOR: &str = "[data-break]";
pub const SPACER_CLASS: &str = "vdiv-spacer";
pub const SKELETON_CONTAINER_SELECTOR: &str = "[data-rm-pagination]";
pub const BREAKER_SELECTOR: &str = ".breaker";

/// Log a failed DOM call and carry on
fn logged<T>(result: std::result::Result<T, JsValue>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("DOM {} failed: {:?}", what, err);
            None
        }
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

pub struct DomSurface {
    root: HtmlElement,
    document: Document,
    config: PaginationConfig,
}

impl DomSurface {
    pub fn new(root: HtmlElement, config: PaginationConfig) -> Result<Self> {
        let document = root.owner_document().ok_or_else(|| {
            PaginationError::Host("editor root is not attached to a document".to_string())
        })?;
        Ok(Self { root, document, config })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    fn select_all(&self, selector: &str) -> Vec<HtmlElement> {
        let Some(list) = logged(self.root.query_selector_all(selector), "querySelectorAll") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn select(&self, selector: &str) -> Option<Element> {
        logged(self.root.query_selector(selector), "querySelector").flatten()
    }

    fn spacers(&self, id: &str) -> Vec<HtmlElement> {
        self.select_all(&format!(".{}", SPACER_CLASS))
            .into_iter()
            .filter(|spacer| spacer.dataset().get("bid").as_deref() == Some(id))
            .collect()
    }

    fn marker_elements(&self) -> Vec<(HtmlElement, RenderedMarker)> {
        self.select_all(MARKER_SELECTOR)
            .into_iter()
            .filter_map(|element| {
                let marker = read_marker(&element)?;
                Some((element, marker))
            })
            .collect()
    }

    fn skeleton_root(&self) -> Option<Element> {
        self.select(SKELETON_CONTAINER_SELECTOR)
    }

    fn temporary_spacer(
        &self,
        id: &str,
        direction: BreakDirection,
        height: f64,
    ) -> Option<HtmlElement> {
        let element = logged(self.document.create_element("div"), "createElement")?;
        let spacer = element.dyn_into::<HtmlElement>().ok()?;
        logged(spacer.class_list().add_1(SPACER_CLASS), "classList.add")?;
        logged(spacer.dataset().set("bid", id), "dataset")?;

        let style = spacer.style();
        logged(style.set_property("width", "100%"), "style")?;
        logged(style.set_property("height", &px(height)), "style")?;
        if self.config.show_divider_debug {
            let color = match direction {
                BreakDirection::Before => DEBUG_BEFORE_BACKGROUND,
                BreakDirection::After => DEBUG_AFTER_BACKGROUND,
            };
            logged(style.set_property("background-color", color), "style")?;
        }
        Some(spacer)
    }
}

fn read_neighbor(element: Option<Element>) -> Option<Neighbor> {
    let element = element?.dyn_into::<HtmlElement>().ok()?;
    let spacer_for = element
        .class_list()
        .contains(SPACER_CLASS)
        .then(|| element.dataset().get("bid").unwrap_or_default());
    Some(Neighbor {
        spacer_for,
        top: element.offset_top() as f64,
    })
}

fn read_marker(element: &HtmlElement) -> Option<RenderedMarker> {
    let dataset = element.dataset();
    let id = dataset.get("bid")?;
    let direction = match dataset.get("break")?.as_str() {
        "before" => BreakDirection::Before,
        "after" => BreakDirection::After,
        other => {
            log::warn!("marker {} has unknown break direction {:?}", id, other);
            return None;
        }
    };
    let kind = match dataset.get("kind").as_deref() {
        Some("figure") | Some("1") => BreakKind::Figure,
        _ => BreakKind::PageBreak,
    };
    Some(RenderedMarker {
        id,
        direction,
        kind,
        top: element.offset_top() as f64,
        height: element.offset_height() as f64,
        previous: read_neighbor(element.previous_element_sibling()),
        next: read_neighbor(element.next_element_sibling()),
    })
}

impl LayoutSurface for DomSurface {
    fn markers(&self) -> Vec<RenderedMarker> {
        self.marker_elements().into_iter().map(|(_, marker)| marker).collect()
    }

    fn marker(&self, id: &str) -> Option<RenderedMarker> {
        self.marker_elements()
            .into_iter()
            .find(|(_, marker)| marker.id == id)
            .map(|(_, marker)| marker)
    }

    fn has_spacer(&self, id: &str) -> bool {
        !self.spacers(id).is_empty()
    }

    fn skeleton_container(&self) -> Option<SkeletonContainer> {
        let container = self.skeleton_root()?;
        let breaker = container
            .last_element_child()
            .and_then(|page| {
                logged(page.query_selector(BREAKER_SELECTOR), "querySelector").flatten()
            });
        let last_rect_bottom = breaker.as_ref().map(|b| b.get_bounding_client_rect().bottom());
        let last_edge = breaker
            .and_then(|b| b.dyn_into::<HtmlElement>().ok())
            .map(|b| (b.offset_top() + b.offset_height()) as f64);
        Some(SkeletonContainer {
            page_count: container.children().length() as usize,
            last_rect_bottom,
            last_edge,
        })
    }

    fn content_bottom(&self) -> Option<f64> {
        self.root
            .last_element_child()
            .map(|element| element.get_bounding_client_rect().bottom())
    }

    fn content_height(&self) -> f64 {
        self.root.scroll_height() as f64
    }

    fn set_spacer_height(&mut self, id: &str, height: f64) {
        for spacer in self.spacers(id) {
            let style = spacer.style();
            logged(style.set_property("min-height", &px(height)), "style");
            logged(style.set_property("height", &px(height)), "style");
        }
    }

    fn insert_spacer(&mut self, id: &str, direction: BreakDirection, height: f64) {
        let found = self.marker_elements().into_iter().find(|(_, marker)| marker.id == id);
        let Some((element, _)) = found else {
            log::warn!("no rendered marker {} to attach a spacer to", id);
            return;
        };
        let Some(parent) = element.parent_node() else {
            return;
        };
        let Some(spacer) = self.temporary_spacer(id, direction, height) else {
            return;
        };
        let reference = match direction {
            BreakDirection::Before => Some(Node::from(element)),
            BreakDirection::After => element.next_sibling(),
        };
        logged(parent.insert_before(&spacer, reference.as_ref()), "insertBefore");
    }

    fn append_skeletons(&mut self, count: usize) {
        let Some(container) = self.skeleton_root() else {
            return;
        };
        let Some(template) = container.last_element_child() else {
            log::warn!("skeleton container is empty, cannot provision pages");
            return;
        };
        for _ in 0..count {
            if let Some(page) = logged(template.clone_node_with_deep(true), "cloneNode") {
                logged(container.append_child(&page), "appendChild");
            }
        }
    }

    fn truncate_skeletons(&mut self, count: usize) {
        let Some(container) = self.skeleton_root() else {
            return;
        };
        while container.children().length() as usize > count {
            match container.last_element_child() {
                Some(page) => page.remove(),
                None => break,
            }
        }
    }

    fn set_min_height(&mut self, height: f64) {
        logged(self.root.style().set_property("min-height", &px(height)), "style");
    }
}
