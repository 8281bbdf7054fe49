//! `PaginationPlus`: the browser entry point
//!
//! The host editor forwards its transactions and render notifications here and
//! renders whatever `decorations()` returns. Recompute requests go back to the
//! host through the `dispatch` callback as `{ kind: "recompute", ... }`
//! transactions; stabilization frames are scheduled with
//! `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::api::dom::DomSurface;
use crate::api::helpers::{deserialize, deserialize_or_default, serialize, to_js_error};
use crate::coordinator::StabilizationTicket;
use crate::error::PaginationError;
use crate::models::{Document, PaginationConfig};
use crate::session::PaginationSession;
use crate::transaction::Transaction;
use crate::{wasm_info, wasm_warn};

/// Class added to the editor root while pagination is active
pub const PAGINATED_CLASS: &str = "rm-with-pagination";

type DomSession = PaginationSession<DomSurface>;

#[wasm_bindgen]
pub struct PaginationPlus {
    session: Rc<RefCell<DomSession>>,
    dispatch: js_sys::Function,
}

#[wasm_bindgen]
impl PaginationPlus {
    /// `config` may be `undefined` for all defaults; `document` is the block
    /// list the editor currently shows.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: HtmlElement,
        config: JsValue,
        document: JsValue,
        dispatch: js_sys::Function,
    ) -> Result<PaginationPlus, JsValue> {
        let config: PaginationConfig = deserialize_or_default(config, "Invalid pagination config")?;
        let document: Document = deserialize(document, "Invalid document")?;

        root.class_list().add_1(PAGINATED_CLASS)?;
        let surface = DomSurface::new(root, config.clone()).map_err(to_js_error)?;
        let session = PaginationSession::new(config, document, surface).map_err(to_js_error)?;

        wasm_info!("PaginationPlus ready: {} pages", session.state().page_count());
        Ok(PaginationPlus {
            session: Rc::new(RefCell::new(session)),
            dispatch,
        })
    }

    /// Advance overlay state through a host transaction
    #[wasm_bindgen(js_name = applyTransaction)]
    pub fn apply_transaction(&self, transaction: JsValue) -> Result<(), JsValue> {
        let transaction: Transaction = deserialize(transaction, "Invalid transaction")?;
        self.session.borrow_mut().apply(transaction);
        Ok(())
    }

    /// Call after the host rendered the last applied transaction
    #[wasm_bindgen(js_name = viewUpdated)]
    pub fn view_updated(&self) -> Result<(), JsValue> {
        // Release the session before calling back into JS: dispatch re-enters
        // applyTransaction synchronously
        let (requests, frames) = {
            let mut session = self.session.borrow_mut();
            session.view_updated();
            (session.take_recompute_requests(), session.take_frames())
        };

        for ticket in frames {
            self.schedule_frame(ticket)?;
        }
        for request in requests {
            let transaction = serialize(
                &Transaction::Recompute(request),
                "Failed to serialize recompute request",
            )?;
            self.dispatch.call1(&JsValue::NULL, &transaction)?;
        }
        Ok(())
    }

    /// Merged overlay display list for the current state
    pub fn decorations(&self) -> Result<JsValue, JsValue> {
        serialize(&self.session.borrow().overlays(), "Failed to serialize overlays")
    }

    /// Overlay state (both collections and the version)
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serialize(self.session.borrow().state(), "Failed to serialize overlay state")
    }

    pub fn version(&self) -> f64 {
        self.session.borrow().state().version() as f64
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.session.borrow().state().page_count()
    }
}

impl PaginationPlus {
    fn schedule_frame(&self, ticket: StabilizationTicket) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| {
            to_js_error(PaginationError::Host("no window to schedule a frame on".to_string()))
        })?;

        let session = Rc::clone(&self.session);
        let callback = Closure::once_into_js(move || match session.try_borrow_mut() {
            Ok(mut session) => {
                session.run_stabilization(ticket);
            }
            Err(_) => wasm_warn!(
                "stabilization frame for version {} skipped: session busy",
                ticket.version
            ),
        });
        window.request_animation_frame(callback.unchecked_ref())?;
        Ok(())
    }
}
