//! Form controller for the QR-code creation page.
//!
//! Manages the dynamic list of label/URL input rows, submits the form to
//! `/create` without navigating, and renders the returned images or errors
//! into the page's result and error containers. The page markup and the
//! endpoint are external collaborators; see [`dom`] for the element contract.

use std::cell::RefCell;
use std::collections::BTreeMap;

use form::{LinkList, RowId, SubmitGuard, SubmitOutcome};
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, FormData};

mod dom;
use dom::PageContract;

/// Submit-control label while a request is outstanding.
const SUBMIT_BUSY_LABEL: &str = "Generating...";

/// Fallback idle label, used when the page ships a submit control with no
/// text of its own.
const SUBMIT_IDLE_LABEL: &str = "Generate QR Codes";

struct Controller {
    page: PageContract,
    /// Submit-control text captured at mount, restored after every cycle.
    idle_label: String,
    links: LinkList,
    guard: SubmitGuard,
    /// One click listener per removable row, keyed by row id.
    row_listeners: BTreeMap<u64, Closure<dyn FnMut(Event)>>,
    /// Listeners whose rows were removed mid-call; dropped at the next reset.
    retired_listeners: Vec<Closure<dyn FnMut(Event)>>,
}

thread_local! {
    static CONTROLLER: RefCell<Option<Controller>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Attaches the controller to the current page. Invoked once by the page
/// when the view loads.
///
/// A page without the create form gets no controller at all; once the form
/// exists, a missing contract element is an error and nothing is wired up.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    let document = document()?;
    let Some(page) = PageContract::locate(&document)? else {
        return Ok(());
    };

    // Guard against double-initialization (relevant during hot reload).
    if CONTROLLER.with(|cell| cell.borrow().is_some()) {
        return Ok(());
    }

    let idle_label = page
        .submit
        .text_content()
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| SUBMIT_IDLE_LABEL.to_string());

    let on_submit = Closure::<dyn FnMut(Event)>::new(|event: Event| handle_submit(&event));
    page.form
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    let on_add = Closure::<dyn FnMut(Event)>::new(|_event: Event| {
        if let Err(err) = with_controller(|ctl, document| ctl.add_pair(document, false)) {
            report("adding a link row failed", &err);
        }
    });
    page.add_link
        .add_event_listener_with_callback("click", on_add.as_ref().unchecked_ref())?;
    on_add.forget();

    CONTROLLER.with(|cell| {
        *cell.borrow_mut() = Some(Controller {
            page,
            idle_label,
            links: LinkList::new(),
            guard: SubmitGuard::new(),
            row_listeners: BTreeMap::new(),
            retired_listeners: Vec::new(),
        });
    });

    // One row is present from the start; it carries no remove affordance.
    with_controller(|ctl, document| ctl.add_pair(document, true))
}

impl Controller {
    fn add_pair(&mut self, document: &Document, initial: bool) -> Result<(), JsValue> {
        let id = self.links.add_pair(initial);
        self.attach_row(document, id, !initial)
    }

    /// Clears the list and restores the single starting row. Runs after a
    /// successful submission.
    fn reset_links(&mut self, document: &Document) -> Result<(), JsValue> {
        self.page.links_container.set_inner_html("");
        self.row_listeners.clear();
        self.retired_listeners.clear();
        let id = self.links.reset();
        self.attach_row(document, id, false)
    }

    fn attach_row(
        &mut self,
        document: &Document,
        id: RowId,
        removable: bool,
    ) -> Result<(), JsValue> {
        let (row, remove_button) = dom::build_link_row(document, removable)?;
        if let Some(button) = remove_button {
            let handle = row.clone();
            let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                remove_pair(id, &handle);
            });
            button.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            self.row_listeners.insert(id.0, listener);
        }
        self.page.links_container.append_child(&row)?;
        Ok(())
    }

    /// In-progress side effects: loading notice, hidden error banner,
    /// disabled and relabeled submit control. Returns the form snapshot the
    /// request will carry.
    fn enter_submitting(&mut self, document: &Document) -> Result<FormData, JsValue> {
        self.page.qr_container.set_inner_html("");
        self.page
            .qr_container
            .append_child(&dom::build_loading_notice(document)?.into())?;
        self.hide_error()?;
        self.page.submit.set_disabled(true);
        self.page.submit.set_text_content(Some(SUBMIT_BUSY_LABEL));
        FormData::new_with_form(&self.page.form)
    }

    /// Reverses the in-progress side effects. Runs on every exit path.
    fn finish_submit(&mut self) {
        self.guard.finish();
        self.page.submit.set_disabled(false);
        self.page.submit.set_text_content(Some(&self.idle_label));
    }

    fn apply_outcome(
        &mut self,
        document: &Document,
        outcome: &SubmitOutcome,
    ) -> Result<(), JsValue> {
        match outcome {
            SubmitOutcome::Success { qr_paths } => {
                self.page.qr_container.set_inner_html("");
                for path in qr_paths {
                    let block = dom::build_result_block(document, path)?;
                    self.page.qr_container.append_child(&block)?;
                }
                self.page.form.reset();
                self.reset_links(document)?;
            }
            failure => {
                if let SubmitOutcome::TransportFailure { detail } = failure {
                    report("submission failed", &JsValue::from_str(detail));
                }
                if let Some(note) = failure.result_note() {
                    self.page.qr_container.set_inner_html("");
                    self.page
                        .qr_container
                        .append_child(&dom::build_result_note(document, note)?.into())?;
                }
                if let Some(text) = failure.banner_text() {
                    self.show_error(text)?;
                }
            }
        }
        Ok(())
    }

    fn show_error(&self, text: &str) -> Result<(), JsValue> {
        self.page.error_banner.set_text_content(Some(text));
        self.page
            .error_banner
            .style()
            .set_property("display", "block")
    }

    fn hide_error(&self) -> Result<(), JsValue> {
        self.page.error_banner.set_text_content(None);
        self.page
            .error_banner
            .style()
            .set_property("display", "none")
    }
}

fn handle_submit(event: &Event) {
    // Submission is handled here; never navigate.
    event.prevent_default();

    let form_data = match begin_submit() {
        Ok(Some(data)) => data,
        // A submission is already outstanding.
        Ok(None) => return,
        Err(err) => {
            report("starting the submission failed", &err);
            return;
        }
    };

    spawn_local(async move {
        let outcome = send_create(form_data).await;
        conclude_submit(&outcome);
    });
}

/// Applies the in-progress side effects and snapshots the form. `None` when
/// the guard refuses because a request is already in flight.
fn begin_submit() -> Result<Option<FormData>, JsValue> {
    with_controller(|ctl, document| {
        if !ctl.guard.begin() {
            return Ok(None);
        }
        match ctl.enter_submitting(document) {
            Ok(data) => Ok(Some(data)),
            Err(err) => {
                // Reverse the partial side effects before propagating.
                ctl.finish_submit();
                Err(err)
            }
        }
    })
}

/// One request per submission; the await is the page's only suspension
/// point. Send and decode failures fold into the transport outcome.
async fn send_create(body: FormData) -> SubmitOutcome {
    let request = match Request::post(form::CREATE_ENDPOINT).body(body) {
        Ok(request) => request,
        Err(err) => return SubmitOutcome::transport(err.to_string()),
    };
    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => return SubmitOutcome::transport(err.to_string()),
    };
    match response.text().await {
        Ok(text) => form::classify_response(&text),
        Err(err) => SubmitOutcome::transport(err.to_string()),
    }
}

fn conclude_submit(outcome: &SubmitOutcome) {
    let rendered = with_controller(|ctl, document| ctl.apply_outcome(document, outcome));
    // Cleanup is unconditional: the control is re-enabled and its label
    // restored even when rendering the outcome failed.
    let cleaned = with_controller(|ctl, _document| {
        ctl.finish_submit();
        Ok(())
    });
    if let Err(err) = rendered {
        report("rendering the submission outcome failed", &err);
    }
    if let Err(err) = cleaned {
        report("submit cleanup failed", &err);
    }
}

fn remove_pair(id: RowId, row: &Element) {
    let removed = with_controller(|ctl, _document| {
        if !ctl.links.remove(id) {
            return Ok(());
        }
        row.remove();
        // This listener is the one executing right now; park it instead of
        // dropping it.
        if let Some(listener) = ctl.row_listeners.remove(&id.0) {
            ctl.retired_listeners.push(listener);
        }
        Ok(())
    });
    if let Err(err) = removed {
        report("removing a link row failed", &err);
    }
}

fn with_controller<R>(
    f: impl FnOnce(&mut Controller, &Document) -> Result<R, JsValue>,
) -> Result<R, JsValue> {
    let document = document()?;
    CONTROLLER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let ctl = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("form controller is not mounted"))?;
        f(ctl, &document)
    })
}

fn document() -> Result<Document, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    window
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))
}

fn report(context: &str, err: &JsValue) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{context}: {err:?}")));
}
