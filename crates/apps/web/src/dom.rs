//! Page contract lookup and DOM construction for the form controller.
//!
//! The markup itself is an external collaborator: the page ships the form,
//! the result and error containers, and the add-link control; this module
//! only locates them and builds the nodes the controller inserts.

use form::{display_label, download_name};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
};

pub const CREATE_FORM_ID: &str = "createForm";
pub const QR_CONTAINER_ID: &str = "qrContainer";
pub const ERROR_MESSAGE_ID: &str = "errorMessage";
pub const LINKS_CONTAINER_ID: &str = "links-container";
pub const ADD_LINK_ID: &str = "add-link-btn";

/// The submit control lives inside the form rather than carrying an id.
pub const SUBMIT_SELECTOR: &str = ".btn-generate";

const LABEL_PLACEHOLDER: &str = "Choice Label (e.g., Student Portal)";
const URL_PLACEHOLDER: &str = "https://example.com/student-form";

/// Problems detected while locating the page contract. Never recovered:
/// mount propagates them and the controller does not initialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    MissingElement(&'static str),
    WrongElementKind {
        id: &'static str,
        expected: &'static str,
    },
}

impl std::fmt::Display for MountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MountError::MissingElement(id) => write!(f, "page element `{id}` is missing"),
            MountError::WrongElementKind { id, expected } => {
                write!(f, "page element `{id}` is not a {expected} element")
            }
        }
    }
}

impl std::error::Error for MountError {}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// The pre-existing page elements the controller attaches to.
pub struct PageContract {
    pub form: HtmlFormElement,
    pub qr_container: Element,
    pub error_banner: HtmlElement,
    pub links_container: Element,
    pub add_link: Element,
    pub submit: HtmlButtonElement,
}

impl PageContract {
    /// Locates the contract elements. `Ok(None)` when the page carries no
    /// create form at all; the controller then stays inactive. Once the form
    /// exists, every other element is required.
    pub fn locate(document: &Document) -> Result<Option<Self>, MountError> {
        let Some(form) = document.get_element_by_id(CREATE_FORM_ID) else {
            return Ok(None);
        };
        let form = cast::<HtmlFormElement>(form, CREATE_FORM_ID, "form")?;

        let submit = form
            .query_selector(SUBMIT_SELECTOR)
            .ok()
            .flatten()
            .ok_or(MountError::MissingElement(SUBMIT_SELECTOR))?;
        let submit = cast::<HtmlButtonElement>(submit, SUBMIT_SELECTOR, "button")?;

        let error_banner = cast::<HtmlElement>(
            required(document, ERROR_MESSAGE_ID)?,
            ERROR_MESSAGE_ID,
            "html",
        )?;

        Ok(Some(PageContract {
            form,
            qr_container: required(document, QR_CONTAINER_ID)?,
            error_banner,
            links_container: required(document, LINKS_CONTAINER_ID)?,
            add_link: required(document, ADD_LINK_ID)?,
            submit,
        }))
    }
}

fn required(document: &Document, id: &'static str) -> Result<Element, MountError> {
    document
        .get_element_by_id(id)
        .ok_or(MountError::MissingElement(id))
}

fn cast<T: JsCast>(el: Element, id: &'static str, expected: &'static str) -> Result<T, MountError> {
    el.dyn_into::<T>()
        .map_err(|_| MountError::WrongElementKind { id, expected })
}

/// Builds one link-pair row: a label input and a url input, plus a remove
/// button when `removable`. Inputs are optional by contract, so neither
/// carries a `required` attribute.
pub fn build_link_row(
    document: &Document,
    removable: bool,
) -> Result<(Element, Option<HtmlButtonElement>), JsValue> {
    let row = document.create_element("div")?;
    row.set_class_name("link-pair");

    let group = document.create_element("div")?;
    group.set_class_name("form-group-link");
    group.append_child(&text_input(
        document,
        "text",
        "labels[]",
        "link-label",
        LABEL_PLACEHOLDER,
    )?.into())?;
    group.append_child(&text_input(
        document,
        "url",
        "urls[]",
        "link-url",
        URL_PLACEHOLDER,
    )?.into())?;
    row.append_child(&group)?;

    let remove = if removable {
        let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
        button.set_type("button");
        button.set_class_name("btn-remove-link");
        button.set_title("Remove Link");
        button.set_text_content(Some("X"));
        row.append_child(&button)?;
        Some(button)
    } else {
        None
    };

    Ok((row, remove))
}

fn text_input(
    document: &Document,
    kind: &str,
    name: &str,
    class: &str,
    placeholder: &str,
) -> Result<HtmlInputElement, JsValue> {
    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_type(kind);
    input.set_name(name);
    input.set_class_name(class);
    input.set_placeholder(placeholder);
    Ok(input)
}

/// Builds one result block: the generated image, its style label, and a
/// download link pointing at the same path.
pub fn build_result_block(document: &Document, path: &str) -> Result<Element, JsValue> {
    let block = document.create_element("div")?;
    block.set_class_name("qr-box");

    let img = document.create_element("img")?;
    img.set_attribute("src", path)?;
    img.set_attribute("alt", "Generated QR Code")?;
    block.append_child(&img)?;

    let caption = document.create_element("p")?;
    caption.set_text_content(Some(&format!("{} Style", display_label(path))));
    block.append_child(&caption)?;

    let download = document.create_element("a")?;
    download.set_class_name("btn-download");
    download.set_attribute("href", path)?;
    download.set_attribute("download", &download_name(path))?;
    download.set_text_content(Some("Download"));
    block.append_child(&download)?;

    Ok(block)
}

/// Builds the in-progress notice shown while the request is outstanding.
pub fn build_loading_notice(document: &Document) -> Result<Element, JsValue> {
    let notice = document.create_element("p")?;
    notice.set_class_name("loading-message");
    notice.set_text_content(Some(form::LOADING_TEXT));
    Ok(notice)
}

/// Builds the plain failure note rendered into the result container.
pub fn build_result_note(document: &Document, text: &str) -> Result<Element, JsValue> {
    let note = document.create_element("p")?;
    note.set_text_content(Some(text));
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::{MountError, SUBMIT_SELECTOR};

    #[test]
    fn mount_errors_name_the_element() {
        let missing = MountError::MissingElement(SUBMIT_SELECTOR);
        assert!(missing.to_string().contains(".btn-generate"));
        let wrong = MountError::WrongElementKind {
            id: "createForm",
            expected: "form",
        };
        assert!(wrong.to_string().contains("createForm"));
        assert!(wrong.to_string().contains("form"));
    }
}
