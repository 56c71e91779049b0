use dioxus::prelude::*;
use learn_core::{PreviewFactory, PreviewHandle, SourceFile};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{window, DragEvent, EventTarget, MouseEvent};

// ── Files ─────────────────────────────────────────────────────────────────────

/// A browser `File` handle staged for upload.
#[derive(Debug, Clone)]
pub struct BrowserFile(web_sys::File);

impl BrowserFile {
    pub fn as_file(&self) -> &web_sys::File {
        &self.0
    }
}

impl From<web_sys::File> for BrowserFile {
    fn from(file: web_sys::File) -> Self {
        Self(file)
    }
}

impl SourceFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size().max(0.0) as u64
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }
}

fn collect_files(list: Option<web_sys::FileList>) -> Vec<BrowserFile> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(BrowserFile::from)
        .collect()
}

/// Image previews as object URLs. Every URL handed out is revoked on release.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectUrlPreviews;

impl PreviewFactory<BrowserFile> for ObjectUrlPreviews {
    fn create(&self, file: &BrowserFile) -> Option<PreviewHandle> {
        object_url_for(file.as_file()).map(PreviewHandle)
    }

    fn release(&self, handle: &PreviewHandle) {
        let _ = web_sys::Url::revoke_object_url(&handle.0);
    }
}

pub fn object_url_for(file: &web_sys::File) -> Option<String> {
    web_sys::Url::create_object_url_with_blob(file).ok()
}

/// Read the files chosen in a file input and reset it so the same file can be
/// picked again.
pub fn take_input_files(input_id: &str) -> Vec<BrowserFile> {
    let Some(input) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
    else {
        return Vec::new();
    };
    let files = collect_files(input.files());
    input.set_value("");
    files
}

/// Open the native file dialog behind a hidden input.
pub fn open_file_dialog(input_id: &str) {
    if let Some(input) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        input.click();
    }
}

// ── Listeners ─────────────────────────────────────────────────────────────────

/// Native listeners that stay attached until this value is dropped.
pub struct EventListeners {
    target: EventTarget,
    handlers: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

impl EventListeners {
    fn new(target: EventTarget) -> Self {
        Self {
            target,
            handlers: Vec::new(),
        }
    }

    fn on(mut self, event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = self
            .target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            dioxus_logger::tracing::warn!("failed to add {} listener: {:?}", event, e);
        }
        self.handlers.push((event, closure));
        self
    }
}

impl Drop for EventListeners {
    fn drop(&mut self) {
        for (event, closure) in &self.handlers {
            let _ = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Turn an element into a drop target for files. `on_hover` tracks whether a
/// drag is over the zone; `on_files` receives dropped files in order.
pub fn attach_drop_zone(
    element_id: &str,
    on_hover: Callback<bool>,
    on_files: Callback<Vec<BrowserFile>>,
) -> Option<EventListeners> {
    let element = window()?.document()?.get_element_by_id(element_id)?;
    let target: EventTarget = element.into();

    let listeners = EventListeners::new(target)
        .on("dragenter", move |e: web_sys::Event| {
            e.prevent_default();
            on_hover.call(true);
        })
        .on("dragover", move |e: web_sys::Event| {
            // required for the drop event to fire
            e.prevent_default();
        })
        .on("dragleave", move |_e: web_sys::Event| {
            on_hover.call(false);
        })
        .on("drop", move |e: web_sys::Event| {
            e.prevent_default();
            on_hover.call(false);
            let files = e
                .dyn_ref::<DragEvent>()
                .and_then(|drag| drag.data_transfer())
                .map(|transfer| collect_files(transfer.files()))
                .unwrap_or_default();
            if !files.is_empty() {
                on_files.call(files);
            }
        });
    Some(listeners)
}

/// Document-level pointer tracking for a drag resizer. `on_move` receives
/// `(body_width, client_x)`; `on_release` fires on mouse up.
pub fn attach_resize_tracking(
    on_move: Callback<(i32, i32)>,
    on_release: Callback<()>,
) -> Option<EventListeners> {
    let document = window()?.document()?;
    let target: EventTarget = document.clone().into();

    let listeners = EventListeners::new(target)
        .on("mousemove", move |e: web_sys::Event| {
            let Some(mouse) = e.dyn_ref::<MouseEvent>() else {
                return;
            };
            let body_width = document.body().map(|b| b.client_width()).unwrap_or(0);
            on_move.call((body_width, mouse.client_x()));
        })
        .on("mouseup", move |_e: web_sys::Event| {
            on_release.call(());
        });
    Some(listeners)
}

// ── Location ──────────────────────────────────────────────────────────────────

/// `location.search`, including the leading `?` when present.
pub fn current_query() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

pub fn current_origin() -> String {
    window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Full-page navigation, used for OAuth redirects.
pub fn redirect_to(url: &str) -> Result<(), String> {
    let window = window().ok_or("no global `window` exists")?;
    window
        .location()
        .set_href(url)
        .map_err(|e| format!("Failed to navigate: {e:?}"))
}

/// Drop the query string from the address bar without reloading.
pub fn clear_query_string() {
    let Some(window) = window() else {
        return;
    };
    let Ok(path) = window.location().pathname() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }
}
