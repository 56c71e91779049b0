//! Step 2: stage local files, URLs and Google Drive documents, then upload
//! them to the workspace as one batch.

use std::rc::Rc;

use dioxus::prelude::*;
use learn_core::drive::{fetch_picker_token, pick_documents, DriveConnection};
use learn_core::upload::submit_sources;
use learn_core::{
    size_label, CollectorAccess, DrivePickerState, FileKind, PendingSource, PickerError,
    PickerTokenSource, PickerWidget, SourceCollector, SourceId,
};

use crate::api::{BackendClient, XhrUploadTransport};
use crate::auth::AuthState;
use crate::config::app_config;
use crate::interop::{
    attach_drop_zone, clear_query_string, current_query, open_file_dialog, redirect_to,
    take_input_files, BrowserFile, EventListeners, ObjectUrlPreviews,
};
use crate::picker::GooglePicker;
use crate::AppContext;

const DROP_ZONE_ID: &str = "source-drop-zone";
const FILE_INPUT_ID: &str = "source-file-input";

/// Lets the core submit flow write through a Dioxus signal.
#[derive(Clone, Copy)]
struct CollectorSignal(Signal<SourceCollector<BrowserFile>>);

impl CollectorAccess<BrowserFile> for CollectorSignal {
    fn with_collector<R>(&self, f: impl FnOnce(&mut SourceCollector<BrowserFile>) -> R) -> R {
        let mut signal = self.0;
        let mut collector = signal.write();
        f(&mut collector)
    }
}

fn kind_icon(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Image => "🖼️",
        FileKind::Pdf => "📕",
        FileKind::Document => "📄",
        FileKind::Spreadsheet => "📊",
        FileKind::Presentation => "📽️",
        FileKind::File => "📁",
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CardSource {
    Local(SourceId),
    Drive(String),
}

/// Owned render data for one grid card.
#[derive(Debug, Clone, PartialEq)]
struct SourceCard {
    key: String,
    source: CardSource,
    name: String,
    icon: &'static str,
    detail: String,
    preview: Option<String>,
    progress: u8,
}

impl SourceCard {
    fn from_pending(entry: PendingSource<'_, BrowserFile>) -> Option<Self> {
        let key = entry.key();
        match entry {
            PendingSource::LocalFile(file) => Some(Self {
                key,
                source: CardSource::Local(file.id.clone()),
                name: file.name.clone(),
                icon: kind_icon(file.kind()),
                detail: format!("{} · {}", file.kind().label(), size_label(file.size)),
                preview: file.preview().map(|p| p.0.clone()),
                progress: file.progress(),
            }),
            PendingSource::DriveReference(doc) => Some(Self {
                key,
                source: CardSource::Drive(doc.id.clone()),
                name: doc.name.clone(),
                icon: kind_icon(doc.kind()),
                detail: format!("{} · Google Drive", doc.kind().label()),
                preview: None,
                progress: doc.progress(),
            }),
            PendingSource::RemoteUrl(_) => None,
        }
    }
}

#[component]
pub fn Step2(
    workspace_id: String,
    allow_back: bool,
    on_back: EventHandler<()>,
    on_uploaded: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<AuthState>>();
    let onboarding = &app_config().onboarding;

    let mut collector = use_signal({
        let store = ctx.store.clone();
        move || {
            SourceCollector::new(
                &app_config().onboarding,
                store,
                Rc::new(ObjectUrlPreviews),
            )
        }
    });
    let mut drive = use_signal({
        let store = ctx.store.clone();
        move || {
            let mut state =
                DrivePickerState::restore(store.as_ref(), app_config().onboarding.drive_mime_filter());
            // back from the Drive OAuth redirect
            if state.apply_return_params(&current_query(), store.as_ref()) {
                clear_query_string();
            }
            state
        }
    });
    let picker = use_hook(|| GooglePicker {
        developer_key: app_config().google_developer_key.clone(),
        app_id: app_config().google_app_id.clone(),
    });

    let mut url_input = use_signal(String::new);
    let mut url_error = use_signal(|| None::<String>);
    let mut submit_error = use_signal(|| None::<(bool, String)>);
    let mut hovering = use_signal(|| false);
    let mut drop_listeners = use_signal(|| None::<EventListeners>);

    // Load the picker script once.
    {
        let picker = picker.clone();
        use_hook(move || {
            spawn(async move {
                match picker.load().await {
                    Ok(()) => drive.write().mark_ready(),
                    Err(e) => {
                        dioxus_logger::tracing::warn!("Google Picker failed to load: {}", e);
                        drive.write().mark_load_failed(&e);
                    }
                }
            });
        });
    }

    // Exchange the session bearer for a picker token whenever the session changes.
    use_effect(move || {
        let session_token = auth.read().access_token();
        let Some(session_token) = session_token else {
            if drive.peek().has_access_token() {
                drive.write().session_ended();
            }
            return;
        };
        if !drive.peek().needs_token_refresh(Some(&session_token)) {
            return;
        }
        spawn(async move {
            match fetch_picker_token(&BackendClient, &session_token).await {
                Ok(token) => drive.write().set_access_token(&session_token, token),
                Err(e) => {
                    dioxus_logger::tracing::warn!("Picker token exchange failed: {}", e);
                    drive.write().token_refresh_failed(&e);
                }
            }
        });
    });

    let on_hover = use_callback(move |over: bool| hovering.set(over));
    let on_dropped = use_callback(move |files: Vec<BrowserFile>| {
        if collector.peek().is_uploading() {
            return;
        }
        let added = collector.write().add_local_files(files);
        dioxus_logger::tracing::info!("dropped {} file(s)", added.len());
    });

    let on_browse_change = move |_| {
        let files = take_input_files(FILE_INPUT_ID);
        if collector.peek().is_uploading() {
            return;
        }
        if !files.is_empty() {
            collector.write().add_local_files(files);
        }
    };

    let add_url = move |evt: FormEvent| {
        evt.prevent_default();
        let candidate = url_input.read().clone();
        match collector.write().add_url(&candidate) {
            Ok(()) => {
                url_input.set(String::new());
                url_error.set(None);
            }
            Err(e) => url_error.set(Some(e.to_string())),
        }
    };

    let connect_drive = move |_| {
        let Some(session_token) = auth.read().access_token() else {
            return;
        };
        spawn(async move {
            let result = BackendClient
                .authorization_url(&session_token)
                .await
                .map_err(|e| e.to_string())
                .and_then(|url| redirect_to(&url));
            if let Err(e) = result {
                dioxus_logger::tracing::warn!("Drive authorization failed: {}", e);
                drive.write().report(&PickerError::Authorization(e));
            }
        });
    };

    let disconnect_drive = {
        let store = ctx.store.clone();
        move |_| drive.write().disconnect(store.as_ref())
    };

    let pick_from_drive = {
        let picker = picker.clone();
        move |_| {
            let picker = picker.clone();
            spawn(async move {
                let state = drive.peek().clone();
                match pick_documents(&state, &picker).await {
                    Ok(docs) => {
                        let added = collector.write().add_drive_references(docs);
                        dioxus_logger::tracing::info!("picked {} new drive file(s)", added);
                    }
                    Err(e) => {
                        dioxus_logger::tracing::warn!("Drive pick failed: {}", e);
                        drive.write().report(&e);
                    }
                }
            });
        }
    };

    let upload = {
        let workspace_id = workspace_id.clone();
        move |_| {
            let Some(session_token) = auth.read().access_token() else {
                submit_error.set(Some((true, "Your session has expired. Please sign in again.".into())));
                return;
            };
            let workspace_id = workspace_id.clone();
            submit_error.set(None);
            spawn(async move {
                let access = CollectorSignal(collector);
                match submit_sources(&access, &XhrUploadTransport, &session_token, &workspace_id)
                    .await
                {
                    Ok(ack) => {
                        dioxus_logger::tracing::info!(
                            "sources uploaded (batch {:?})",
                            ack.batch_id
                        );
                        on_uploaded.call(());
                    }
                    Err(e) => {
                        submit_error.set(Some((e.is_validation(), e.to_string())));
                    }
                }
            });
        }
    };

    // ── View data ─────────────────────────────────────────────────────────────

    let (cards, urls, summary, uploading, percent, empty) = {
        let c = collector.read();
        let cards: Vec<SourceCard> = c
            .paginate()
            .into_iter()
            .filter_map(SourceCard::from_pending)
            .collect();
        let percent = c.pending_sources().map(|p| p.progress()).max().unwrap_or(0);
        (
            cards,
            c.urls().to_vec(),
            c.page_summary(),
            c.is_uploading(),
            percent,
            c.is_empty(),
        )
    };
    let drive_state = drive.read().clone();
    let max_mb = onboarding.max_file_megabytes();

    rsx! {
        div {
            class: "onboarding-form",
            h2 { class: "onboarding-title", "Add your sources" }
            p {
                class: "form-note",
                "Files up to {max_mb} MB, web pages, and Google Drive documents. Everything uploads together."
            }

            // Drop zone
            div {
                id: DROP_ZONE_ID,
                class: if hovering() { "drop-zone hovering" } else { "drop-zone" },
                "data-testid": "drop-zone",
                onmounted: move |_| drop_listeners.set(attach_drop_zone(DROP_ZONE_ID, on_hover, on_dropped)),
                onclick: move |_| {
                    if !collector.peek().is_uploading() {
                        open_file_dialog(FILE_INPUT_ID);
                    }
                },
                div { class: "drop-zone-icon", "⬆️" }
                p { class: "drop-zone-title", "Drag and drop files here" }
                p { class: "form-note", "or click to browse" }
                input {
                    id: FILE_INPUT_ID,
                    r#type: "file",
                    multiple: true,
                    style: "display: none;",
                    onclick: move |e| e.stop_propagation(),
                    onchange: on_browse_change,
                }
            }

            // URLs
            form {
                class: "url-form",
                onsubmit: add_url,
                input {
                    class: "form-input",
                    "data-testid": "url-input",
                    r#type: "text",
                    placeholder: "https://example.com/article",
                    value: "{url_input}",
                    disabled: uploading,
                    oninput: move |e| url_input.set(e.value()),
                }
                button { class: "btn", r#type: "submit", disabled: uploading, "Add URL" }
            }
            if let Some(err) = url_error.read().as_deref() {
                p { class: "form-error", "data-testid": "url-error", "{err}" }
            }
            if !urls.is_empty() {
                ul {
                    class: "url-list",
                    for (index, url) in urls.into_iter().enumerate() {
                        li {
                            key: "{index}-{url}",
                            class: "url-item",
                            span { class: "url-text", "🔗 {url}" }
                            button {
                                class: "btn-icon",
                                title: "Remove",
                                disabled: uploading,
                                onclick: move |_| {
                                    collector.write().remove_url(index);
                                },
                                "✕"
                            }
                        }
                    }
                }
            }

            // Google Drive
            div {
                class: "drive-panel",
                "data-testid": "drive-panel",
                span { class: "drive-title", "Google Drive" }
                match drive_state.connection() {
                    DriveConnection::Connected => rsx! {
                        button {
                            class: "btn",
                            "data-testid": "drive-pick",
                            disabled: uploading || !drive_state.can_open(),
                            onclick: pick_from_drive,
                            if drive_state.is_ready() { "Pick from Google Drive" } else { "Loading Google Drive…" }
                        }
                        button { class: "btn btn-ghost", onclick: disconnect_drive, "Disconnect" }
                    },
                    DriveConnection::NeverConnected | DriveConnection::Failed { .. } => rsx! {
                        button {
                            class: "btn",
                            "data-testid": "drive-connect",
                            disabled: uploading,
                            onclick: connect_drive,
                            "Connect Google Drive"
                        }
                    },
                }
            }
            if let Some(err) = drive_state.error() {
                div {
                    class: "inline-alert",
                    "data-testid": "drive-error",
                    span { "{err}" }
                    button {
                        class: "btn-icon",
                        onclick: move |_| drive.write().dismiss_error(),
                        "✕"
                    }
                }
            }

            // Staged files
            if !cards.is_empty() {
                div {
                    class: "source-grid",
                    for card in cards {
                        SourceCardView {
                            key: "{card.key}",
                            card: card.clone(),
                            uploading,
                            on_remove: move |source: CardSource| {
                                let mut c = collector.write();
                                match source {
                                    CardSource::Local(id) => c.remove_local_file(&id),
                                    CardSource::Drive(id) => c.remove_drive_reference(&id),
                                };
                            },
                        }
                    }
                }
                div {
                    class: "pager",
                    span { class: "form-note", "Showing {summary.from} to {summary.to} of {summary.total}" }
                    button {
                        class: "btn btn-ghost",
                        disabled: summary.page <= 1,
                        onclick: move |_| collector.write().previous_page(),
                        "Previous"
                    }
                    span { class: "form-note", "Page {summary.page} of {summary.pages}" }
                    button {
                        class: "btn btn-ghost",
                        disabled: summary.page >= summary.pages,
                        onclick: move |_| collector.write().next_page(),
                        "Next"
                    }
                }
            }

            if let Some((is_validation, message)) = submit_error.read().clone() {
                div {
                    class: if is_validation { "form-error" } else { "alert" },
                    role: "alert",
                    "data-testid": "upload-error",
                    span { "{message}" }
                    button { class: "btn-icon", onclick: move |_| submit_error.set(None), "✕" }
                }
            }

            div {
                class: "form-actions",
                if allow_back {
                    button {
                        class: "btn btn-ghost",
                        disabled: uploading,
                        onclick: move |_| on_back.call(()),
                        "Back"
                    }
                }
                button {
                    class: "btn btn-primary",
                    "data-testid": "upload-sources",
                    disabled: uploading || empty,
                    onclick: upload,
                    if uploading { "Uploading… {percent}%" } else { "Upload and continue" }
                }
            }
        }
    }
}

#[component]
fn SourceCardView(card: SourceCard, uploading: bool, on_remove: EventHandler<CardSource>) -> Element {
    let show_progress = uploading || card.progress > 0;
    let source = card.source.clone();
    rsx! {
        div {
            class: "source-card",
            "data-testid": "source-card",
            if let Some(preview) = card.preview.as_deref() {
                img { class: "source-preview", src: "{preview}", alt: "{card.name}" }
            } else {
                div { class: "source-icon", "{card.icon}" }
            }
            div { class: "source-name", title: "{card.name}", "{card.name}" }
            div { class: "form-note", "{card.detail}" }
            if show_progress {
                div {
                    class: "progress",
                    div { class: "progress-bar", style: "width: {card.progress}%;" }
                }
            }
            button {
                class: "btn-icon source-remove",
                title: "Remove",
                disabled: uploading,
                onclick: move |_| on_remove.call(source.clone()),
                "✕"
            }
        }
    }
}
