use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::{mpsc, oneshot};
use futures::{select_biased, FutureExt, StreamExt};
use gloo_net::http::{Request, Response};
use learn_core::upload::{
    describe_http_failure, parse_upload_ack, progress_percent, FIELD_DRIVE_FILE_IDS, FIELD_FILES,
    FIELD_URLS, FIELD_WORKSPACE_ID,
};
use learn_core::{PickerTokenSource, SourceFile, TransportError, UploadBatch, UploadTransport};
use shared_types::{
    CreateWorkspaceRequest, CreateWorkspaceResponse, DriveAuthorizationResponse,
    PickerTokenResponse, SampleHitResponse, UploadAck,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use crate::config::api_base;
use crate::interop::BrowserFile;

fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

async fn http_failure(response: Response) -> TransportError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    describe_http_failure(status, &body)
}

async fn describe_http_error(response: Response) -> String {
    http_failure(response).await.to_string()
}

pub async fn create_workspace(
    access_token: &str,
    request: &CreateWorkspaceRequest,
) -> Result<CreateWorkspaceResponse, String> {
    let url = format!("{}/workspaces/create_workspace", api_base());

    let response = Request::post(&url)
        .header("Authorization", &bearer(access_token))
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {e}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))
}

pub async fn sample_hit(access_token: &str) -> Result<SampleHitResponse, String> {
    let url = format!("{}/sample_hit", api_base());

    let response = Request::post(&url)
        .header("Authorization", &bearer(access_token))
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JSON: {e}"))
}

async fn get_json<T: serde::de::DeserializeOwned>(
    path: &str,
    access_token: &str,
) -> Result<T, TransportError> {
    let url = format!("{}{}", api_base(), path);

    let response = Request::get(&url)
        .header("Authorization", &bearer(access_token))
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(http_failure(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

/// Backend endpoints behind the Drive picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackendClient;

#[async_trait(?Send)]
impl PickerTokenSource for BackendClient {
    async fn picker_token(&self, session_token: &str) -> Result<String, TransportError> {
        let data: PickerTokenResponse = get_json("/google/picker_token", session_token).await?;
        Ok(data.access_token)
    }

    async fn authorization_url(&self, session_token: &str) -> Result<String, TransportError> {
        let data: DriveAuthorizationResponse =
            get_json("/google/authorize", session_token).await?;
        Ok(data.authorization_url)
    }
}

// ── Multipart upload ──────────────────────────────────────────────────────────

/// Sends the whole batch as one multipart request through `XMLHttpRequest`,
/// which unlike `fetch` reports upload progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhrUploadTransport;

enum XhrOutcome {
    Loaded { status: u16, body: String },
    Failed(String),
}

fn build_form(batch: &UploadBatch<BrowserFile>) -> Result<FormData, TransportError> {
    let js_err = |e: wasm_bindgen::JsValue| TransportError::Network(format!("{e:?}"));
    let form = FormData::new().map_err(js_err)?;
    for (_, file) in &batch.files {
        form.append_with_blob_and_filename(FIELD_FILES, file.as_file(), &file.name())
            .map_err(js_err)?;
    }
    form.append_with_str(FIELD_URLS, &batch.urls_json())
        .map_err(js_err)?;
    form.append_with_str(FIELD_DRIVE_FILE_IDS, &batch.drive_file_ids_json())
        .map_err(js_err)?;
    form.append_with_str(FIELD_WORKSPACE_ID, &batch.workspace_id)
        .map_err(js_err)?;
    Ok(form)
}

#[async_trait(?Send)]
impl UploadTransport<BrowserFile> for XhrUploadTransport {
    async fn upload(
        &self,
        access_token: &str,
        batch: UploadBatch<BrowserFile>,
        on_progress: &dyn Fn(u8),
    ) -> Result<UploadAck, TransportError> {
        let js_err = |e: wasm_bindgen::JsValue| TransportError::Network(format!("{e:?}"));
        let url = format!("{}/workspaces/upload_sources", api_base());
        let form = build_form(&batch)?;

        let xhr = XmlHttpRequest::new().map_err(js_err)?;
        xhr.open_with_async("POST", &url, true).map_err(js_err)?;
        xhr.set_request_header("Authorization", &bearer(access_token))
            .map_err(js_err)?;

        let (progress_tx, mut progress_rx) = mpsc::unbounded::<u8>();
        let (done_tx, done_rx) = oneshot::channel::<XhrOutcome>();
        let done_tx = Rc::new(RefCell::new(Some(done_tx)));

        let on_upload_progress = Closure::wrap(Box::new(move |e: ProgressEvent| {
            if e.length_computable() {
                let _ = progress_tx.unbounded_send(progress_percent(e.loaded(), e.total()));
            }
        }) as Box<dyn FnMut(ProgressEvent)>);

        let load_tx = done_tx.clone();
        let load_xhr = xhr.clone();
        let on_load = Closure::wrap(Box::new(move || {
            let outcome = XhrOutcome::Loaded {
                status: load_xhr.status().unwrap_or(0),
                body: load_xhr.response_text().ok().flatten().unwrap_or_default(),
            };
            if let Some(tx) = load_tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        }) as Box<dyn FnMut()>);

        let error_tx = done_tx.clone();
        let on_error = Closure::wrap(Box::new(move || {
            if let Some(tx) = error_tx.borrow_mut().take() {
                let _ = tx.send(XhrOutcome::Failed("network error".to_string()));
            }
        }) as Box<dyn FnMut()>);

        xhr.upload()
            .map_err(js_err)?
            .set_onprogress(Some(on_upload_progress.as_ref().unchecked_ref()));
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        xhr.set_onabort(Some(on_error.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form)).map_err(js_err)?;

        let mut done = done_rx.fuse();
        let outcome = loop {
            select_biased! {
                percent = progress_rx.next() => {
                    if let Some(percent) = percent {
                        on_progress(percent);
                    }
                }
                outcome = done => break outcome,
            }
        };
        while let Ok(Some(percent)) = progress_rx.try_next() {
            on_progress(percent);
        }

        // handlers go away with the closures below
        if let Ok(upload) = xhr.upload() {
            upload.set_onprogress(None);
        }
        xhr.set_onload(None);
        xhr.set_onerror(None);
        xhr.set_onabort(None);
        drop((on_upload_progress, on_load, on_error));

        match outcome {
            Ok(XhrOutcome::Loaded { status, body }) if (200..300).contains(&status) => {
                parse_upload_ack(&body)
            }
            Ok(XhrOutcome::Loaded { status, body }) => Err(describe_http_failure(status, &body)),
            Ok(XhrOutcome::Failed(reason)) => Err(TransportError::Network(reason)),
            Err(_) => Err(TransportError::Network("upload was interrupted".to_string())),
        }
    }
}
