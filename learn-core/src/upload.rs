//! Upload orchestration: one batched multipart request per submit.

use std::cell::RefCell;

use async_trait::async_trait;
use shared_types::{ErrorBody, UploadAck};

use crate::collector::{SourceCollector, SourceFile, SourceId};
use crate::error::{SubmitError, TransportError};

/// Multipart field names the backend reads.
pub const FIELD_FILES: &str = "files";
pub const FIELD_URLS: &str = "urls";
pub const FIELD_DRIVE_FILE_IDS: &str = "drive_file_ids";
pub const FIELD_WORKSPACE_ID: &str = "workspace_id";

/// Everything one submit sends, snapshotted from the collector.
#[derive(Debug, Clone)]
pub struct UploadBatch<F> {
    pub workspace_id: String,
    pub files: Vec<(SourceId, F)>,
    pub urls: Vec<String>,
    pub drive_file_ids: Vec<String>,
}

impl<F> UploadBatch<F> {
    pub fn urls_json(&self) -> String {
        serde_json::to_string(&self.urls).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn drive_file_ids_json(&self) -> String {
        serde_json::to_string(&self.drive_file_ids).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn item_count(&self) -> usize {
        self.files.len() + self.urls.len() + self.drive_file_ids.len()
    }
}

/// Sends a batch and reports one aggregate percentage while bytes go out.
#[async_trait(?Send)]
pub trait UploadTransport<F> {
    async fn upload(
        &self,
        access_token: &str,
        batch: UploadBatch<F>,
        on_progress: &dyn Fn(u8),
    ) -> Result<UploadAck, TransportError>;
}

/// Lets the submit flow reach a collector that lives in some reactive cell
/// without holding a borrow across the network await.
pub trait CollectorAccess<F> {
    fn with_collector<R>(&self, f: impl FnOnce(&mut SourceCollector<F>) -> R) -> R;
}

impl<F> CollectorAccess<F> for RefCell<SourceCollector<F>> {
    fn with_collector<R>(&self, f: impl FnOnce(&mut SourceCollector<F>) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Validate, send one request, then clear on success or keep everything on failure.
///
/// Validation errors return before the transport is touched.
pub async fn submit_sources<F, A, T>(
    access: &A,
    transport: &T,
    access_token: &str,
    workspace_id: &str,
) -> Result<UploadAck, SubmitError>
where
    F: SourceFile,
    A: CollectorAccess<F>,
    T: UploadTransport<F> + ?Sized,
{
    let batch = access.with_collector(|c| c.prepare_upload(workspace_id))?;
    tracing::info!(
        workspace_id,
        files = batch.files.len(),
        urls = batch.urls.len(),
        drive_files = batch.drive_file_ids.len(),
        "submitting source batch"
    );

    let on_progress = |percent: u8| access.with_collector(|c| c.apply_progress(percent));
    match transport.upload(access_token, batch, &on_progress).await {
        Ok(ack) => {
            access.with_collector(|c| c.complete_upload());
            Ok(ack)
        }
        Err(e) => {
            tracing::warn!(workspace_id, error = %e, "source batch upload failed");
            access.with_collector(|c| c.abort_upload());
            Err(SubmitError::Transport(e))
        }
    }
}

/// Integer percentage from a progress event, clamped to 0..=100.
pub fn progress_percent(loaded: f64, total: f64) -> u8 {
    if !(total > 0.0) || !loaded.is_finite() {
        return 0;
    }
    ((loaded / total) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Map a non-success response to a transport error, keeping the server's detail.
pub fn describe_http_failure(status: u16, body: &str) -> TransportError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.summary())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<'))
                .then(|| trimmed.to_string())
        });
    TransportError::Http { status, detail }
}

/// Decode a success body; an empty body is a bare acknowledgement.
pub fn parse_upload_ack(body: &str) -> Result<UploadAck, TransportError> {
    if body.trim().is_empty() {
        return Ok(UploadAck::default());
    }
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent_bounds() {
        assert_eq!(progress_percent(0.0, 0.0), 0);
        assert_eq!(progress_percent(50.0, 200.0), 25);
        assert_eq!(progress_percent(300.0, 200.0), 100);
        assert_eq!(progress_percent(f64::NAN, 10.0), 0);
    }

    #[test]
    fn http_failure_keeps_detail() {
        let err = describe_http_failure(400, r#"{"detail":"Workspace not found"}"#);
        assert_eq!(err.user_message(), "Workspace not found");

        let err = describe_http_failure(502, "<html>Bad gateway</html>");
        assert_eq!(
            err,
            TransportError::Http {
                status: 502,
                detail: None
            }
        );

        let err = describe_http_failure(500, "database exploded");
        assert_eq!(err.user_message(), "database exploded");
    }

    #[test]
    fn empty_success_body_is_ack() {
        assert_eq!(parse_upload_ack("").unwrap(), UploadAck::default());
        let ack = parse_upload_ack(r#"{"status":200,"batch_id":"b1"}"#).unwrap();
        assert_eq!(ack.batch_id.as_deref(), Some("b1"));
        assert!(parse_upload_ack("nope").is_err());
    }

    #[test]
    fn batch_serializes_lists_as_json_arrays() {
        let batch: UploadBatch<()> = UploadBatch {
            workspace_id: "ws".into(),
            files: Vec::new(),
            urls: vec!["https://a.dev".into()],
            drive_file_ids: vec!["d1".into(), "d2".into()],
        };
        assert_eq!(batch.urls_json(), r#"["https://a.dev"]"#);
        assert_eq!(batch.drive_file_ids_json(), r#"["d1","d2"]"#);
        assert_eq!(batch.item_count(), 3);
    }
}
