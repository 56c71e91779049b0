use thiserror::Error;

/// Shown when the server gave us nothing better to say.
pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed. Please try again.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("\"{candidate}\" is not a valid http(s) URL")]
    InvalidUrl { candidate: String },
    #[error("Sources can't be changed while an upload is in progress.")]
    UploadInProgress,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Network(String),
    #[error("{}", http_message(.status, .detail))]
    Http { status: u16, detail: Option<String> },
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

fn http_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("HTTP error: {status} ({detail})"),
        None => format!("HTTP error: {status}"),
    }
}

impl TransportError {
    /// Text for the user-visible alert: the server's detail when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_UPLOAD_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Add at least one file, URL, or Google Drive document before uploading.")]
    EmptySelection,
    #[error("These files exceed the {limit_mb} MB limit: {}", .files.join(", "))]
    OversizedFiles { files: Vec<String>, limit_mb: u64 },
    #[error("An upload is already in progress.")]
    UploadInProgress,
    #[error("{}", .0.user_message())]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Validation failures happen before anything is sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmitError::EmptySelection | SubmitError::OversizedFiles { .. }
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("Google Drive picker is still loading.")]
    NotReady,
    #[error("Connect Google Drive before picking files.")]
    NotConnected,
    #[error("Google Drive access token is not available yet.")]
    MissingToken,
    #[error("Failed to load Google Drive picker: {0}")]
    LoadFailed(String),
    #[error("Google Drive picker failed: {0}")]
    Widget(String),
    #[error("Google Drive token exchange failed: {0}")]
    TokenExchange(String),
    #[error("Google Drive connection failed: {0}")]
    Authorization(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("failed to encode value for key {key}: {reason}")]
    Encode { key: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to parse onboarding config: {0}")]
    Parse(String),
    #[error("invalid onboarding config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization code missing")]
    MissingCode,
    #[error("code exchange failed: {0}")]
    Exchange(String),
    #[error("auth provider error: {0}")]
    Provider(String),
}
