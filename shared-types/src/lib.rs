//! Shared types between the onboarding front-end and the backend
//!
//! These types are used by both:
//! - `learn-core` state machines (native Rust, tested off-browser)
//! - `learn-web` Dioxus components (WASM)
//!
//! Serializable with serde for JSON over HTTP and for the browser's localStorage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Workspaces
// ============================================================================

/// Body of `POST /workspaces/create_workspace`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct CreateWorkspaceRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Project topic must be between 3 and 100 characters."
    ))]
    pub topic: String,
}

impl CreateWorkspaceRequest {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateWorkspaceResponse {
    #[serde(alias = "id", alias = "_id")]
    pub workspace_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Acknowledgement returned by `POST /workspaces/upload_sources`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAck {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub source_ids: Vec<String>,
}

// ============================================================================
// Google Drive
// ============================================================================

/// One document returned by the Google Picker callback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PickedDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickerTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveAuthorizationResponse {
    #[serde(alias = "auth_url", alias = "url")]
    pub authorization_url: String,
}

// ============================================================================
// Misc endpoints
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleHitResponse {
    pub status: u16,
    pub message: String,
}

/// Error payload shapes the backend may send on a non-success response.
///
/// FastAPI uses `detail` (either a string or a list of validation items);
/// other handlers use `error` or `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Human-readable summary of the server-provided detail, if any.
    pub fn summary(&self) -> Option<String> {
        if let Some(detail) = &self.detail {
            match detail {
                serde_json::Value::String(s) if !s.trim().is_empty() => {
                    return Some(s.trim().to_string())
                }
                serde_json::Value::Array(items) => {
                    let msgs: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                        .collect();
                    if !msgs.is_empty() {
                        return Some(msgs.join("; "));
                    }
                }
                _ => {}
            }
        }
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}

// ============================================================================
// Session (auth provider)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl SessionUser {
    /// Name shown in greetings: full name, then name, then the email's local part.
    pub fn display_name(&self) -> String {
        self.user_metadata
            .full_name
            .clone()
            .or_else(|| self.user_metadata.name.clone())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| "there".to_string())
    }
}

/// Session as returned by the auth provider's token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|exp| exp <= now.timestamp())
            .unwrap_or(false)
    }
}

// ============================================================================
// Persisted snapshots (localStorage, JSON-valued)
// ============================================================================

/// Non-sensitive wizard progress. Field names match what earlier builds wrote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub workspace_id: Option<String>,
    pub current_step: u8,
}

impl Default for WizardSnapshot {
    fn default() -> Self {
        Self {
            workspace_id: None,
            current_step: 1,
        }
    }
}

/// Persisted form of a staged Drive file (progress is not persisted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveReferenceSnapshot {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

// ============================================================================
// Tests
// ============================================================================
