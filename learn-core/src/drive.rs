//! Drive Picker Adapter state.
//!
//! The picker widget itself is an injected capability ([`PickerWidget`]); this
//! module only tracks whether it loaded, whether the account is connected, and
//! which short-lived access token the picker may use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::PickedDocument;

use crate::error::{PickerError, TransportError};
use crate::storage::{load_json, save_json, KeyValueStore, DRIVE_CONNECTION_KEY};

pub const CONNECTION_STATUS_PARAM: &str = "connection_status";
pub const CONNECTION_ERROR_PARAM: &str = "error";

/// External picker script: load once, then open with a token and MIME filter.
/// A dismissed picker resolves to an empty selection.
#[async_trait(?Send)]
pub trait PickerWidget {
    async fn load(&self) -> Result<(), PickerError>;
    async fn open_picker(
        &self,
        access_token: &str,
        mime_filter: &str,
    ) -> Result<Vec<PickedDocument>, PickerError>;
}

/// Backend endpoints the adapter depends on.
#[async_trait(?Send)]
pub trait PickerTokenSource {
    /// Exchange the session bearer for a picker access token.
    async fn picker_token(&self, session_token: &str) -> Result<String, TransportError>;
    /// Where to send the browser to start the Drive OAuth flow.
    async fn authorization_url(&self, session_token: &str) -> Result<String, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriveConnection {
    #[default]
    NeverConnected,
    Connected,
    Failed { reason: String },
}

impl DriveConnection {
    pub fn is_connected(&self) -> bool {
        matches!(self, DriveConnection::Connected)
    }
}

/// Re-derive the connection state from the query string the OAuth flow
/// redirects back with. `None` when the query carries no status.
pub fn parse_return_params(query: &str) -> Option<DriveConnection> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut status = None;
    let mut error = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            CONNECTION_STATUS_PARAM => status = Some(value.into_owned()),
            CONNECTION_ERROR_PARAM => error = Some(value.into_owned()),
            _ => {}
        }
    }
    match status.as_deref() {
        Some("success") => Some(DriveConnection::Connected),
        Some("error") => Some(DriveConnection::Failed {
            reason: error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "authorization was not completed".to_string()),
        }),
        _ => None,
    }
}

/// What the picker needs to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
    pub access_token: String,
    pub mime_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivePickerState {
    ready: bool,
    connection: DriveConnection,
    access_token: Option<String>,
    /// Session bearer the current access token was issued for
    token_session: Option<String>,
    error: Option<String>,
    mime_filter: String,
}

impl DrivePickerState {
    pub fn restore(store: &dyn KeyValueStore, mime_filter: impl Into<String>) -> Self {
        let connection = load_json(store, DRIVE_CONNECTION_KEY).unwrap_or_default();
        Self {
            ready: false,
            connection,
            access_token: None,
            token_session: None,
            error: None,
            mime_filter: mime_filter.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn connection(&self) -> &DriveConnection {
        &self.connection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn can_open(&self) -> bool {
        self.ready && self.connection.is_connected() && self.access_token.is_some()
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn mark_load_failed(&mut self, err: &PickerError) {
        self.ready = false;
        self.error = Some(err.to_string());
    }

    /// Apply the OAuth return parameters, persisting the outcome.
    /// Returns true when the query carried a status.
    pub fn apply_return_params(&mut self, query: &str, store: &dyn KeyValueStore) -> bool {
        let Some(connection) = parse_return_params(query) else {
            return false;
        };
        if let DriveConnection::Failed { reason } = &connection {
            self.error = Some(PickerError::Authorization(reason.clone()).to_string());
        } else {
            self.error = None;
        }
        self.set_connection(connection, store);
        true
    }

    pub fn disconnect(&mut self, store: &dyn KeyValueStore) {
        self.access_token = None;
        self.token_session = None;
        self.set_connection(DriveConnection::NeverConnected, store);
    }

    fn set_connection(&mut self, connection: DriveConnection, store: &dyn KeyValueStore) {
        tracing::info!(?connection, "drive connection changed");
        if !connection.is_connected() {
            self.access_token = None;
            self.token_session = None;
        }
        self.connection = connection;
        if let Err(e) = save_json(store, DRIVE_CONNECTION_KEY, &self.connection) {
            tracing::warn!(error = %e, "failed to persist drive connection status");
        }
    }

    /// True when connected and the picker token was not issued for this session.
    pub fn needs_token_refresh(&self, session_token: Option<&str>) -> bool {
        match session_token {
            Some(token) => {
                self.connection.is_connected() && self.token_session.as_deref() != Some(token)
            }
            None => false,
        }
    }

    /// Session went away: the picker token is no longer usable.
    pub fn session_ended(&mut self) {
        self.access_token = None;
        self.token_session = None;
    }

    pub fn set_access_token(&mut self, session_token: &str, access_token: String) {
        self.access_token = Some(access_token);
        self.token_session = Some(session_token.to_string());
        self.error = None;
    }

    pub fn token_refresh_failed(&mut self, err: &PickerError) {
        self.access_token = None;
        self.token_session = None;
        self.error = Some(err.to_string());
    }

    pub fn report(&mut self, err: &PickerError) {
        self.error = Some(err.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn picker_request(&self) -> Result<PickerRequest, PickerError> {
        if !self.ready {
            return Err(PickerError::NotReady);
        }
        if !self.connection.is_connected() {
            return Err(PickerError::NotConnected);
        }
        let access_token = self.access_token.clone().ok_or(PickerError::MissingToken)?;
        Ok(PickerRequest {
            access_token,
            mime_filter: self.mime_filter.clone(),
        })
    }
}

/// Open the picker for the current state. Errors without touching the widget
/// unless it is loaded and a token is present.
pub async fn pick_documents<W>(
    state: &DrivePickerState,
    widget: &W,
) -> Result<Vec<PickedDocument>, PickerError>
where
    W: PickerWidget + ?Sized,
{
    let request = state.picker_request()?;
    widget
        .open_picker(&request.access_token, &request.mime_filter)
        .await
}

pub async fn fetch_picker_token<S>(source: &S, session_token: &str) -> Result<String, PickerError>
where
    S: PickerTokenSource + ?Sized,
{
    source
        .picker_token(session_token)
        .await
        .map_err(|e| PickerError::TokenExchange(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn return_params_success_and_error() {
        assert_eq!(
            parse_return_params("?connection_status=success"),
            Some(DriveConnection::Connected)
        );
        assert_eq!(
            parse_return_params("connection_status=error&error=access%20denied"),
            Some(DriveConnection::Failed {
                reason: "access denied".to_string()
            })
        );
        assert_eq!(parse_return_params("foo=bar"), None);
        assert_eq!(parse_return_params(""), None);
    }

    #[test]
    fn connection_persists_and_restores() {
        let store = MemoryStore::new();
        let mut state = DrivePickerState::restore(&store, "application/pdf");
        assert_eq!(state.connection(), &DriveConnection::NeverConnected);
        assert!(state.apply_return_params("?connection_status=success", &store));

        let restored = DrivePickerState::restore(&store, "application/pdf");
        assert!(restored.connection().is_connected());
        assert!(!restored.is_ready());
    }

    #[test]
    fn failed_return_surfaces_reason() {
        let store = MemoryStore::new();
        let mut state = DrivePickerState::restore(&store, "");
        state.apply_return_params("?connection_status=error&error=consent%20revoked", &store);
        assert!(state.error().unwrap().contains("consent revoked"));
        state.dismiss_error();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn picker_request_requires_ready_connected_and_token() {
        let store = MemoryStore::new();
        let mut state = DrivePickerState::restore(&store, "application/pdf");
        assert_eq!(state.picker_request(), Err(PickerError::NotReady));
        state.mark_ready();
        assert_eq!(state.picker_request(), Err(PickerError::NotConnected));
        state.apply_return_params("connection_status=success", &store);
        assert_eq!(state.picker_request(), Err(PickerError::MissingToken));
        state.set_access_token("session-a", "ya29.token".to_string());
        let request = state.picker_request().unwrap();
        assert_eq!(request.access_token, "ya29.token");
        assert_eq!(request.mime_filter, "application/pdf");
        assert!(state.can_open());
    }

    #[test]
    fn token_refresh_tracks_session_changes() {
        let store = MemoryStore::new();
        let mut state = DrivePickerState::restore(&store, "");
        assert!(!state.needs_token_refresh(Some("session-a")));
        state.apply_return_params("connection_status=success", &store);
        assert!(state.needs_token_refresh(Some("session-a")));
        state.set_access_token("session-a", "t1".to_string());
        assert!(!state.needs_token_refresh(Some("session-a")));
        assert!(state.needs_token_refresh(Some("session-b")));
        assert!(!state.needs_token_refresh(None));

        state.disconnect(&store);
        assert!(!state.has_access_token());
        assert_eq!(
            DrivePickerState::restore(&store, "").connection(),
            &DriveConnection::NeverConnected
        );
    }
}
