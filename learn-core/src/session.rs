//! Session Provider boundary and the `/auth/callback` decision.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use shared_types::Session;

use crate::error::AuthError;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const CALLBACK_PATH: &str = "/auth/callback";

/// The external auth provider. The app only reads the user's identity and
/// the access token string from the session it returns.
#[async_trait(?Send)]
pub trait SessionProvider {
    async fn current_session(&self) -> Option<Session>;
    /// URL that starts the provider's Google OAuth flow.
    fn authorize_url(&self, redirect_to: &str) -> Result<String, AuthError>;
    async fn exchange_code(&self, code: &str) -> Result<Session, AuthError>;
    async fn sign_out(&self);
}

/// Only same-origin relative paths are honoured as `next`.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => HOME_PATH.to_string(),
    }
}

/// Pull `code` and `next` out of the callback query string.
pub fn parse_callback_query(query: &str) -> Result<(String, Option<String>), AuthError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut code = None;
    let mut next = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "next" => next = Some(value.into_owned()),
            _ => {}
        }
    }
    let code = code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)?;
    Ok((code, next))
}

/// Handle the auth callback query: exchange `code` and redirect to `next`,
/// or fall back to the login page when the code is missing or rejected.
pub async fn resolve_auth_callback<P>(provider: &P, query: &str) -> String
where
    P: SessionProvider + ?Sized,
{
    let result = match parse_callback_query(query) {
        Ok((code, next)) => provider
            .exchange_code(&code)
            .await
            .map(|session| (session, next)),
        Err(e) => Err(e),
    };

    match result {
        Ok((session, next)) => {
            tracing::info!(user_id = %session.user.id, "session established");
            sanitize_next(next.as_deref())
        }
        Err(e) => {
            tracing::warn!(error = %e, "auth callback failed");
            LOGIN_PATH.to_string()
        }
    }
}

/// PKCE verifier: 64 characters from the unreserved set.
pub fn generate_pkce_verifier() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// S256 code challenge for a verifier.
pub fn pkce_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
