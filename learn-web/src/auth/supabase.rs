//! Supabase GoTrue as the session provider: Google OAuth with PKCE.
//!
//! The provider owns its session; it is stored under `learn.auth.session` and
//! refreshed with the refresh token once `expires_at` has passed.

use std::rc::Rc;

use async_trait::async_trait;
use chrono::Utc;
use gloo_net::http::Request;
use learn_core::session::{generate_pkce_verifier, pkce_challenge};
use learn_core::storage::{load_json, save_json};
use learn_core::{AuthError, KeyValueStore, SessionProvider};
use serde::Serialize;
use shared_types::Session;

pub const SESSION_KEY: &str = "learn.auth.session";
pub const PKCE_VERIFIER_KEY: &str = "learn.auth.pkce_verifier";

#[derive(Serialize)]
struct PkceGrant<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Build the GoTrue authorize URL for Google with an S256 challenge.
pub fn authorize_url_for(supabase_url: &str, redirect_to: &str, challenge: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("provider", "google")
        .append_pair("redirect_to", redirect_to)
        .append_pair("code_challenge", challenge)
        .append_pair("code_challenge_method", "s256")
        .finish();
    format!("{supabase_url}/auth/v1/authorize?{query}")
}

#[derive(Clone)]
pub struct SupabaseSession {
    url: String,
    anon_key: String,
    store: Rc<dyn KeyValueStore>,
}

impl SupabaseSession {
    pub fn new(url: &str, anon_key: &str, store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            store,
        }
    }

    fn stored_session(&self) -> Option<Session> {
        load_json(self.store.as_ref(), SESSION_KEY)
    }

    fn save_session(&self, session: &Session) {
        if let Err(e) = save_json(self.store.as_ref(), SESSION_KEY, session) {
            dioxus_logger::tracing::warn!("Failed to persist session: {}", e);
        }
    }

    async fn token_grant<T: Serialize>(
        &self,
        grant_type: &str,
        body: &T,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type={}", self.url, grant_type);
        let response = Request::post(&url)
            .header("apikey", &self.anon_key)
            .json(body)
            .map_err(|e| AuthError::Provider(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Request failed: {e}")))?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!("HTTP error: {status} ({body})")));
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Failed to parse JSON: {e}")))?;
        self.save_session(&session);
        Ok(session)
    }
}

#[async_trait(?Send)]
impl SessionProvider for SupabaseSession {
    async fn current_session(&self) -> Option<Session> {
        let session = self.stored_session()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.store.remove(SESSION_KEY);
            return None;
        };
        match self
            .token_grant("refresh_token", &RefreshGrant { refresh_token })
            .await
        {
            Ok(fresh) => Some(fresh),
            Err(e) => {
                dioxus_logger::tracing::warn!("Session refresh failed: {}", e);
                self.store.remove(SESSION_KEY);
                None
            }
        }
    }

    fn authorize_url(&self, redirect_to: &str) -> Result<String, AuthError> {
        if self.url.is_empty() {
            return Err(AuthError::Provider(
                "auth provider URL is not configured".to_string(),
            ));
        }
        let verifier = generate_pkce_verifier();
        self.store
            .set(PKCE_VERIFIER_KEY, &verifier)
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(authorize_url_for(
            &self.url,
            redirect_to,
            &pkce_challenge(&verifier),
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<Session, AuthError> {
        let verifier = self.store.get(PKCE_VERIFIER_KEY).ok_or_else(|| {
            AuthError::Exchange("no PKCE verifier for this sign-in".to_string())
        })?;
        let result = self
            .token_grant(
                "pkce",
                &PkceGrant {
                    auth_code: code,
                    code_verifier: &verifier,
                },
            )
            .await;
        self.store.remove(PKCE_VERIFIER_KEY);
        result
    }

    async fn sign_out(&self) {
        if let Some(session) = self.stored_session() {
            let url = format!("{}/auth/v1/logout", self.url);
            let result = Request::post(&url)
                .header("apikey", &self.anon_key)
                .header("Authorization", &format!("Bearer {}", session.access_token))
                .send()
                .await;
            if let Err(e) = result {
                dioxus_logger::tracing::warn!("Sign-out request failed: {}", e);
            }
        }
        self.store.remove(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_pkce_challenge() {
        let url = authorize_url_for(
            "https://abc.supabase.co",
            "http://localhost:8080/auth/callback?next=/onboarding",
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM",
        );
        assert!(url.starts_with("https://abc.supabase.co/auth/v1/authorize?provider=google&"));
        assert!(url.contains(
            "redirect_to=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback%3Fnext%3D%2Fonboarding"
        ));
        assert!(url.contains("code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"));
        assert!(url.ends_with("code_challenge_method=s256"));
    }
}
