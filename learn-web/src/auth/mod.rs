//! Auth context, the login page and the OAuth callback route.
//!
//! The session is provider-owned (see [`supabase`]); the rest of the app only
//! reads `Signal<AuthState>` for the user's name and the bearer token.

pub mod supabase;

use dioxus::prelude::*;
use learn_core::session::{resolve_auth_callback, CALLBACK_PATH, LOGIN_PATH};
use learn_core::SessionProvider;
use shared_types::Session;

use crate::interop::{current_origin, current_query, redirect_to};
use crate::routes::{navigate_to, Route};
use crate::AppContext;

// ── Auth state ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Default)]
pub enum AuthState {
    /// Session not checked yet.
    #[default]
    Unknown,
    /// Confirmed no session.
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    pub fn access_token(&self) -> Option<String> {
        match self {
            AuthState::Authenticated(session) => Some(session.access_token.clone()),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Ask the provider for the current session and update the context signal.
pub async fn probe_session<P>(provider: &P, mut auth: Signal<AuthState>)
where
    P: SessionProvider + ?Sized,
{
    match provider.current_session().await {
        Some(session) => auth.set(AuthState::Authenticated(session)),
        None => auth.set(AuthState::Anonymous),
    }
}

/// Callback URL the provider sends the browser back to.
pub fn callback_url(origin: &str, next: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{origin}{CALLBACK_PATH}?{query}")
}

// ── Login ─────────────────────────────────────────────────────────────────────

#[component]
pub fn Login() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<AuthState>>();
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    // Already signed in: nothing to do here.
    use_effect(move || {
        if auth.read().session().is_some() {
            navigate_to("/onboarding");
        }
    });

    let sign_in = move |_| {
        busy.set(true);
        error.set(None);
        let redirect = callback_url(&current_origin(), "/onboarding");
        let result = ctx
            .session
            .authorize_url(&redirect)
            .map_err(|e| e.to_string())
            .and_then(|url| redirect_to(&url));
        if let Err(e) = result {
            dioxus_logger::tracing::warn!("Sign-in could not start: {}", e);
            error.set(Some(e));
            busy.set(false);
        }
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Learn Anything" }
                p { class: "auth-subtitle", "Sign in to create your first workspace." }
                button {
                    class: "btn btn-primary auth-google",
                    "data-testid": "google-sign-in",
                    disabled: busy(),
                    onclick: sign_in,
                    if busy() { "Redirecting…" } else { "Sign in with Google" }
                }
                if let Some(err) = error.read().as_deref() {
                    p { class: "form-error", "data-testid": "auth-error", "{err}" }
                }
            }
        }
    }
}

// ── /auth/callback ────────────────────────────────────────────────────────────

#[component]
pub fn AuthCallback() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_context::<Signal<AuthState>>();

    use_hook(move || {
        spawn(async move {
            let query = current_query();
            let target = resolve_auth_callback(ctx.session.as_ref(), &query).await;
            probe_session(ctx.session.as_ref(), auth).await;
            navigate_to(&target);
        });
    });

    rsx! {
        div {
            class: "auth-page",
            p { class: "auth-subtitle", "Signing you in…" }
        }
    }
}

// ── Home ──────────────────────────────────────────────────────────────────────

#[component]
pub fn Home() -> Element {
    let ctx = use_context::<AppContext>();
    let mut auth = use_context::<Signal<AuthState>>();
    let mut sample = use_signal(|| None::<Result<String, String>>);

    let run_sample_hit = move |_| {
        let Some(token) = auth.read().access_token() else {
            return;
        };
        spawn(async move {
            let result = crate::api::sample_hit(&token)
                .await
                .map(|r| format!("{} {}", r.status, r.message));
            if let Err(e) = &result {
                dioxus_logger::tracing::warn!("sample_hit failed: {}", e);
            }
            sample.set(Some(result));
        });
    };

    let sign_out = move |_| {
        let provider = ctx.session.clone();
        spawn(async move {
            provider.sign_out().await;
            auth.set(AuthState::Anonymous);
        });
    };

    let state = auth.read().clone();
    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Learn Anything" }
                match state {
                    AuthState::Unknown => rsx! {
                        p { class: "auth-subtitle", "Loading…" }
                    },
                    AuthState::Anonymous => rsx! {
                        p { class: "auth-subtitle", "Turn your notes, files and links into a study workspace." }
                        Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
                    },
                    AuthState::Authenticated(session) => rsx! {
                        p { class: "auth-subtitle", "Hello, " {session.user.display_name()} "!" }
                        div {
                            class: "home-actions",
                            Link { class: "btn btn-primary", to: Route::Onboarding {}, "Start onboarding" }
                            button { class: "btn", onclick: run_sample_hit, "Sample hit" }
                            button { class: "btn btn-ghost", onclick: sign_out, "Sign out" }
                        }
                        match sample.read().as_ref() {
                            Some(Ok(message)) => rsx! { p { class: "form-note", "{message}" } },
                            Some(Err(err)) => rsx! { p { class: "form-error", "{err}" } },
                            None => rsx! {},
                        }
                    },
                }
            }
        }
    }
}

/// Send anonymous visitors to the login page once the session probe settles.
pub fn use_require_session() -> Signal<AuthState> {
    let auth = use_context::<Signal<AuthState>>();
    use_effect(move || {
        if *auth.read() == AuthState::Anonymous {
            navigate_to(LOGIN_PATH);
        }
    });
    auth
}
