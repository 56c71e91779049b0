pub mod api;
pub mod auth;
pub mod config;
pub mod interop;
pub mod onboarding;
pub mod picker;
pub mod routes;
pub mod storage;
pub mod styles;
pub mod workspace;

use std::rc::Rc;

use dioxus::prelude::*;
use learn_core::KeyValueStore;

pub use auth::AuthState;
pub use routes::Route;

use crate::auth::probe_session;
use crate::auth::supabase::SupabaseSession;
use crate::config::app_config;
use crate::storage::browser_store;

/// Browser capabilities shared by every page.
#[derive(Clone)]
pub struct AppContext {
    pub store: Rc<dyn KeyValueStore>,
    pub session: Rc<SupabaseSession>,
}

impl AppContext {
    fn new() -> Self {
        let config = app_config();
        let store = browser_store();
        let session = Rc::new(SupabaseSession::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            store.clone(),
        ));
        Self { store, session }
    }
}

#[component]
pub fn App() -> Element {
    let ctx = use_context_provider(AppContext::new);
    // Auth context — provided to the whole tree
    let auth = use_context_provider(|| Signal::new(AuthState::default()));

    // Check for a stored session once on load.
    use_hook(move || {
        spawn(async move {
            probe_session(ctx.session.as_ref(), auth).await;
        });
    });

    rsx! {
        style { {styles::APP_STYLES} }
        Router::<Route> {}
    }
}
