use dioxus::prelude::*;

use crate::auth::{AuthCallback, Home, Login};
use crate::interop::redirect_to;
use crate::onboarding::Onboarding;
use crate::workspace::{Workspace, WorkspaceIndex};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/auth/callback")]
    AuthCallback {},
    #[route("/onboarding")]
    Onboarding {},
    #[route("/workspace")]
    WorkspaceIndex {},
    #[route("/workspace/:id")]
    Workspace { id: String },
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

/// Client-side navigation for in-app paths, full page load otherwise.
/// Replaces the current history entry so Back does not re-enter a redirect.
pub fn navigate_to(path: &str) {
    match path.parse::<Route>() {
        Ok(route) => {
            navigator().replace(route);
        }
        Err(_) => {
            if let Err(e) = redirect_to(path) {
                dioxus_logger::tracing::warn!("{}", e);
            }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Page not found" }
                p { class: "auth-subtitle", "Nothing lives at /{path}." }
                Link { class: "btn btn-primary", to: Route::Home {}, "Go home" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_paths_parse() {
        assert_eq!(
            "/workspace/ws_1".parse::<Route>().ok(),
            Some(Route::Workspace {
                id: "ws_1".to_string()
            })
        );
        assert_eq!("/workspace".parse::<Route>().ok(), Some(Route::WorkspaceIndex {}));
        assert_eq!("/".parse::<Route>().ok(), Some(Route::Home {}));
    }
}
