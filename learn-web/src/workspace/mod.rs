//! Workspace page: collapsible left navigation, the editor, and the
//! resizable right panel.

mod editor;
mod sidebar;

use dioxus::prelude::*;

use crate::auth::use_require_session;

pub use editor::Editor;
pub use sidebar::{LeftSidebar, RightSidebar};

#[component]
pub fn WorkspaceIndex() -> Element {
    rsx! {
        WorkspaceShell { title: "Workspace".to_string() }
    }
}

#[component]
pub fn Workspace(id: String) -> Element {
    rsx! {
        WorkspaceShell { title: format!("Workspace {id}") }
    }
}

#[component]
fn WorkspaceShell(title: String) -> Element {
    let _auth = use_require_session();
    let mut collapsed = use_signal(|| false);

    rsx! {
        div {
            class: "workspace-layout",
            LeftSidebar {
                collapsed: collapsed(),
                on_toggle: move |_| collapsed.toggle(),
            }
            main {
                class: "workspace-main",
                header {
                    class: "workspace-header",
                    nav {
                        class: "breadcrumb",
                        span { class: "breadcrumb-page", "{title}" }
                    }
                }
                div { class: "workspace-body", Editor {} }
            }
            RightSidebar {
                div { class: "sidebar-right-header", span { "Chat" } }
            }
        }
    }
}
