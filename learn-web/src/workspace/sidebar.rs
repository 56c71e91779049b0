use dioxus::prelude::*;
use learn_core::sidebar::{favorites, main_nav, workspace_groups, ResizeState};

use crate::interop::{attach_resize_tracking, EventListeners};

#[component]
pub fn LeftSidebar(collapsed: bool, on_toggle: EventHandler<()>) -> Element {
    let mut open_groups = use_signal(Vec::<&'static str>::new);

    rsx! {
        aside {
            class: if collapsed { "sidebar-left collapsed" } else { "sidebar-left" },
            "data-testid": "sidebar-left",
            button {
                class: "sidebar-trigger",
                title: if collapsed { "Open sidebar" } else { "Close sidebar" },
                onclick: move |_| on_toggle.call(()),
                if collapsed { "»" } else { "«" }
            }
            if !collapsed {
                nav {
                    class: "sidebar-nav",
                    for item in main_nav() {
                        a {
                            key: "{item.title}",
                            class: if item.active { "nav-item active" } else { "nav-item" },
                            href: item.url,
                            span { class: "nav-icon", "{item.icon}" }
                            span { class: "nav-title", "{item.title}" }
                            if let Some(badge) = item.badge {
                                span { class: "nav-badge", "{badge}" }
                            }
                        }
                    }
                }
                div {
                    class: "sidebar-section",
                    div { class: "sidebar-section-title", "Favorites" }
                    for page in favorites() {
                        a {
                            key: "{page.name}",
                            class: "nav-item",
                            href: page.url,
                            title: page.name,
                            span { class: "nav-icon", "{page.emoji}" }
                            span { class: "nav-title", "{page.name}" }
                        }
                    }
                }
                div {
                    class: "sidebar-section",
                    div { class: "sidebar-section-title", "Workspaces" }
                    for group in workspace_groups() {
                        div {
                            key: "{group.name}",
                            button {
                                class: "nav-item nav-group",
                                onclick: move |_| {
                                    let mut groups = open_groups.write();
                                    if let Some(pos) = groups.iter().position(|g| *g == group.name) {
                                        groups.remove(pos);
                                    } else {
                                        groups.push(group.name);
                                    }
                                },
                                span { class: "nav-icon", "{group.emoji}" }
                                span { class: "nav-title", "{group.name}" }
                            }
                            if open_groups.read().contains(&group.name) {
                                for page in group.pages.iter() {
                                    a {
                                        key: "{page.name}",
                                        class: "nav-item nav-subitem",
                                        href: page.url,
                                        span { class: "nav-icon", "{page.emoji}" }
                                        span { class: "nav-title", "{page.name}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Right panel whose left edge can be dragged between the configured bounds.
#[component]
pub fn RightSidebar(children: Element) -> Element {
    let mut resize = use_signal(ResizeState::default);
    let mut tracking = use_signal(|| None::<EventListeners>);

    let on_move = use_callback(move |(body_width, pointer_x): (i32, i32)| {
        if resize.peek().resizing {
            resize.write().drag(body_width, pointer_x);
        }
    });
    let on_release = use_callback(move |_: ()| {
        if resize.peek().resizing {
            resize.write().stop();
        }
    });

    let state = resize();
    rsx! {
        aside {
            class: if state.resizing { "sidebar-right resizing" } else { "sidebar-right" },
            "data-testid": "sidebar-right",
            style: "width: {state.width}px;",
            onmounted: move |_| tracking.set(attach_resize_tracking(on_move, on_release)),
            div {
                class: "sidebar-resizer",
                "data-testid": "sidebar-resizer",
                onmousedown: move |e| {
                    e.prevent_default();
                    resize.write().start();
                },
            }
            div { class: "sidebar-right-body", {children} }
        }
    }
}
