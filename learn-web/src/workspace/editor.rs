//! Minimal block editor for the workspace page. Images stay local: they are
//! shown through object URLs, revoked when the editor goes away.

use dioxus::prelude::*;

use crate::interop::{object_url_for, open_file_dialog, take_input_files};

const IMAGE_INPUT_ID: &str = "editor-image-input";

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text(String),
    Image { url: String, name: String },
}

#[component]
pub fn Editor() -> Element {
    let mut blocks = use_signal(|| vec![Block::Text(String::new())]);

    use_drop(move || {
        for block in blocks.peek().iter() {
            if let Block::Image { url, .. } = block {
                let _ = web_sys::Url::revoke_object_url(url);
            }
        }
    });

    let on_image_chosen = move |_| {
        for file in take_input_files(IMAGE_INPUT_ID) {
            let Some(url) = object_url_for(file.as_file()) else {
                dioxus_logger::tracing::warn!("Could not create a preview URL for an image");
                continue;
            };
            let mut list = blocks.write();
            list.push(Block::Image {
                url,
                name: file.as_file().name(),
            });
            list.push(Block::Text(String::new()));
        }
    };

    let snapshot = blocks.read().clone();
    rsx! {
        div {
            class: "editor",
            "data-testid": "editor",
            div {
                class: "editor-toolbar",
                button {
                    class: "btn btn-ghost",
                    onclick: move |_| blocks.write().push(Block::Text(String::new())),
                    "+ Text"
                }
                button {
                    class: "btn btn-ghost",
                    onclick: move |_| open_file_dialog(IMAGE_INPUT_ID),
                    "+ Image"
                }
                input {
                    id: IMAGE_INPUT_ID,
                    r#type: "file",
                    accept: "image/*",
                    style: "display: none;",
                    onchange: on_image_chosen,
                }
            }
            for (index, block) in snapshot.into_iter().enumerate() {
                div {
                    key: "{index}",
                    class: "editor-block",
                    match block {
                        Block::Text(text) => rsx! {
                            textarea {
                                class: "editor-text",
                                placeholder: "Type something…",
                                value: "{text}",
                                oninput: move |e| {
                                    if let Some(Block::Text(current)) = blocks.write().get_mut(index) {
                                        *current = e.value();
                                    }
                                },
                            }
                        },
                        Block::Image { url, name } => rsx! {
                            img { class: "editor-image", src: "{url}", alt: "{name}" }
                        },
                    }
                    button {
                        class: "btn-icon editor-remove",
                        title: "Remove block",
                        onclick: move |_| {
                            let mut list = blocks.write();
                            if index < list.len() {
                                if let Block::Image { url, .. } = list.remove(index) {
                                    let _ = web_sys::Url::revoke_object_url(&url);
                                }
                            }
                        },
                        "✕"
                    }
                }
            }
        }
    }
}
