use dioxus::prelude::*;
use shared_types::CreateWorkspaceRequest;
use validator::{Validate, ValidationErrors};

use crate::api::create_workspace;
use crate::auth::AuthState;

const TOPIC_MAX_CHARS: usize = 100;
const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// First message attached to any field error.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the topic and try again.".to_string())
}

#[component]
pub fn Step1(on_created: EventHandler<String>) -> Element {
    let auth = use_context::<Signal<AuthState>>();
    let mut topic = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let request = CreateWorkspaceRequest::new(&topic.read());
        if let Err(e) = request.validate() {
            error.set(Some(first_validation_message(&e)));
            return;
        }
        let Some(token) = auth.read().access_token() else {
            error.set(Some(SESSION_EXPIRED.to_string()));
            return;
        };

        busy.set(true);
        error.set(None);
        spawn(async move {
            match create_workspace(&token, &request).await {
                Ok(response) => {
                    dioxus_logger::tracing::info!("workspace created: {}", response.workspace_id);
                    busy.set(false);
                    on_created.call(response.workspace_id);
                }
                Err(e) => {
                    dioxus_logger::tracing::warn!("create_workspace failed: {}", e);
                    error.set(Some(e));
                    busy.set(false);
                }
            }
        });
    };

    let count = topic.read().trim().chars().count();

    rsx! {
        form {
            class: "onboarding-form",
            onsubmit: submit,
            h2 { class: "onboarding-title", "What do you want to learn?" }
            p {
                class: "form-note",
                "Give your workspace a topic. You can add files, links and Google Drive documents next."
            }
            label { class: "form-label", r#for: "topic-input", "Project topic" }
            input {
                id: "topic-input",
                class: "form-input",
                "data-testid": "topic-input",
                r#type: "text",
                placeholder: "e.g. Organic chemistry for first-year students",
                maxlength: "{TOPIC_MAX_CHARS}",
                value: "{topic}",
                disabled: busy(),
                oninput: move |e| topic.set(e.value()),
            }
            div { class: "form-counter", "{count}/{TOPIC_MAX_CHARS}" }
            if let Some(err) = error.read().as_deref() {
                p { class: "form-error", "data-testid": "topic-error", "{err}" }
            }
            button {
                class: "btn btn-primary",
                "data-testid": "create-workspace",
                r#type: "submit",
                disabled: busy(),
                if busy() { "Creating…" } else { "Continue" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_topic_reports_length_message() {
        let errors = CreateWorkspaceRequest::new(" ab ").validate().unwrap_err();
        assert_eq!(
            first_validation_message(&errors),
            "Project topic must be between 3 and 100 characters."
        );
    }
}
