//! Two-step onboarding: name a topic, then stage and upload sources.
//!
//! Step transitions go through `learn_core::wizard::reduce`; this module only
//! applies the returned effects and renders the current step.

mod step1;
mod step2;

use dioxus::prelude::*;
use learn_core::wizard::{apply_effects, reduce};
use learn_core::{WizardEvent, WizardState, WizardStep};

use crate::auth::{use_require_session, AuthState};
use crate::config::app_config;
use crate::routes::navigate_to;
use crate::AppContext;

pub use step1::Step1;
pub use step2::Step2;

#[component]
pub fn Onboarding() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_require_session();
    let mut wizard = use_signal({
        let store = ctx.store.clone();
        move || WizardState::restore(store.as_ref())
    });

    // Finished onboarding on an earlier visit: go straight to the workspace.
    let initial_redirect = use_hook(|| wizard.peek().completed_redirect());
    use_effect(move || {
        if let Some(path) = initial_redirect.as_deref() {
            navigate_to(path);
        }
    });

    let dispatch = use_callback(move |event: WizardEvent| {
        let current = wizard.peek().clone();
        let (next, effects) = reduce(current, event, &app_config().onboarding);
        dioxus_logger::tracing::info!("onboarding step {}", next.step.number());
        wizard.set(next);
        if let Some(path) = apply_effects(ctx.store.as_ref(), &effects) {
            navigate_to(&path);
        }
    });

    let state = wizard.read().clone();
    let signed_in = matches!(*auth.read(), AuthState::Authenticated(_));
    if !signed_in {
        return rsx! {
            div { class: "onboarding-page", p { class: "form-note", "Checking your session…" } }
        };
    }

    let allow_back = app_config().onboarding.allow_back_after_workspace;
    let step_number = state.step.number().min(2);

    rsx! {
        div {
            class: "onboarding-page",
            div {
                class: "onboarding-card",
                div {
                    class: "onboarding-steps",
                    "data-testid": "onboarding-step",
                    span { class: if step_number == 1 { "step-dot active" } else { "step-dot" }, "1" }
                    span { class: "step-line" }
                    span { class: if step_number == 2 { "step-dot active" } else { "step-dot" }, "2" }
                    span { class: "step-caption", "Step {step_number} of 2" }
                }
                match state.step {
                    WizardStep::Step1 => rsx! {
                        Step1 {
                            on_created: move |workspace_id: String| {
                                dispatch.call(WizardEvent::WorkspaceCreated(workspace_id))
                            },
                        }
                    },
                    WizardStep::Step2 => rsx! {
                        Step2 {
                            workspace_id: state.workspace_id.clone().unwrap_or_default(),
                            allow_back,
                            on_back: move |_| dispatch.call(WizardEvent::Back),
                            on_uploaded: move |_| dispatch.call(WizardEvent::SourcesUploaded),
                        }
                    },
                    WizardStep::Complete => rsx! {
                        p { class: "form-note", "Taking you to your workspace…" }
                    },
                }
            }
        }
    }
}
