//! Wizard Controller: a pure reducer over the two onboarding steps.
//!
//! `reduce` never touches storage or navigation; it returns effects that the
//! host applies with [`apply_effects`].

use shared_types::WizardSnapshot;

use crate::config::OnboardingConfig;
use crate::storage::{
    load_json, save_json, KeyValueStore, ONBOARDING_COMPLETE_KEY, ONBOARDING_STATE_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Name the workspace topic
    Step1,
    /// Stage and upload sources
    Step2,
    Complete,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Step1 => 1,
            WizardStep::Step2 => 2,
            WizardStep::Complete => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub workspace_id: Option<String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::Step1,
            workspace_id: None,
        }
    }
}

impl WizardState {
    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Complete
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            workspace_id: self.workspace_id.clone(),
            current_step: match self.step {
                WizardStep::Step1 => 1,
                WizardStep::Step2 | WizardStep::Complete => 2,
            },
        }
    }

    /// Rebuild from the persisted snapshot and completion flag. A snapshot that
    /// claims step 2 without a workspace id falls back to step 1.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let snapshot: WizardSnapshot = load_json(store, ONBOARDING_STATE_KEY).unwrap_or_default();
        let complete = store.get(ONBOARDING_COMPLETE_KEY).as_deref() == Some("true");
        let step = match (complete, snapshot.current_step, &snapshot.workspace_id) {
            (true, _, _) => WizardStep::Complete,
            (false, 2, Some(_)) => WizardStep::Step2,
            _ => WizardStep::Step1,
        };
        Self {
            step,
            workspace_id: snapshot.workspace_id,
        }
    }

    /// Where a visitor who already finished onboarding should land.
    pub fn completed_redirect(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        Some(workspace_path(self.workspace_id.as_deref()))
    }
}

pub fn workspace_path(workspace_id: Option<&str>) -> String {
    match workspace_id {
        Some(id) => format!("/workspace/{id}"),
        None => "/workspace".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Step 1's backend call returned a workspace id
    WorkspaceCreated(String),
    /// User asked to return to step 1
    Back,
    /// Step 2's batch upload succeeded
    SourcesUploaded,
    /// Start over from step 1
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    Persist(WizardSnapshot),
    MarkComplete { workspace_id: Option<String> },
    ClearProgress,
    Navigate(String),
}

pub fn reduce(
    state: WizardState,
    event: WizardEvent,
    config: &OnboardingConfig,
) -> (WizardState, Vec<WizardEffect>) {
    match (state.step, event) {
        (WizardStep::Step1, WizardEvent::WorkspaceCreated(workspace_id)) => {
            let next = WizardState {
                step: WizardStep::Step2,
                workspace_id: Some(workspace_id),
            };
            let effects = vec![WizardEffect::Persist(next.snapshot())];
            (next, effects)
        }
        (WizardStep::Step2, WizardEvent::Back) if config.allow_back_after_workspace => {
            // the workspace already exists; keep its id so step 2 can resume it
            let next = WizardState {
                step: WizardStep::Step1,
                workspace_id: state.workspace_id,
            };
            let effects = vec![WizardEffect::Persist(next.snapshot())];
            (next, effects)
        }
        (WizardStep::Step2, WizardEvent::SourcesUploaded) => {
            let path = workspace_path(state.workspace_id.as_deref());
            let next = WizardState {
                step: WizardStep::Complete,
                workspace_id: state.workspace_id,
            };
            let effects = vec![
                WizardEffect::MarkComplete {
                    workspace_id: next.workspace_id.clone(),
                },
                WizardEffect::Navigate(path),
            ];
            (next, effects)
        }
        (_, WizardEvent::Reset) => (WizardState::default(), vec![WizardEffect::ClearProgress]),
        (step, event) => {
            tracing::debug!(?step, ?event, "ignoring wizard event");
            (state, Vec::new())
        }
    }
}

/// Apply storage effects and return the navigation target, if any.
pub fn apply_effects(store: &dyn KeyValueStore, effects: &[WizardEffect]) -> Option<String> {
    let mut navigate = None;
    for effect in effects {
        match effect {
            WizardEffect::Persist(snapshot) => {
                if let Err(e) = save_json(store, ONBOARDING_STATE_KEY, snapshot) {
                    tracing::warn!(error = %e, "failed to persist onboarding progress");
                }
            }
            WizardEffect::MarkComplete { workspace_id } => {
                if let Err(e) = store.set(ONBOARDING_COMPLETE_KEY, "true") {
                    tracing::warn!(error = %e, "failed to persist onboarding completion");
                }
                // keep the id so later visits can redirect straight to the workspace
                let snapshot = WizardSnapshot {
                    workspace_id: workspace_id.clone(),
                    current_step: 2,
                };
                if let Err(e) = save_json(store, ONBOARDING_STATE_KEY, &snapshot) {
                    tracing::warn!(error = %e, "failed to persist onboarding progress");
                }
            }
            WizardEffect::ClearProgress => {
                store.remove(ONBOARDING_STATE_KEY);
                store.remove(ONBOARDING_COMPLETE_KEY);
            }
            WizardEffect::Navigate(path) => navigate = Some(path.clone()),
        }
    }
    navigate
}
