//! Onboarding core: browser-free state machines for the Learn Anything front-end.
//!
//! Everything the web crate needs from the outside world (durable storage,
//! the upload transport, the Drive picker widget, the auth provider, image
//! previews) is reached through a small trait so the logic here runs and is
//! tested natively.

pub mod collector;
pub mod config;
pub mod drive;
pub mod error;
pub mod session;
pub mod sidebar;
pub mod storage;
pub mod upload;
pub mod wizard;

pub use collector::{
    file_kind, size_label, DriveReference, FileKind, LocalFile, NoPreviews, PageSummary,
    PendingSource, PreviewFactory, PreviewHandle, SourceCollector, SourceFile, SourceId,
};
pub use config::OnboardingConfig;
pub use drive::{DriveConnection, DrivePickerState, PickerRequest, PickerTokenSource, PickerWidget};
pub use error::{AuthError, ConfigError, PickerError, SourceError, StoreError, SubmitError, TransportError};
pub use session::SessionProvider;
pub use storage::{KeyValueStore, MemoryStore};
pub use upload::{submit_sources, CollectorAccess, UploadBatch, UploadTransport};
pub use wizard::{WizardEffect, WizardEvent, WizardState, WizardStep};
