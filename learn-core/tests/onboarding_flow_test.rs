//! End-to-end onboarding flow against in-memory fakes: stage sources, submit
//! one batch, advance the wizard.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use learn_core::collector::{PreviewFactory, PreviewHandle, SourceCollector, SourceFile};
use learn_core::drive::{pick_documents, DrivePickerState, PickerWidget};
use learn_core::storage::{
    KeyValueStore, MemoryStore, ONBOARDING_COMPLETE_KEY, SELECTED_DRIVE_FILES_KEY,
    SELECTED_URLS_KEY,
};
use learn_core::upload::{submit_sources, UploadBatch, UploadTransport};
use learn_core::wizard::{apply_effects, reduce, WizardEvent, WizardState, WizardStep};
use learn_core::{OnboardingConfig, PickerError, SubmitError, TransportError};
use shared_types::{PickedDocument, UploadAck};

const MB: u64 = 1024 * 1024;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Debug, Clone)]
struct TestFile {
    name: String,
    size: u64,
    mime: String,
}

impl TestFile {
    fn new(name: &str, size: u64, mime: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime: mime.to_string(),
        }
    }
}

impl SourceFile for TestFile {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn size(&self) -> u64 {
        self.size
    }
    fn mime_type(&self) -> String {
        self.mime.clone()
    }
}

#[derive(Default)]
struct LivePreviews {
    live: RefCell<Vec<String>>,
}

impl PreviewFactory<TestFile> for LivePreviews {
    fn create(&self, file: &TestFile) -> Option<PreviewHandle> {
        let handle = format!("blob:{}", file.name);
        self.live.borrow_mut().push(handle.clone());
        Some(PreviewHandle(handle))
    }

    fn release(&self, handle: &PreviewHandle) {
        self.live.borrow_mut().retain(|h| h != &handle.0);
    }
}

/// Records every batch; reports 50% then 100% and answers with `outcome`.
struct RecordingTransport {
    calls: RefCell<Vec<(String, UploadBatch<TestFile>)>>,
    fail_with: Option<TransportError>,
    progress_seen: RefCell<Vec<u8>>,
    collector_probe: Cell<Option<usize>>,
}

impl RecordingTransport {
    fn ok() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_with: None,
            progress_seen: RefCell::new(Vec::new()),
            collector_probe: Cell::new(None),
        }
    }

    fn failing(err: TransportError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::ok()
        }
    }
}

#[async_trait(?Send)]
impl UploadTransport<TestFile> for RecordingTransport {
    async fn upload(
        &self,
        access_token: &str,
        batch: UploadBatch<TestFile>,
        on_progress: &dyn Fn(u8),
    ) -> Result<UploadAck, TransportError> {
        self.collector_probe.set(Some(batch.item_count()));
        self.calls
            .borrow_mut()
            .push((access_token.to_string(), batch));
        for pct in [50u8, 100] {
            on_progress(pct);
            self.progress_seen.borrow_mut().push(pct);
        }
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(UploadAck {
                status: Some(200),
                message: Some("queued".into()),
                batch_id: Some("batch_1".into()),
                source_ids: Vec::new(),
            }),
        }
    }
}

struct FakePicker {
    selection: Vec<PickedDocument>,
    opened: Cell<u32>,
}

#[async_trait(?Send)]
impl PickerWidget for FakePicker {
    async fn load(&self) -> Result<(), PickerError> {
        Ok(())
    }

    async fn open_picker(
        &self,
        _access_token: &str,
        _mime_filter: &str,
    ) -> Result<Vec<PickedDocument>, PickerError> {
        self.opened.set(self.opened.get() + 1);
        Ok(self.selection.clone())
    }
}

fn doc(id: &str) -> PickedDocument {
    PickedDocument {
        id: id.to_string(),
        name: format!("Doc {id}"),
        mime_type: "application/pdf".to_string(),
    }
}

fn setup() -> (
    RefCell<SourceCollector<TestFile>>,
    Rc<MemoryStore>,
    Rc<LivePreviews>,
) {
    let store = Rc::new(MemoryStore::new());
    let previews = Rc::new(LivePreviews::default());
    let collector = SourceCollector::new(
        &OnboardingConfig::default(),
        store.clone(),
        previews.clone(),
    );
    (RefCell::new(collector), store, previews)
}

#[tokio::test]
async fn empty_submit_fails_validation_without_network() {
    let (collector, _, _) = setup();
    let transport = RecordingTransport::ok();

    let err = submit_sources(&collector, &transport, "jwt", "ws_1")
        .await
        .unwrap_err();

    assert_eq!(err, SubmitError::EmptySelection);
    assert!(transport.calls.borrow().is_empty());
    assert!(!collector.borrow().is_uploading());
}

#[tokio::test]
async fn oversized_file_fails_validation_naming_it() {
    let (collector, _, _) = setup();
    collector.borrow_mut().add_local_files(vec![
        TestFile::new("small.pdf", 10, "application/pdf"),
        TestFile::new("huge.mp4", 100 * MB + 1, "video/mp4"),
        TestFile::new("limit.mp4", 100 * MB, "video/mp4"),
    ]);
    let transport = RecordingTransport::ok();

    let err = submit_sources(&collector, &transport, "jwt", "ws_1")
        .await
        .unwrap_err();

    match &err {
        SubmitError::OversizedFiles { files, limit_mb } => {
            assert_eq!(files, &vec!["huge.mp4".to_string()]);
            assert_eq!(*limit_mb, 100);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("huge.mp4"));
    assert!(transport.calls.borrow().is_empty());
    assert_eq!(collector.borrow().files().len(), 3);
}

#[tokio::test]
async fn successful_submit_sends_one_batch_and_clears_everything() {
    let (collector, store, previews) = setup();
    {
        let mut c = collector.borrow_mut();
        c.add_local_files(vec![
            TestFile::new("photo.png", 2048, "image/png"),
            TestFile::new("notes.docx", 4096, "application/msword"),
        ]);
        c.add_url("https://example.com").unwrap();
        c.add_drive_references(vec![doc("drive_1")]);
    }
    assert!(store.contains(SELECTED_URLS_KEY));
    assert!(store.contains(SELECTED_DRIVE_FILES_KEY));
    assert_eq!(previews.live.borrow().len(), 1);

    let transport = RecordingTransport::ok();
    let ack = submit_sources(&collector, &transport, "jwt-123", "ws_42")
        .await
        .unwrap();

    assert_eq!(ack.batch_id.as_deref(), Some("batch_1"));
    let calls = transport.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (token, batch) = &calls[0];
    assert_eq!(token, "jwt-123");
    assert_eq!(batch.workspace_id, "ws_42");
    assert_eq!(batch.files.len(), 2);
    assert_eq!(batch.urls, vec!["https://example.com".to_string()]);
    assert_eq!(batch.drive_file_ids_json(), r#"["drive_1"]"#);
    assert_eq!(transport.collector_probe.get(), Some(4));
    assert_eq!(*transport.progress_seen.borrow(), vec![50, 100]);

    let c = collector.borrow();
    assert!(c.is_empty());
    assert!(!c.is_uploading());
    assert_eq!(c.current_page(), 1);
    assert!(!store.contains(SELECTED_URLS_KEY));
    assert!(!store.contains(SELECTED_DRIVE_FILES_KEY));
    assert!(previews.live.borrow().is_empty(), "previews released");
}

#[tokio::test]
async fn failed_submit_keeps_pending_set_for_retry() {
    let (collector, store, _) = setup();
    {
        let mut c = collector.borrow_mut();
        c.add_local_files(vec![TestFile::new("a.txt", 10, "text/plain")]);
        c.add_url("https://example.com/article").unwrap();
    }
    let transport = RecordingTransport::failing(TransportError::Http {
        status: 400,
        detail: Some("Unsupported file type for a.txt".into()),
    });

    let err = submit_sources(&collector, &transport, "jwt", "ws_1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported file type for a.txt");
    assert!(!err.is_validation());

    let c = collector.borrow();
    assert_eq!(c.total_items(), 2);
    assert_eq!(c.files()[0].progress(), 0);
    assert!(!c.is_uploading());
    assert!(store.contains(SELECTED_URLS_KEY));
    drop(c);

    let retry = RecordingTransport::ok();
    submit_sources(&collector, &retry, "jwt", "ws_1")
        .await
        .unwrap();
    assert!(collector.borrow().is_empty());
}

#[tokio::test]
async fn network_failure_reports_generic_message() {
    let (collector, _, _) = setup();
    collector
        .borrow_mut()
        .add_url("https://example.com")
        .unwrap();
    let transport = RecordingTransport::failing(TransportError::Network("offline".into()));

    let err = submit_sources(&collector, &transport, "jwt", "ws_1")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), learn_core::error::GENERIC_UPLOAD_FAILURE);
}

#[tokio::test]
async fn repicking_drive_document_does_not_duplicate() {
    let (collector, store, _) = setup();
    let mut drive = DrivePickerState::restore(store.as_ref(), "application/pdf");
    drive.mark_ready();
    drive.apply_return_params("?connection_status=success", store.as_ref());
    drive.set_access_token("jwt", "ya29".into());

    let picker = FakePicker {
        selection: vec![doc("d1"), doc("d2")],
        opened: Cell::new(0),
    };

    for _ in 0..2 {
        let picked = pick_documents(&drive, &picker).await.unwrap();
        collector.borrow_mut().add_drive_references(picked);
    }

    assert_eq!(picker.opened.get(), 2);
    let ids: Vec<String> = collector
        .borrow()
        .drive_references()
        .iter()
        .map(|d| d.id.clone())
        .collect();
    assert_eq!(ids, vec!["d1".to_string(), "d2".to_string()]);
}

#[tokio::test]
async fn picker_is_not_opened_before_ready() {
    let store = MemoryStore::new();
    let drive = DrivePickerState::restore(&store, "");
    let picker = FakePicker {
        selection: vec![doc("d1")],
        opened: Cell::new(0),
    };
    assert_eq!(
        pick_documents(&drive, &picker).await.unwrap_err(),
        PickerError::NotReady
    );
    assert_eq!(picker.opened.get(), 0);
}

#[tokio::test]
async fn whole_wizard_from_topic_to_workspace() {
    init_tracing();
    let config = OnboardingConfig::default();
    let (collector, store, _) = setup();

    let (state, effects) = reduce(
        WizardState::restore(store.as_ref()),
        WizardEvent::WorkspaceCreated("ws_7".into()),
        &config,
    );
    assert_eq!(apply_effects(store.as_ref(), &effects), None);
    assert_eq!(WizardState::restore(store.as_ref()).step, WizardStep::Step2);

    collector
        .borrow_mut()
        .add_url("https://doc.rust-lang.org/book/")
        .unwrap();
    let workspace_id = state.workspace_id.clone().unwrap();
    submit_sources(&collector, &RecordingTransport::ok(), "jwt", &workspace_id)
        .await
        .unwrap();

    let (state, effects) = reduce(state, WizardEvent::SourcesUploaded, &config);
    assert!(state.is_complete());
    assert_eq!(
        apply_effects(store.as_ref(), &effects).as_deref(),
        Some("/workspace/ws_7")
    );
    assert_eq!(store.get(ONBOARDING_COMPLETE_KEY).as_deref(), Some("true"));
}

#[test]
fn removing_any_single_file_leaves_the_rest() {
    for victim in 0..5 {
        let (collector, _, previews) = setup();
        let mut c = collector.borrow_mut();
        let ids = c.add_local_files((0..5).map(|i| {
            TestFile::new(&format!("img{i}.png"), 100, "image/png")
        }));
        assert!(c.remove_local_file(&ids[victim]));

        let expected: Vec<_> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != victim)
            .map(|(_, id)| id.clone())
            .collect();
        let actual: Vec<_> = c.files().iter().map(|f| f.id.clone()).collect();
        assert_eq!(actual, expected);
        assert!(!previews
            .live
            .borrow()
            .contains(&format!("blob:img{victim}.png")));
        assert_eq!(previews.live.borrow().len(), 4);
    }
}

#[test]
fn current_page_never_exceeds_page_count() {
    let store = Rc::new(MemoryStore::new());
    for page_size in 1..=4usize {
        let config = OnboardingConfig {
            page_size,
            ..OnboardingConfig::default()
        };
        let mut c: SourceCollector<TestFile> =
            SourceCollector::new(&config, store.clone(), Rc::new(learn_core::NoPreviews));
        let ids = c.add_local_files((0..9).map(|i| TestFile::new(&format!("f{i}"), 1, "text/plain")));
        let expected_pages = 9usize.div_ceil(page_size);
        assert_eq!(c.total_pages(), expected_pages);
        for _ in 0..expected_pages {
            c.next_page();
        }
        for id in ids.iter().rev() {
            c.remove_local_file(id);
            assert!(c.current_page() <= c.total_pages());
            assert!(c.current_page() >= 1);
        }
        assert_eq!(c.total_pages(), 1);
    }
}

#[test]
fn malformed_url_leaves_set_unchanged() {
    let (collector, store, _) = setup();
    let mut c = collector.borrow_mut();
    assert!(c.add_url("not a url").is_err());
    assert!(c.is_empty());
    assert!(store.get(SELECTED_URLS_KEY).is_none());
    assert!(c.add_url("https://example.com").is_ok());
    assert_eq!(c.urls().len(), 1);
}
