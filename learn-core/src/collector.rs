//! Source Collector: the staged set of files, URLs and Drive references that
//! step 2 of onboarding uploads as one batch.
//!
//! Local files come first in display order, then Drive references; URLs are
//! listed separately and never paginated. URLs and Drive references are
//! mirrored to the store on every change so a reload keeps them. File handles
//! are never persisted.

use std::fmt;
use std::rc::Rc;

use shared_types::{DriveReferenceSnapshot, PickedDocument};

use crate::config::OnboardingConfig;
use crate::error::{SourceError, SubmitError};
use crate::storage::{
    load_json, save_json, KeyValueStore, SELECTED_DRIVE_FILES_KEY, SELECTED_URLS_KEY,
};
use crate::upload::UploadBatch;

/// What the collector needs to know about a browser file handle.
pub trait SourceFile: Clone {
    fn name(&self) -> String;
    fn size(&self) -> u64;
    fn mime_type(&self) -> String;
}

/// Client-generated opaque identity for a staged local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(String);

impl SourceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Browser-level reference to an image preview (an object URL in the web crate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle(pub String);

/// Creates and releases preview handles. Every created handle must be released
/// exactly once, either on removal or after a successful upload.
pub trait PreviewFactory<F> {
    fn create(&self, file: &F) -> Option<PreviewHandle>;
    fn release(&self, handle: &PreviewHandle);
}

/// Factory for hosts that cannot render previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreviews;

impl<F> PreviewFactory<F> for NoPreviews {
    fn create(&self, _file: &F) -> Option<PreviewHandle> {
        None
    }

    fn release(&self, _handle: &PreviewHandle) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    File,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Image => "Image",
            FileKind::Pdf => "PDF",
            FileKind::Document => "Document",
            FileKind::Spreadsheet => "Spreadsheet",
            FileKind::Presentation => "Powerpoint",
            FileKind::File => "File",
        }
    }
}

pub fn file_kind(mime: &str) -> FileKind {
    match mime {
        m if m.starts_with("image/") => FileKind::Image,
        "application/pdf" => FileKind::Pdf,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        | "application/vnd.google-apps.document" => FileKind::Document,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        | "application/vnd.google-apps.spreadsheet" => FileKind::Spreadsheet,
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        | "application/vnd.google-apps.presentation" => FileKind::Presentation,
        _ => FileKind::File,
    }
}

/// `12.3 KB` style label.
pub fn size_label(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[derive(Debug, Clone)]
pub struct LocalFile<F> {
    pub id: SourceId,
    pub file: F,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    preview: Option<PreviewHandle>,
    progress: u8,
}

impl<F> LocalFile<F> {
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn kind(&self) -> FileKind {
        file_kind(&self.mime_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveReference {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    progress: u8,
}

impl DriveReference {
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn kind(&self) -> FileKind {
        file_kind(&self.mime_type)
    }

    fn snapshot(&self) -> DriveReferenceSnapshot {
        DriveReferenceSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

impl From<PickedDocument> for DriveReference {
    fn from(doc: PickedDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            mime_type: doc.mime_type,
            progress: 0,
        }
    }
}

impl From<DriveReferenceSnapshot> for DriveReference {
    fn from(snap: DriveReferenceSnapshot) -> Self {
        Self {
            id: snap.id,
            name: snap.name,
            mime_type: snap.mime_type,
            progress: 0,
        }
    }
}

/// A staged source, borrowed from the collector.
#[derive(Debug)]
pub enum PendingSource<'a, F> {
    LocalFile(&'a LocalFile<F>),
    RemoteUrl(&'a str),
    DriveReference(&'a DriveReference),
}

impl<F> Clone for PendingSource<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for PendingSource<'_, F> {}

impl<F> PendingSource<'_, F> {
    /// Stable key for rendering lists.
    pub fn key(&self) -> String {
        match self {
            PendingSource::LocalFile(f) => format!("file:{}", f.id),
            PendingSource::RemoteUrl(u) => format!("url:{u}"),
            PendingSource::DriveReference(d) => format!("drive:{}", d.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PendingSource::LocalFile(f) => &f.name,
            PendingSource::RemoteUrl(u) => u,
            PendingSource::DriveReference(d) => &d.name,
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            PendingSource::LocalFile(f) => f.progress,
            PendingSource::RemoteUrl(_) => 0,
            PendingSource::DriveReference(d) => d.progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub page: usize,
    pub pages: usize,
    /// 1-based index of the first entry on the page, 0 when empty
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

/// `max(1, ceil(total / page_size))`
pub fn total_pages_for(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

pub struct SourceCollector<F> {
    files: Vec<LocalFile<F>>,
    urls: Vec<String>,
    drive: Vec<DriveReference>,
    current_page: usize,
    page_size: usize,
    max_file_bytes: u64,
    uploading: bool,
    store: Rc<dyn KeyValueStore>,
    previews: Rc<dyn PreviewFactory<F>>,
}

impl<F: SourceFile> SourceCollector<F> {
    /// Build a collector and restore any URLs / Drive references a previous
    /// page load left in the store.
    pub fn new(
        config: &OnboardingConfig,
        store: Rc<dyn KeyValueStore>,
        previews: Rc<dyn PreviewFactory<F>>,
    ) -> Self {
        let urls: Vec<String> = load_json(store.as_ref(), SELECTED_URLS_KEY).unwrap_or_default();
        let drive: Vec<DriveReference> =
            load_json::<Vec<DriveReferenceSnapshot>>(store.as_ref(), SELECTED_DRIVE_FILES_KEY)
                .unwrap_or_default()
                .into_iter()
                .map(DriveReference::from)
                .collect();

        if !urls.is_empty() || !drive.is_empty() {
            tracing::info!(
                urls = urls.len(),
                drive_files = drive.len(),
                "restored staged sources"
            );
        }

        Self {
            files: Vec::new(),
            urls,
            drive,
            current_page: 1,
            page_size: config.page_size.max(1),
            max_file_bytes: config.max_file_bytes,
            uploading: false,
            store,
            previews,
        }
    }

    // ── Adding ────────────────────────────────────────────────────────────

    pub fn add_local_files<I>(&mut self, files: I) -> Vec<SourceId>
    where
        I: IntoIterator<Item = F>,
    {
        let mut added = Vec::new();
        if self.refuse_while_uploading("add local files") {
            return added;
        }
        for file in files {
            let mime_type = file.mime_type();
            let preview = if is_image(&mime_type) {
                self.previews.create(&file)
            } else {
                None
            };
            let entry = LocalFile {
                id: SourceId::new(),
                name: file.name(),
                size: file.size(),
                mime_type,
                file,
                preview,
                progress: 0,
            };
            added.push(entry.id.clone());
            self.files.push(entry);
        }
        self.current_page = 1;
        tracing::debug!(added = added.len(), total = self.files.len(), "staged local files");
        added
    }

    /// Stage a URL. Only absolute http(s) URLs with a host are accepted.
    pub fn add_url(&mut self, candidate: &str) -> Result<(), SourceError> {
        if self.refuse_while_uploading("add url") {
            return Err(SourceError::UploadInProgress);
        }
        let trimmed = candidate.trim();
        if !is_http_url(trimmed) {
            return Err(SourceError::InvalidUrl {
                candidate: candidate.to_string(),
            });
        }
        self.urls.push(trimmed.to_string());
        self.persist_urls();
        Ok(())
    }

    pub fn remove_url(&mut self, index: usize) -> Option<String> {
        if self.refuse_while_uploading("remove url") || index >= self.urls.len() {
            return None;
        }
        let removed = self.urls.remove(index);
        self.persist_urls();
        Some(removed)
    }

    /// Append picked Drive documents, skipping ids already staged.
    /// Returns how many were added.
    pub fn add_drive_references<I>(&mut self, picked: I) -> usize
    where
        I: IntoIterator<Item = PickedDocument>,
    {
        let mut added = 0;
        if self.refuse_while_uploading("add drive files") {
            return added;
        }
        for doc in picked {
            if self.drive.iter().any(|d| d.id == doc.id) {
                continue;
            }
            self.drive.push(DriveReference::from(doc));
            added += 1;
        }
        if added > 0 {
            self.persist_drive();
        }
        added
    }

    // ── Removing ──────────────────────────────────────────────────────────

    pub fn remove_local_file(&mut self, id: &SourceId) -> bool {
        if self.refuse_while_uploading("remove local file") {
            return false;
        }
        let Some(pos) = self.files.iter().position(|f| &f.id == id) else {
            return false;
        };
        let removed = self.files.remove(pos);
        if let Some(preview) = &removed.preview {
            self.previews.release(preview);
        }
        self.clamp_page();
        true
    }

    pub fn remove_drive_reference(&mut self, id: &str) -> bool {
        if self.refuse_while_uploading("remove drive file") {
            return false;
        }
        let Some(pos) = self.drive.iter().position(|d| d.id == id) else {
            return false;
        };
        self.drive.remove(pos);
        self.persist_drive();
        self.clamp_page();
        true
    }

    // ── Pagination ────────────────────────────────────────────────────────

    /// Number of paginated entries (local files + Drive references).
    pub fn paginated_len(&self) -> usize {
        self.files.len() + self.drive.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages_for(self.paginated_len(), self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn next_page(&mut self) {
        self.current_page = (self.current_page + 1).min(self.total_pages());
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Entries on the current page. Pure view.
    pub fn paginate(&self) -> Vec<PendingSource<'_, F>> {
        let start = (self.current_page - 1) * self.page_size;
        self.files
            .iter()
            .map(PendingSource::LocalFile)
            .chain(self.drive.iter().map(PendingSource::DriveReference))
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn page_summary(&self) -> PageSummary {
        let total = self.paginated_len();
        let start = (self.current_page - 1) * self.page_size;
        let to = (start + self.page_size).min(total);
        PageSummary {
            page: self.current_page,
            pages: self.total_pages(),
            from: if total == 0 { 0 } else { start + 1 },
            to,
            total,
        }
    }

    fn clamp_page(&mut self) {
        let pages = self.total_pages();
        if self.current_page > pages {
            self.current_page = pages;
        }
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn files(&self) -> &[LocalFile<F>] {
        &self.files
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn drive_references(&self) -> &[DriveReference] {
        &self.drive
    }

    /// Every staged source: local files, then URLs, then Drive references.
    pub fn pending_sources(&self) -> impl Iterator<Item = PendingSource<'_, F>> {
        self.files
            .iter()
            .map(PendingSource::LocalFile)
            .chain(self.urls.iter().map(|u| PendingSource::RemoteUrl(u.as_str())))
            .chain(self.drive.iter().map(PendingSource::DriveReference))
    }

    pub fn total_items(&self) -> usize {
        self.files.len() + self.urls.len() + self.drive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    // ── Submit lifecycle ──────────────────────────────────────────────────

    /// Checks that run before anything is sent.
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.is_empty() {
            return Err(SubmitError::EmptySelection);
        }
        let oversized: Vec<String> = self
            .files
            .iter()
            .filter(|f| f.size > self.max_file_bytes)
            .map(|f| f.name.clone())
            .collect();
        if !oversized.is_empty() {
            return Err(SubmitError::OversizedFiles {
                files: oversized,
                limit_mb: self.max_file_bytes / (1024 * 1024),
            });
        }
        Ok(())
    }

    /// Validate and snapshot the staged set into one batch. Marks the
    /// collector as uploading until [`complete_upload`](Self::complete_upload)
    /// or [`abort_upload`](Self::abort_upload).
    pub fn prepare_upload(&mut self, workspace_id: &str) -> Result<UploadBatch<F>, SubmitError> {
        if self.uploading {
            return Err(SubmitError::UploadInProgress);
        }
        self.validate()?;
        self.uploading = true;
        self.set_progress(0);
        Ok(UploadBatch {
            workspace_id: workspace_id.to_string(),
            files: self
                .files
                .iter()
                .map(|f| (f.id.clone(), f.file.clone()))
                .collect(),
            urls: self.urls.clone(),
            drive_file_ids: self.drive.iter().map(|d| d.id.clone()).collect(),
        })
    }

    /// The transport reports one aggregate percentage; every in-flight entry gets it.
    pub fn apply_progress(&mut self, percent: u8) {
        if !self.uploading {
            return;
        }
        self.set_progress(percent.min(100));
    }

    /// Successful batch: drop everything, release previews, clear stored keys.
    pub fn complete_upload(&mut self) {
        for file in self.files.drain(..) {
            if let Some(preview) = &file.preview {
                self.previews.release(preview);
            }
        }
        self.urls.clear();
        self.drive.clear();
        self.store.remove(SELECTED_URLS_KEY);
        self.store.remove(SELECTED_DRIVE_FILES_KEY);
        self.current_page = 1;
        self.uploading = false;
        tracing::info!("upload batch complete, staged sources cleared");
    }

    /// Failed batch: keep every entry so the user can retry.
    pub fn abort_upload(&mut self) {
        self.uploading = false;
        self.set_progress(0);
    }

    /// The staged set is frozen between `prepare_upload` and its outcome,
    /// so a successful batch never clears entries it did not send.
    fn refuse_while_uploading(&self, action: &str) -> bool {
        if self.uploading {
            tracing::warn!(action, "staged sources are locked during upload");
        }
        self.uploading
    }

    fn set_progress(&mut self, percent: u8) {
        for file in &mut self.files {
            file.progress = percent;
        }
        for drive in &mut self.drive {
            drive.progress = percent;
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────

    fn persist_urls(&self) {
        if let Err(e) = save_json(self.store.as_ref(), SELECTED_URLS_KEY, &self.urls) {
            tracing::warn!(error = %e, "failed to persist staged urls");
        }
    }

    fn persist_drive(&self) {
        let snapshot: Vec<DriveReferenceSnapshot> =
            self.drive.iter().map(DriveReference::snapshot).collect();
        if let Err(e) = save_json(self.store.as_ref(), SELECTED_DRIVE_FILES_KEY, &snapshot) {
            tracing::warn!(error = %e, "failed to persist staged drive files");
        }
    }
}

impl<F> Drop for SourceCollector<F> {
    fn drop(&mut self) {
        for file in &self.files {
            if let Some(preview) = &file.preview {
                self.previews.release(preview);
            }
        }
    }
}

/// Absolute http(s) URL with a host.
pub fn is_http_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeFile {
        name: &'static str,
        size: u64,
        mime: &'static str,
    }

    impl SourceFile for FakeFile {
        fn name(&self) -> String {
            self.name.to_string()
        }
        fn size(&self) -> u64 {
            self.size
        }
        fn mime_type(&self) -> String {
            self.mime.to_string()
        }
    }

    #[derive(Default)]
    struct CountingPreviews {
        created: RefCell<Vec<String>>,
        released: RefCell<Vec<String>>,
    }

    impl PreviewFactory<FakeFile> for CountingPreviews {
        fn create(&self, file: &FakeFile) -> Option<PreviewHandle> {
            let handle = format!("blob:{}", file.name);
            self.created.borrow_mut().push(handle.clone());
            Some(PreviewHandle(handle))
        }
        fn release(&self, handle: &PreviewHandle) {
            self.released.borrow_mut().push(handle.0.clone());
        }
    }

    fn file(name: &'static str, mime: &'static str) -> FakeFile {
        FakeFile {
            name,
            size: 2048,
            mime,
        }
    }

    fn collector_with(
        page_size: usize,
    ) -> (
        SourceCollector<FakeFile>,
        Rc<MemoryStore>,
        Rc<CountingPreviews>,
    ) {
        let store = Rc::new(MemoryStore::new());
        let previews = Rc::new(CountingPreviews::default());
        let config = OnboardingConfig {
            page_size,
            ..OnboardingConfig::default()
        };
        let collector = SourceCollector::new(&config, store.clone(), previews.clone());
        (collector, store, previews)
    }

    #[test]
    fn previews_only_for_images() {
        let (mut c, _, previews) = collector_with(8);
        c.add_local_files(vec![
            file("cat.png", "image/png"),
            file("notes.pdf", "application/pdf"),
        ]);
        assert!(c.files()[0].preview().is_some());
        assert!(c.files()[1].preview().is_none());
        assert_eq!(previews.created.borrow().len(), 1);
    }

    #[test]
    fn removing_one_file_keeps_others_in_order() {
        let (mut c, _, previews) = collector_with(8);
        let ids = c.add_local_files(vec![
            file("a.png", "image/png"),
            file("b.txt", "text/plain"),
            file("c.png", "image/png"),
        ]);
        assert!(c.remove_local_file(&ids[0]));
        let remaining: Vec<&SourceId> = c.files().iter().map(|f| &f.id).collect();
        assert_eq!(remaining, vec![&ids[1], &ids[2]]);
        assert_eq!(*previews.released.borrow(), vec!["blob:a.png".to_string()]);
        assert!(!c.remove_local_file(&ids[0]));
    }

    #[test]
    fn add_resets_to_first_page() {
        let (mut c, _, _) = collector_with(2);
        c.add_local_files((0..5).map(|_| file("x.txt", "text/plain")));
        c.next_page();
        c.next_page();
        assert_eq!(c.current_page(), 3);
        c.next_page();
        assert_eq!(c.current_page(), 3);
        c.add_local_files(vec![file("y.txt", "text/plain")]);
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn removal_clamps_page_downward() {
        let (mut c, _, _) = collector_with(2);
        let ids = c.add_local_files((0..3).map(|_| file("x.txt", "text/plain")));
        c.next_page();
        assert_eq!(c.current_page(), 2);
        assert_eq!(c.paginate().len(), 1);
        c.remove_local_file(&ids[2]);
        assert_eq!(c.total_pages(), 1);
        assert_eq!(c.current_page(), 1);
        c.remove_local_file(&ids[0]);
        c.remove_local_file(&ids[1]);
        assert_eq!(c.total_pages(), 1);
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn paginate_lists_files_before_drive_references() {
        let (mut c, _, _) = collector_with(2);
        c.add_drive_references(vec![PickedDocument {
            id: "d1".into(),
            name: "Deck".into(),
            mime_type: "application/vnd.google-apps.presentation".into(),
        }]);
        c.add_local_files(vec![file("a.txt", "text/plain"), file("b.txt", "text/plain")]);
        let first: Vec<String> = c.paginate().iter().map(|e| e.key()).collect();
        assert!(first.iter().all(|k| k.starts_with("file:")));
        c.next_page();
        let second: Vec<String> = c.paginate().iter().map(|e| e.key()).collect();
        assert_eq!(second, vec!["drive:d1".to_string()]);
        let summary = c.page_summary();
        assert_eq!((summary.from, summary.to, summary.total), (3, 3, 3));
    }

    #[test]
    fn url_validation() {
        let (mut c, store, _) = collector_with(8);
        assert!(c.add_url("https://example.com").is_ok());
        assert!(c.add_url(" http://example.com/a?b=1 ").is_ok());
        assert!(c.add_url("https://example.com").is_ok());
        for bad in ["not a url", "ftp://example.com", "example.com", "https://", ""] {
            assert!(c.add_url(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(c.urls().len(), 3);
        assert_eq!(c.urls()[1], "http://example.com/a?b=1");
        assert!(store.get(SELECTED_URLS_KEY).unwrap().contains("example.com"));
        assert_eq!(c.remove_url(0).as_deref(), Some("https://example.com"));
        assert_eq!(c.remove_url(5), None);
    }

    #[test]
    fn drive_references_dedupe_by_id() {
        let (mut c, _, _) = collector_with(8);
        let doc = PickedDocument {
            id: "d1".into(),
            name: "Report".into(),
            mime_type: "application/pdf".into(),
        };
        assert_eq!(c.add_drive_references(vec![doc.clone(), doc.clone()]), 1);
        assert_eq!(c.add_drive_references(vec![doc]), 0);
        assert_eq!(c.drive_references().len(), 1);
        assert!(c.remove_drive_reference("d1"));
        assert!(c.drive_references().is_empty());
    }

    #[test]
    fn staged_urls_and_drive_survive_reload() {
        let store = Rc::new(MemoryStore::new());
        let config = OnboardingConfig::default();
        {
            let mut c: SourceCollector<FakeFile> =
                SourceCollector::new(&config, store.clone(), Rc::new(NoPreviews));
            c.add_url("https://rust-lang.org").unwrap();
            c.add_drive_references(vec![PickedDocument {
                id: "d7".into(),
                name: "Sheet".into(),
                mime_type: "text/csv".into(),
            }]);
            c.add_local_files(vec![file("gone.txt", "text/plain")]);
        }
        let c: SourceCollector<FakeFile> =
            SourceCollector::new(&config, store, Rc::new(NoPreviews));
        assert_eq!(c.urls(), &["https://rust-lang.org".to_string()]);
        assert_eq!(c.drive_references()[0].id, "d7");
        assert!(c.files().is_empty());
    }

    #[test]
    fn progress_applies_uniformly_and_clamps() {
        let (mut c, _, _) = collector_with(8);
        c.add_local_files(vec![file("a.txt", "text/plain")]);
        c.add_drive_references(vec![PickedDocument {
            id: "d1".into(),
            name: "x".into(),
            mime_type: "application/pdf".into(),
        }]);
        c.apply_progress(40);
        assert_eq!(c.files()[0].progress(), 0, "ignored while idle");

        c.prepare_upload("ws").unwrap();
        c.apply_progress(40);
        assert_eq!(c.files()[0].progress(), 40);
        assert_eq!(c.drive_references()[0].progress(), 40);
        c.apply_progress(250);
        assert_eq!(c.files()[0].progress(), 100);

        c.abort_upload();
        assert_eq!(c.files()[0].progress(), 0);
        assert_eq!(c.total_items(), 2);
    }

    #[test]
    fn second_prepare_while_uploading_is_rejected() {
        let (mut c, _, _) = collector_with(8);
        c.add_url("https://example.com").unwrap();
        c.prepare_upload("ws").unwrap();
        assert_eq!(
            c.prepare_upload("ws").unwrap_err(),
            SubmitError::UploadInProgress
        );
    }

    #[test]
    fn staged_set_is_frozen_while_uploading() {
        let (mut c, _, _) = collector_with(8);
        let ids = c.add_local_files(vec![file("sent.txt", "text/plain")]);
        c.add_drive_references(vec![PickedDocument {
            id: "d1".into(),
            name: "Report".into(),
            mime_type: "application/pdf".into(),
        }]);
        c.add_url("https://example.com").unwrap();
        let batch = c.prepare_upload("ws").unwrap();
        assert_eq!(batch.files.len(), 1);

        assert!(c.add_local_files(vec![file("late.txt", "text/plain")]).is_empty());
        assert_eq!(
            c.add_url("https://late.example.com"),
            Err(SourceError::UploadInProgress)
        );
        assert_eq!(
            c.add_drive_references(vec![PickedDocument {
                id: "d2".into(),
                name: "Late".into(),
                mime_type: "application/pdf".into(),
            }]),
            0
        );
        assert!(!c.remove_local_file(&ids[0]));
        assert!(!c.remove_drive_reference("d1"));
        assert_eq!(c.remove_url(0), None);
        assert_eq!(c.total_items(), 3);

        c.abort_upload();
        let late = c.add_local_files(vec![file("late.txt", "text/plain")]);
        assert_eq!(late.len(), 1);
        c.prepare_upload("ws").unwrap();
        c.complete_upload();
        assert!(c.is_empty());
    }

    #[test]
    fn file_kind_labels() {
        assert_eq!(file_kind("image/jpeg").label(), "Image");
        assert_eq!(file_kind("application/pdf").label(), "PDF");
        assert_eq!(
            file_kind("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            FileKind::Spreadsheet
        );
        assert_eq!(file_kind("audio/mpeg"), FileKind::File);
        assert_eq!(size_label(1536), "1.5 KB");
    }

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages_for(0, 8), 1);
        assert_eq!(total_pages_for(8, 8), 1);
        assert_eq!(total_pages_for(9, 8), 2);
        assert_eq!(total_pages_for(17, 8), 3);
    }
}
