use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::api::DraftStore;
use crate::debounce::{DebouncedPersister, DEFAULT_DELAY};
use crate::insertion::{PendingInsertion, Selection, ToolbarAction};
use crate::markdown;
use crate::metrics::{self, DEFAULT_WORDS_PER_MINUTE};
use crate::settings::EditorSettings;
use crate::shell::{self, DesktopShell, NoShell};
use crate::status::{format_relative_time, EditorStats, SaveStatus};

/// Longest content the editor accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 100_000;

// ---- Types ----

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDocument {
    pub title: String,
    pub content: String,
}

impl EditorDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub autosave_delay: Duration,
    pub words_per_minute: usize,
    pub readonly: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            autosave_delay: DEFAULT_DELAY,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            readonly: false,
        }
    }
}

impl From<&EditorSettings> for SessionOptions {
    fn from(settings: &EditorSettings) -> Self {
        Self {
            autosave_delay: settings.autosave_delay(),
            words_per_minute: settings.words_per_minute,
            readonly: settings.readonly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrigin {
    Debounced,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
    /// Nothing was sent: empty content, a read-only session, or the document
    /// was already confirmed by an earlier save.
    Skipped,
}

// ---- Shared state ----

struct SessionState {
    document: EditorDocument,
    /// Last document the store confirmed.
    confirmed: EditorDocument,
    status: SaveStatus,
    last_saved: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl SessionState {
    fn is_dirty(&self) -> bool {
        self.document != self.confirmed
    }
}

struct SessionCore {
    state: Mutex<SessionState>,
    // Held for the whole store call; at most one save is in flight.
    save_gate: tokio::sync::Mutex<()>,
    store: Arc<dyn DraftStore>,
    shell: Arc<dyn DesktopShell>,
}

impl SessionCore {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state mutex")
    }

    async fn persist(&self, document: EditorDocument, origin: SaveOrigin) -> SaveOutcome {
        if metrics::is_empty_content(&document.content) {
            tracing::debug!(?origin, "not saving empty draft");
            return SaveOutcome::Skipped;
        }

        let _gate = self.save_gate.lock().await;
        {
            let mut state = self.lock();
            if origin == SaveOrigin::Debounced && state.confirmed == document {
                tracing::debug!("draft already saved while the autosave waited");
                if !state.is_dirty() && state.status == SaveStatus::Error {
                    state.status = SaveStatus::Saved;
                }
                return SaveOutcome::Skipped;
            }
            state.status = SaveStatus::Saving;
        }

        let result = self.store.save(&document.title, &document.content).await;

        let mut state = self.lock();
        match result {
            Ok(()) => {
                // Confirm what was sent, not whatever the editor holds now.
                state.confirmed = document;
                state.last_saved = Some(Utc::now());
                state.last_error = None;
                state.status = if state.is_dirty() {
                    SaveStatus::Unsaved
                } else {
                    SaveStatus::Saved
                };
                tracing::info!(?origin, status = state.status.as_str(), "draft saved");
                SaveOutcome::Saved
            }
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(?origin, error = %message, "draft save failed");
                state.status = SaveStatus::Error;
                state.last_error = Some(message);
                SaveOutcome::Failed
            }
        }
    }
}

// ---- Session ----

/// One open draft: its text, derived stats and save status, and the autosave
/// that keeps the store in sync.
///
/// Must be created inside a tokio runtime; the autosave driver is spawned on
/// it and stopped when the session is dropped.
pub struct EditorSession {
    core: Arc<SessionCore>,
    autosave: DebouncedPersister<EditorDocument>,
    options: SessionOptions,
}

impl EditorSession {
    pub fn new(document: EditorDocument, store: Arc<dyn DraftStore>, options: SessionOptions) -> Self {
        Self::with_shell(document, store, Arc::new(NoShell), options)
    }

    pub fn with_shell(
        document: EditorDocument,
        store: Arc<dyn DraftStore>,
        shell: Arc<dyn DesktopShell>,
        options: SessionOptions,
    ) -> Self {
        let mut document = document;
        truncate_content(&mut document.content);

        let core = Arc::new(SessionCore {
            state: Mutex::new(SessionState {
                confirmed: document.clone(),
                document,
                status: SaveStatus::Saved,
                last_saved: None,
                last_error: None,
            }),
            save_gate: tokio::sync::Mutex::new(()),
            store,
            shell,
        });

        let autosave = {
            let core = Arc::clone(&core);
            DebouncedPersister::spawn(options.autosave_delay, move |document: EditorDocument| {
                let core = Arc::clone(&core);
                async move {
                    core.persist(document, SaveOrigin::Debounced).await;
                }
            })
        };

        Self {
            core,
            autosave,
            options,
        }
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn is_readonly(&self) -> bool {
        self.options.readonly
    }

    pub fn document(&self) -> EditorDocument {
        self.core.lock().document.clone()
    }

    pub fn title(&self) -> String {
        self.core.lock().document.title.clone()
    }

    pub fn content(&self) -> String {
        self.core.lock().document.content.clone()
    }

    pub fn status(&self) -> SaveStatus {
        self.core.lock().status
    }

    pub fn is_dirty(&self) -> bool {
        self.core.lock().is_dirty()
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.core.lock().last_saved
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.core.lock().last_error.clone()
    }

    pub fn stats(&self) -> EditorStats {
        let state = self.core.lock();
        let content = &state.document.content;
        EditorStats {
            words: metrics::count_words(content),
            characters: content.chars().count(),
            reading_time_minutes: metrics::estimate_reading_time(
                content,
                self.options.words_per_minute,
            ),
            is_dirty: state.is_dirty(),
            last_saved: state.last_saved,
        }
    }

    /// e.g. "Saved 3 minutes ago", "Saving...", "Save failed".
    pub fn status_line(&self, now: DateTime<Utc>) -> String {
        let state = self.core.lock();
        match (state.status, state.last_saved) {
            (SaveStatus::Saved, Some(at)) => {
                format!("{} {}", state.status.label(), format_relative_time(at, now))
            }
            (status, _) => status.label().to_string(),
        }
    }

    pub fn preview_html(&self) -> String {
        markdown::render(&self.core.lock().document.content)
    }

    pub fn excerpt(&self, max_chars: usize) -> String {
        metrics::excerpt(&self.core.lock().document.content, max_chars)
    }

    // ---- Edits ----

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.edit(|document| document.title = title);
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let mut content = content.into();
        truncate_content(&mut content);
        self.edit(|document| document.content = content);
    }

    /// Replace title and content as one change, as when a file is opened.
    pub fn replace_document(&self, document: EditorDocument) {
        let mut document = document;
        truncate_content(&mut document.content);
        self.edit(|current| *current = document);
    }

    /// Wrap the selection in `before`/`after` and return the selection to
    /// restore in the text control.
    pub fn insert_markup(&self, selection: Selection, before: &str, after: &str) -> Selection {
        self.apply_insertion(PendingInsertion {
            selection,
            before,
            after,
        })
    }

    pub fn apply_toolbar(&self, action: ToolbarAction, selection: Selection) -> Selection {
        self.apply_insertion(action.pending(selection))
    }

    fn apply_insertion(&self, pending: PendingInsertion<'_>) -> Selection {
        self.edit(|document| {
            let mut insertion = pending.apply(&document.content);
            truncate_content(&mut insertion.content);
            let selection = insertion.selection.clamp_to(&insertion.content);
            document.content = insertion.content;
            selection
        })
    }

    fn edit<R>(&self, change: impl FnOnce(&mut EditorDocument) -> R) -> R {
        let (result, schedule) = {
            let mut state = self.core.lock();
            let before = state.document.clone();
            let result = change(&mut state.document);
            if state.document == before {
                return result;
            }

            let schedule = if self.options.readonly {
                None
            } else if !state.is_dirty() && state.status == SaveStatus::Saving {
                // The save in flight will confirm other text; this one still
                // has to follow it.
                Some(state.document.clone())
            } else if !state.is_dirty() {
                // Back to what the store already has.
                if matches!(state.status, SaveStatus::Unsaved | SaveStatus::Error) {
                    state.status = SaveStatus::Saved;
                }
                None
            } else if metrics::is_empty_content(&state.document.content) {
                None
            } else {
                state.status = SaveStatus::Unsaved;
                Some(state.document.clone())
            };
            (result, schedule)
        };

        match schedule {
            Some(document) => self.autosave.request(document),
            None => {
                self.autosave.cancel();
            }
        }
        result
    }

    // ---- Saving ----

    /// Save right away, bypassing the autosave delay. Waits for a save that is
    /// already running to finish first.
    pub async fn save_now(&self) -> SaveOutcome {
        if self.options.readonly {
            return SaveOutcome::Skipped;
        }

        self.autosave.cancel();
        let document = self.document();
        let outcome = self.core.persist(document, SaveOrigin::Explicit).await;
        if outcome == SaveOutcome::Saved {
            self.core
                .shell
                .show_notification("Draft Saved", "Your draft has been saved successfully.");
        }
        outcome
    }

    // ---- Files ----

    /// Load a markdown file from disk, titled after its file name.
    pub async fn open_file(&self, path: &Path) -> Result<()> {
        let content = shell::read_markdown_file(path).await?;
        let title = shell::title_from_file_name(path);
        tracing::info!(path = %path.display(), "opened markdown file");
        self.replace_document(EditorDocument { title, content });
        Ok(())
    }

    pub async fn export_markdown(&self, path: &Path) -> Result<()> {
        let content = self.content();
        shell::write_markdown_file(path, &content).await?;
        tracing::info!(path = %path.display(), "exported markdown file");
        Ok(())
    }
}

fn truncate_content(content: &mut String) {
    if let Some((index, _)) = content.char_indices().nth(MAX_CONTENT_CHARS) {
        content.truncate(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::{sleep, Instant};

    #[derive(Default)]
    struct FakeStore {
        latency: Duration,
        fail: AtomicBool,
        saves: Mutex<Vec<(EditorDocument, Instant)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeStore {
        fn with_latency(latency: Duration) -> Self {
            Self {
                latency,
                ..Self::default()
            }
        }

        fn saved_contents(&self) -> Vec<String> {
            self.saves
                .lock()
                .unwrap()
                .iter()
                .map(|(doc, _)| doc.content.clone())
                .collect()
        }
    }

    #[async_trait]
    impl DraftStore for FakeStore {
        async fn save(&self, title: &str, content: &str) -> Result<()> {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if !self.latency.is_zero() {
                sleep(self.latency).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail.load(Ordering::SeqCst) {
                bail!("connection refused");
            }
            self.saves
                .lock()
                .unwrap()
                .push((EditorDocument::new(title, content), Instant::now()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingShell {
        notifications: Mutex<Vec<(String, String)>>,
    }

    impl DesktopShell for RecordingShell {
        fn show_notification(&self, title: &str, body: &str) {
            self.notifications
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
        }
    }

    fn session_with(store: &Arc<FakeStore>, document: EditorDocument) -> EditorSession {
        EditorSession::new(document, store.clone(), SessionOptions::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_after_typing() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());

        session.set_content("Hello world");
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(session.stats().is_dirty);

        sleep(Duration::from_millis(2001)).await;

        assert_eq!(session.status(), SaveStatus::Saved);
        let stats = session.stats();
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 11);
        assert_eq!(stats.reading_time_minutes, 1);
        assert!(!stats.is_dirty);
        assert!(stats.last_saved.is_some());
        assert_eq!(store.saved_contents(), vec!["Hello world"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_bursts_coalesce() {
        let start = Instant::now();
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());

        session.set_content("H");
        sleep(Duration::from_millis(500)).await;
        session.set_content("He");
        sleep(Duration::from_millis(500)).await;
        session.set_content("Hey");

        sleep(Duration::from_secs(10)).await;
        let saves = store.saves.lock().unwrap().clone();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0.content, "Hey");
        assert_eq!(saves[0].1 - start, Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_autosave_then_explicit_save() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());

        store.fail.store(true, Ordering::SeqCst);
        session.set_content("Draft one");
        sleep(Duration::from_millis(2001)).await;

        assert_eq!(session.status(), SaveStatus::Error);
        assert!(session.is_dirty());
        assert!(session.last_saved().is_none());
        assert_eq!(session.last_error().as_deref(), Some("connection refused"));

        // No automatic retry.
        sleep(Duration::from_secs(10)).await;
        assert_eq!(session.status(), SaveStatus::Error);

        store.fail.store(false, Ordering::SeqCst);
        session.set_title("Better");
        assert_eq!(session.save_now().await, SaveOutcome::Saved);

        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());
        assert_eq!(session.last_error(), None);
        let saves = store.saves.lock().unwrap().clone();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, EditorDocument::new("Better", "Draft one"));

        // The explicit save replaced the pending autosave.
        sleep(Duration::from_secs(10)).await;
        assert_eq!(store.saves.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_content_is_never_saved() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());

        session.set_content("   \n\n  ");
        assert_eq!(session.status(), SaveStatus::Saved);
        session.set_content("# ");
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(session.is_dirty());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(session.save_now().await, SaveOutcome::Skipped);
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(store.saved_contents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_content_drops_pending_autosave() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());

        session.set_content("something");
        sleep(Duration::from_millis(500)).await;
        session.set_content("");

        sleep(Duration::from_secs(10)).await;
        assert!(store.saved_contents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverting_edit_returns_to_saved() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::new("T", "Body"));

        session.set_content("Body!");
        assert_eq!(session.status(), SaveStatus::Unsaved);
        session.set_content("Body");
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());

        sleep(Duration::from_secs(10)).await;
        assert!(store.saved_contents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_during_save_stays_dirty() {
        let store = Arc::new(FakeStore::with_latency(Duration::from_millis(1000)));
        let session = session_with(&store, EditorDocument::default());

        session.set_content("one");
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(session.status(), SaveStatus::Saving);

        session.set_content("two");
        assert_eq!(session.status(), SaveStatus::Unsaved);

        // First save lands at 3000ms with "one"; "two" is still unsaved.
        sleep(Duration::from_millis(600)).await;
        assert_eq!(store.saved_contents(), vec!["one"]);
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(session.is_dirty());
        assert!(session.last_saved().is_some());

        // The autosave for "two" fires at 4500ms and lands at 5500ms.
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(store.saved_contents(), vec!["one", "two"]);
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_revert_during_save_is_saved_afterwards() {
        let store = Arc::new(FakeStore::with_latency(Duration::from_millis(1000)));
        let session = session_with(&store, EditorDocument::new("T", "Body"));

        session.set_content("Body edited");
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(session.status(), SaveStatus::Saving);

        // Matches the old snapshot, but the store is about to hold "Body edited".
        session.set_content("Body");
        assert_eq!(session.status(), SaveStatus::Saving);

        sleep(Duration::from_millis(600)).await;
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(session.is_dirty());

        sleep(Duration::from_secs(30)).await;
        assert_eq!(store.saved_contents(), vec!["Body edited", "Body"]);
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_revert_during_failed_save_settles_on_saved() {
        let store = Arc::new(FakeStore::with_latency(Duration::from_millis(1000)));
        let session = session_with(&store, EditorDocument::new("T", "Body"));

        store.fail.store(true, Ordering::SeqCst);
        session.set_content("Body edited");
        sleep(Duration::from_millis(2500)).await;
        session.set_content("Body");

        sleep(Duration::from_millis(600)).await;
        assert_eq!(session.status(), SaveStatus::Error);

        // The follow-up autosave finds the text already in the store.
        sleep(Duration::from_secs(30)).await;
        assert!(store.saved_contents().is_empty());
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(!session.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_save_waits_for_autosave_in_flight() {
        let start = Instant::now();
        let store = Arc::new(FakeStore::with_latency(Duration::from_millis(1000)));
        let session = session_with(&store, EditorDocument::default());

        session.set_content("one");
        sleep(Duration::from_millis(2500)).await;
        session.set_content("two");

        assert_eq!(session.save_now().await, SaveOutcome::Saved);
        assert_eq!(start.elapsed(), Duration::from_millis(4000));
        assert_eq!(store.saved_contents(), vec!["one", "two"]);
        assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(session.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_save_notifies_shell() {
        let store = Arc::new(FakeStore::default());
        let shell = Arc::new(RecordingShell::default());
        let session = EditorSession::with_shell(
            EditorDocument::default(),
            store.clone(),
            shell.clone(),
            SessionOptions::default(),
        );

        session.set_content("Ready to publish");
        assert_eq!(session.save_now().await, SaveOutcome::Saved);

        let notifications = shell.notifications.lock().unwrap().clone();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].0, "Draft Saved");
    }

    #[tokio::test(start_paused = true)]
    async fn test_readonly_never_saves() {
        let store = Arc::new(FakeStore::default());
        let options = SessionOptions {
            readonly: true,
            ..SessionOptions::default()
        };
        let session = EditorSession::new(EditorDocument::default(), store.clone(), options);

        session.set_content("look but don't touch");
        assert_eq!(session.status(), SaveStatus::Saved);
        assert!(session.is_dirty());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(session.save_now().await, SaveOutcome::Skipped);
        assert!(store.saved_contents().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toolbar_insertion_marks_dirty() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::new("", "hello world"));

        let selection = session.apply_toolbar(ToolbarAction::Bold, Selection::new(6, 11));
        assert_eq!(session.content(), "hello **world**");
        assert_eq!(selection, Selection::new(8, 13));
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(session.preview_html().contains("<strong>world</strong>"));

        let selection = session.insert_markup(Selection::cursor(0), "# ", "");
        assert_eq!(selection, Selection::cursor(2));
        assert_eq!(session.content(), "# hello **world**");
    }

    #[tokio::test(start_paused = true)]
    async fn test_insertion_at_content_cap_keeps_selection_in_text() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::new("", "a".repeat(MAX_CONTENT_CHARS)));

        let end = MAX_CONTENT_CHARS;
        let selection = session.insert_markup(Selection::new(end - 2, end), "**", "**");
        let content = session.content();
        assert_eq!(content.chars().count(), MAX_CONTENT_CHARS);
        assert!(selection.end <= content.len());
        assert_eq!(selection, Selection::new(end, end));
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_is_capped() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());
        session.set_content("a".repeat(MAX_CONTENT_CHARS + 5));
        assert_eq!(session.stats().characters, MAX_CONTENT_CHARS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_line() {
        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());
        assert_eq!(session.status_line(Utc::now()), "Saved");

        session.set_content("words");
        assert_eq!(session.status_line(Utc::now()), "Unsaved");

        session.save_now().await;
        assert_eq!(session.status_line(Utc::now()), "Saved just now");
    }

    #[tokio::test]
    async fn test_open_and_export_file() {
        let dir = std::env::temp_dir().join(format!("drafter-session-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("Launch Notes.md");
        std::fs::write(&source, "# Launch\n\nShip it").unwrap();

        let store = Arc::new(FakeStore::default());
        let session = session_with(&store, EditorDocument::default());
        session.open_file(&source).await.unwrap();

        assert_eq!(session.title(), "Launch Notes");
        assert_eq!(session.content(), "# Launch\n\nShip it");
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert_eq!(session.excerpt(150), "Launch Ship it");

        let target = dir.join("export.md");
        session.export_markdown(&target).await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Launch\n\nShip it");

        assert!(session.open_file(&dir.join("missing.md")).await.is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
