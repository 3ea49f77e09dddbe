pub mod api;
pub mod debounce;
pub mod insertion;
pub mod markdown;
pub mod metrics;
pub mod session;
pub mod settings;
pub mod shell;
pub mod status;

use anyhow::Result;
use std::sync::Arc;

pub use api::{BlogDraft, DraftClient, DraftStore, RemoteDraftStore};
pub use insertion::{insert, Insertion, Selection, ToolbarAction};
pub use markdown::render;
pub use session::{EditorDocument, EditorSession, SaveOutcome, SessionOptions};
pub use settings::EditorSettings;
pub use shell::{DesktopShell, NoShell};
pub use status::{EditorStats, SaveStatus};

/// Open an editor session that saves to the drafts backend named in
/// `settings`. Pass `draft_id` to keep editing an existing draft; without it the
/// first save creates one.
pub fn remote_session(
    settings: &EditorSettings,
    document: EditorDocument,
    draft_id: Option<String>,
    shell: Arc<dyn DesktopShell>,
) -> Result<EditorSession> {
    let client = DraftClient::new(&settings.api_base_url)?;
    let store = match draft_id {
        Some(id) => RemoteDraftStore::for_draft(client, id),
        None => RemoteDraftStore::new(client),
    };
    tracing::debug!(base_url = %settings.api_base_url, "opening remote editor session");

    Ok(EditorSession::with_shell(
        document,
        Arc::new(store),
        shell,
        SessionOptions::from(settings),
    ))
}
