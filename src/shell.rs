use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Host-side capabilities of the desktop window. Calls are fire-and-forget.
pub trait DesktopShell: Send + Sync {
    fn show_notification(&self, title: &str, body: &str);
}

/// Used when the editor runs without a desktop host.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShell;

impl DesktopShell for NoShell {
    fn show_notification(&self, _title: &str, _body: &str) {}
}

/// Draft title for an opened file: its name minus a markdown or text extension.
pub fn title_from_file_name(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return "Untitled".to_string();
    };

    let title = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if MARKDOWN_EXTENSIONS.contains(&ext) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name),
        _ => name,
    };

    if title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

pub async fn read_markdown_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file {}", path.display()))
}

pub async fn write_markdown_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file {}", path.display()))
}
