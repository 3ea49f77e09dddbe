use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::debounce::DEFAULT_DELAY;
use crate::metrics::DEFAULT_WORDS_PER_MINUTE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

// Editor settings, stored as JSON next to the app data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    pub autosave_delay_ms: u64,
    pub words_per_minute: usize,
    pub api_base_url: String,
    pub readonly: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_DELAY.as_millis() as u64,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            readonly: false,
        }
    }
}

impl EditorSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

/// Load settings from disk. A missing or unreadable file yields the defaults.
pub fn load_settings(path: &Path) -> EditorSettings {
    if !path.exists() {
        return EditorSettings::default();
    }

    match std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
            EditorSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &EditorSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating settings directory {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("writing settings to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("drafter-test-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.autosave_delay(), Duration::from_millis(2000));
        assert_eq!(settings.words_per_minute, 200);
        assert_eq!(settings.api_base_url, "http://localhost:8080");
        assert!(!settings.readonly);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"autosaveDelayMs": 500, "readonly": true}"#).unwrap();
        assert_eq!(settings.autosave_delay_ms, 500);
        assert!(settings.readonly);
        assert_eq!(settings.words_per_minute, 200);
    }

    #[test]
    fn test_save_then_load() {
        let dir = temp_dir("settings");
        let path = dir.join("nested").join("settings.json");

        let settings = EditorSettings {
            autosave_delay_ms: 750,
            words_per_minute: 250,
            api_base_url: "http://127.0.0.1:9000".to_string(),
            readonly: false,
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_settings(&path), EditorSettings::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_dir("missing").join("settings.json");
        assert_eq!(load_settings(&path), EditorSettings::default());
    }
}
