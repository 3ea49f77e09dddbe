use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters at which the footer progress bar reads full.
const PROGRESS_FULL_CHARS: usize = 5000;

// ---- Save status ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Unsaved,
    Error,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "saved",
            SaveStatus::Saving => "saving",
            SaveStatus::Unsaved => "unsaved",
            SaveStatus::Error => "error",
        }
    }

    /// Text shown next to the title.
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "Saved",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Unsaved => "Unsaved",
            SaveStatus::Error => "Save failed",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---- Derived stats ----

/// Footer numbers for the current document. Always derived from the session's
/// text and last confirmed save, never kept on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStats {
    pub words: usize,
    pub characters: usize,
    pub reading_time_minutes: usize,
    pub is_dirty: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

impl EditorStats {
    pub fn progress_percent(&self) -> f32 {
        (self.characters as f32 / PROGRESS_FULL_CHARS as f32 * 100.0).min(100.0)
    }
}

// ---- Relative time ----

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Human-friendly distance between `then` and `now`, falling back to an
/// absolute local date after a week.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        then.with_timezone(&Local)
            .format("%b %-d, %Y, %I:%M %p")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_status_labels() {
        assert_eq!(SaveStatus::default(), SaveStatus::Saved);
        assert_eq!(SaveStatus::Saving.label(), "Saving...");
        assert_eq!(SaveStatus::Error.to_string(), "Save failed");
        assert_eq!(serde_json::to_string(&SaveStatus::Unsaved).unwrap(), "\"unsaved\"");
    }

    #[test]
    fn test_progress_caps_at_full() {
        let mut stats = EditorStats {
            words: 0,
            characters: 2500,
            reading_time_minutes: 0,
            is_dirty: false,
            last_saved: None,
        };
        assert_eq!(stats.progress_percent(), 50.0);
        stats.characters = 12_000;
        assert_eq!(stats.progress_percent(), 100.0);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(2), now), "2 days ago");
        assert!(format_relative_time(now - Duration::days(30), now).contains("2024"));
    }
}
