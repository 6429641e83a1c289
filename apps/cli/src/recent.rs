//! Recent-resumes cache.
//!
//! A bounded, newest-first list of resume texts persisted as one JSON file,
//! so improved and generated resumes survive restarts. The cache sits
//! outside the session store: a session reset does not touch it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum number of entries kept on disk. The oldest entries fall off.
pub const MAX_RECENT_ENTRIES: usize = 20;

const CACHE_FILE_NAME: &str = "recent_resumes.json";

/// One saved resume text. `id` is a millisecond timestamp, kept strictly
/// increasing across saves; entries are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentResumeEntry {
    pub id: i64,
    pub text: String,
}

/// File-backed recent list. Every failure degrades to the empty sequence or
/// a skipped write; nothing here is fatal and nothing propagates.
#[derive(Debug, Clone)]
pub struct RecentResumes {
    path: PathBuf,
}

impl RecentResumes {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform-default cache location:
    /// `<data dir>/skillsense/recent_resumes.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillsense")
            .join(CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prepends a new entry and truncates to the cap. Write failures are
    /// logged and swallowed; the cache is best-effort by contract.
    pub fn save(&self, text: &str) {
        if let Err(error) = self.try_save(text) {
            warn!(path = %self.path.display(), %error, "failed to save recent resume");
        }
    }

    fn try_save(&self, text: &str) -> std::io::Result<()> {
        let mut entries = self.load_all();
        let id = next_id(entries.first().map(|entry| entry.id));
        entries.insert(
            0,
            RecentResumeEntry {
                id,
                text: text.to_string(),
            },
        );
        entries.truncate(MAX_RECENT_ENTRIES);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&entries)?;
        fs::write(&self.path, json)
    }

    /// Returns the persisted sequence, newest first. An absent file is the
    /// empty sequence; a corrupt file is logged and also loads as empty, to
    /// be overwritten by the next save.
    pub fn load_all(&self) -> Vec<RecentResumeEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "corrupt recent-resumes cache, starting empty"
                );
                Vec::new()
            }
        }
    }
}

/// Millisecond timestamp for a new entry, bumped past the newest existing
/// id so ids stay strictly increasing even when two saves land within the
/// same millisecond.
fn next_id(newest: Option<i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match newest {
        Some(id) if id >= now => id + 1,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_in(dir: &tempfile::TempDir) -> RecentResumes {
        RecentResumes::new(dir.path().join("recent_resumes.json"))
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        cache.save("My improved resume");

        let entries = cache.load_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "My improved resume");
    }

    #[test]
    fn test_newest_entry_comes_first() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        cache.save("older");
        cache.save("newer");

        let entries = cache.load_all();
        assert_eq!(entries[0].text, "newer");
        assert_eq!(entries[1].text, "older");
    }

    #[test]
    fn test_cap_evicts_oldest_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        for i in 0..=MAX_RECENT_ENTRIES {
            cache.save(&format!("resume-{i}"));
        }

        let entries = cache.load_all();
        assert_eq!(entries.len(), MAX_RECENT_ENTRIES);
        assert_eq!(entries[0].text, format!("resume-{MAX_RECENT_ENTRIES}"));
        assert!(entries.iter().all(|entry| entry.text != "resume-0"));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        cache.save("a");
        cache.save("b");
        cache.save("c");

        let entries = cache.load_all();
        assert!(entries[0].id > entries[1].id);
        assert!(entries[1].id > entries[2].id);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);

        assert!(cache.load_all().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        std::fs::write(cache.path(), "{not json[[").unwrap();

        assert!(cache.load_all().is_empty());
    }

    #[test]
    fn test_save_recovers_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        std::fs::write(cache.path(), "{not json[[").unwrap();

        cache.save("fresh start");

        let entries = cache.load_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "fresh start");
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        std::fs::write(cache.path(), r#"{"improvedResumes": 42}"#).unwrap();

        assert!(cache.load_all().is_empty());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RecentResumes::new(dir.path().join("nested/dirs/recent.json"));

        cache.save("entry");

        assert_eq!(cache.load_all().len(), 1);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        // A directory at the cache path makes the write fail.
        let dir = tempfile::tempdir().unwrap();
        let cache = RecentResumes::new(dir.path());

        cache.save("entry");

        assert!(cache.load_all().is_empty());
    }
}
