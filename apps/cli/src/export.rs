//! Plain-text export of resume content.
//!
//! PDF rendering is out of scope; exports are text files with a fixed
//! default filename per command.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::errors::AppError;

/// Default filename for an improved resume produced by analysis.
pub const IMPROVED_RESUME_FILE: &str = "Improved_Resume.txt";
/// Default filename for a generated resume document.
pub const GENERATED_RESUME_FILE: &str = "SkillSense_Resume.txt";

/// Writes `content` to `path`, creating parent directories as needed.
/// Returns the path written, for display.
pub fn write_text(content: &str, path: &Path) -> Result<PathBuf, AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(GENERATED_RESUME_FILE);

        let written = write_text("JANE DOE\nDeveloper", &path).unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "JANE DOE\nDeveloper");
    }

    #[test]
    fn test_write_text_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports/deep").join(IMPROVED_RESUME_FILE);

        write_text("content", &path).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_write_text_reports_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();

        // The directory itself is not a writable file target.
        let outcome = write_text("content", dir.path());

        assert!(matches!(outcome, Err(AppError::Internal(_))));
    }
}
