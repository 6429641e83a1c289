//! CLI command implementations. Presentation only: every command is a thin
//! consumer of the session store, the recent cache, and the export helper.

use std::path::PathBuf;

pub mod analyze;
pub mod chat;
pub mod generate;
pub mod recent;

/// Resolves an `--export` flag: absent means no export, the bare flag means
/// the command's default filename, an explicit value wins outright.
pub(crate) fn export_target(flag: Option<Option<PathBuf>>, default_name: &str) -> Option<PathBuf> {
    match flag {
        None => None,
        Some(None) => Some(PathBuf::from(default_name)),
        Some(Some(path)) => Some(path),
    }
}
