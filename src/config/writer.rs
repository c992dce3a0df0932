//! Atomic serialization of a settings document to disk.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::PyroclastError;

use super::document::SettingsDocument;

/// Write `doc` to `path` atomically.
///
/// Content is staged in a temp file in the target directory and made
/// visible with a single rename, so a crash mid-write never leaves a
/// truncated live file. Missing parent directories are created;
/// pre-existing ones are not an error.
pub fn write(path: &Path, doc: &SettingsDocument) -> Result<(), PyroclastError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(PyroclastError::Write)?;

    let mut staged = NamedTempFile::new_in(&parent).map_err(PyroclastError::Write)?;
    staged
        .write_all(doc.serialize().as_bytes())
        .map_err(PyroclastError::Write)?;
    staged.flush().map_err(PyroclastError::Write)?;
    staged
        .persist(path)
        .map_err(|err| PyroclastError::Write(err.error))?;

    Ok(())
}
