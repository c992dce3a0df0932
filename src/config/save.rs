//! The save pipeline: resolve, back up, then write.
//!
//! This sequence assumes no other process writes the same config path
//! concurrently; the consuming layer only reads it at its own startup.

use std::path::Path;

use crate::error::PyroclastError;

use super::backup::{self, BackupRecord};
use super::document::SettingsDocument;
use super::resolver::{self, ConfigCandidate, EffectiveConfig};
use super::writer;

#[derive(Debug)]
pub struct SaveReport {
    pub effective: EffectiveConfig,
    /// Present when a pre-existing file was archived before the write.
    pub backup: Option<BackupRecord>,
}

/// Commit a settings document to the effective config location.
///
/// When the target already exists it is archived first; a backup
/// failure aborts the save and leaves the live file untouched.
pub fn save(
    doc: &SettingsDocument,
    candidates: &[ConfigCandidate],
    backup_root: &Path,
) -> Result<SaveReport, PyroclastError> {
    let effective = resolver::resolve(candidates)?;

    let backup = if effective.selected.path.exists() {
        Some(backup::backup(&effective.selected.path, backup_root)?)
    } else {
        None
    };

    writer::write(&effective.selected.path, doc)?;

    Ok(SaveReport { effective, backup })
}
