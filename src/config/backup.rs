//! Versioned copies of config files about to be overwritten.

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PyroclastError;

/// Immutable record of one backup. Archive entries are never mutated
/// or deleted by pyroclast.
#[derive(Debug, Clone)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub archive: PathBuf,
    pub created: DateTime<Local>,
}

/// Copy `path` byte-for-byte into the backup root as
/// `<timestamp>_<original-filename>`.
///
/// Only call this for an existing file. An existing archive entry is
/// never overwritten: on a same-second collision a numeric suffix is
/// appended instead.
pub fn backup(path: &Path, backup_root: &Path) -> Result<BackupRecord, PyroclastError> {
    fs::create_dir_all(backup_root).map_err(PyroclastError::Backup)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            PyroclastError::Backup(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("config path {} has no file name", path.display()),
            ))
        })?;

    let created = Local::now();
    let stamp = created.format("%Y%m%d-%H%M%S");

    let mut archive = backup_root.join(format!("{stamp}_{file_name}"));
    let mut attempt = 1u32;
    while archive.exists() {
        archive = backup_root.join(format!("{stamp}_{file_name}-{attempt}"));
        attempt += 1;
    }

    fs::copy(path, &archive).map_err(PyroclastError::Backup)?;

    Ok(BackupRecord {
        original: path.to_path_buf(),
        archive,
        created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_is_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("vkBasalt.conf");
        fs::write(&original, "effects = cas\ncasSharpness = 0.4\n").unwrap();
        let root = dir.path().join("backupfiles");

        let record = backup(&original, &root).unwrap();
        assert!(record.archive.starts_with(&root));
        assert_eq!(
            fs::read(&record.archive).unwrap(),
            fs::read(&original).unwrap()
        );

        let archive_name = record.archive.file_name().unwrap().to_str().unwrap();
        assert!(archive_name.ends_with("_vkBasalt.conf"));
    }

    #[test]
    fn test_same_second_backups_never_collide() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("vkBasalt.conf");
        fs::write(&original, "effects = cas\n").unwrap();
        let root = dir.path().join("backupfiles");

        // Fast enough that both land in the same timestamp second.
        let first = backup(&original, &root).unwrap();
        let second = backup(&original, &root).unwrap();
        let third = backup(&original, &root).unwrap();

        assert_ne!(first.archive, second.archive);
        assert_ne!(second.archive, third.archive);
        assert!(first.archive.exists());
        assert!(second.archive.exists());
        assert!(third.archive.exists());
    }

    #[test]
    fn test_missing_source_is_a_backup_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("vkBasalt.conf");
        let err = backup(&missing, &dir.path().join("backupfiles")).unwrap_err();
        assert!(matches!(err, PyroclastError::Backup(_)));
    }

    #[test]
    fn test_unwritable_backup_root_is_a_backup_error() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("vkBasalt.conf");
        fs::write(&original, "effects = cas\n").unwrap();

        // A plain file where the backup root should be makes
        // create_dir_all fail.
        let blocked_root = dir.path().join("backupfiles");
        fs::write(&blocked_root, "not a directory").unwrap();

        let err = backup(&original, &blocked_root).unwrap_err();
        assert!(matches!(err, PyroclastError::Backup(_)));
    }
}
