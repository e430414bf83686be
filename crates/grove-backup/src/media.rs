//! Media filesystem collaborator.
//!
//! The engine never reads a media root from ambient configuration; it is
//! handed a [`MediaStore`] whose root the caller chose.

use std::fs;
use std::path::{Path, PathBuf};

use grove_core::enums::MediaVariant;

use crate::error::BackupError;

pub trait MediaStore {
    /// Live media root.
    fn root(&self) -> &Path;

    /// Absolute path of a stored relative media path, if that file exists.
    fn existing_file(&self, relative: &Path) -> Option<PathBuf> {
        let path = self.root().join(relative);
        path.is_file().then_some(path)
    }

    /// Delete the media root and everything under it.
    ///
    /// # Errors
    ///
    /// `BackupError::Io` if removal fails.
    fn clear(&self) -> Result<(), BackupError> {
        let root = self.root();
        if root.exists() {
            fs::remove_dir_all(root).map_err(|e| BackupError::io(root, e))?;
        }
        Ok(())
    }

    /// Recursively copy the contents of `source` into the media root.
    /// Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// `BackupError::Io` on the first failed read or write.
    fn copy_tree(&self, source: &Path) -> Result<u64, BackupError> {
        copy_dir_all(source, self.root())
    }

    /// Create the root and its `full/` and `thumbs/` directories.
    ///
    /// # Errors
    ///
    /// `BackupError::Io` if a directory cannot be created.
    fn ensure_default_dirs(&self) -> Result<(), BackupError> {
        for variant in MediaVariant::ALL {
            let dir = self.root().join(variant.as_str());
            fs::create_dir_all(&dir).map_err(|e| BackupError::io(dir, e))?;
        }
        Ok(())
    }
}

/// Media stored in a local directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MediaStore for LocalMediaStore {
    fn root(&self) -> &Path {
        &self.root
    }
}

/// Copy `src` into `dest`, creating directories as needed. Symlinks are
/// skipped; nothing outside `src` is followed.
pub(crate) fn copy_dir_all(src: &Path, dest: &Path) -> Result<u64, BackupError> {
    fs::create_dir_all(dest).map_err(|e| BackupError::io(dest, e))?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(|e| BackupError::io(src, e))? {
        let entry = entry.map_err(|e| BackupError::io(src, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| BackupError::io(entry.path(), e))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if file_type.is_dir() {
            copied += copy_dir_all(&src_path, &dest_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dest_path).map_err(|e| BackupError::io(&dest_path, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
