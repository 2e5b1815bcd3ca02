/// Managed storage for photo files
///
/// The vault is the only component that touches image files on disk. It maps
/// a storage-relative name to an absolute path and a display URI, copies
/// imported photos into the managed directory, and deletes backing files
/// when an entry is removed.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::error::CourierError;

/// Extension given to every imported photo.
const IMAGE_EXT: &str = ".jpg";

pub struct FileVault {
    root: PathBuf,
}

impl FileVault {
    /// Open the managed storage directory, creating it if needed.
    ///
    /// - Linux: ~/.local/share/photo-courier
    /// - macOS: ~/Library/Application Support/photo-courier
    /// - Windows: %APPDATA%\photo-courier
    pub fn open() -> Self {
        let mut root = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");
        root.push("photo-courier");
        Self::at(root)
    }

    /// Vault rooted at an explicit directory.
    pub fn at(root: PathBuf) -> Self {
        std::fs::create_dir_all(&root).expect("Failed to create managed storage directory");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute storage path for a managed file name.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Display-resolvable URI for an absolute storage path.
    ///
    /// Empty input stays empty; the same path always maps to the same URI.
    pub fn display_path(path: &str) -> String {
        if path.is_empty() {
            String::new()
        } else {
            format!("file://{}", path)
        }
    }

    /// Generate a fresh storage name from the current time in milliseconds.
    pub fn new_file_name() -> String {
        format!("{}{}", Utc::now().timestamp_millis(), IMAGE_EXT)
    }

    /// Copy a source photo into managed storage under `dest_name`.
    pub async fn copy_into(
        &self,
        source_dir: &Path,
        source_name: &str,
        dest_name: &str,
    ) -> Result<PathBuf, CourierError> {
        let source = source_dir.join(source_name);
        let dest = self.path_of(dest_name);

        tokio::fs::copy(&source, &dest)
            .await
            .map_err(|e| CourierError::Copy {
                name: source_name.to_string(),
                source: e,
            })?;

        Ok(dest)
    }

    /// Delete the backing file for `name`.
    pub async fn remove(&self, name: &str) -> Result<(), CourierError> {
        tokio::fs::remove_file(self.path_of(name))
            .await
            .map_err(|e| CourierError::Delete {
                name: name.to_string(),
                source: e,
            })
    }
}
