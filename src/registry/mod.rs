/// The in-memory photo roll
///
/// The registry owns the ordered view the list screen renders, keeps it
/// convergent with the persisted list, and is the only component allowed to
/// mutate either. The presentation layer gets read-only snapshots and hears
/// about changes through the feedback trait.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

use crate::store::images::ImageStore;
use crate::ui::UserFeedback;
use crate::vault::FileVault;

/// One managed photo.
///
/// `name` is the persisted identity; both paths are derived from it on load
/// and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageEntry {
    /// Generated filename, e.g. "1700000000000.jpg"
    pub name: String,
    /// Display-resolvable URI for the same file
    pub path: String,
    /// Absolute path in managed storage
    pub file_path: PathBuf,
}

pub struct ImageRegistry {
    images: Vec<ImageEntry>,
    store: ImageStore,
    vault: FileVault,
    feedback: Arc<dyn UserFeedback>,
}

impl ImageRegistry {
    pub fn new(store: ImageStore, vault: FileVault, feedback: Arc<dyn UserFeedback>) -> Self {
        Self {
            images: Vec::new(),
            store,
            vault,
            feedback,
        }
    }

    /// Read-only snapshot of the roll, newest first.
    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    pub fn find(&self, name: &str) -> Option<&ImageEntry> {
        self.images.iter().find(|e| e.name == name)
    }

    fn entry_for(&self, name: String) -> ImageEntry {
        let file_path = self.vault.path_of(&name);
        let path = FileVault::display_path(&file_path.to_string_lossy());
        ImageEntry {
            name,
            path,
            file_path,
        }
    }

    /// Rebuild the in-memory roll from the persisted list.
    ///
    /// Replaces the sequence wholesale: each persisted name is rebuilt with
    /// the vault's path rules and inserted at the head, so the newest entry
    /// ends up first. Entries whose backing file has gone missing are kept
    /// but logged; a later delete or re-import reconciles them.
    pub async fn reload(&mut self) {
        let names = self.store.load();
        self.images.clear();

        for name in names {
            let entry = self.entry_for(name);
            if !matches!(tokio::fs::try_exists(&entry.file_path).await, Ok(true)) {
                warn!("backing file missing for {}", entry.name);
            }
            self.images.insert(0, entry);
        }
    }

    /// Bring a photo from anywhere on disk into the roll.
    ///
    /// The source path is split into directory and filename the same way the
    /// capture hand-off splits a camera URI; the copy happens under a fresh
    /// generated name. Returns the generated name once the entry is fully
    /// recorded, `None` if anything failed (the user has been notified).
    pub async fn import(&mut self, source: &Path) -> Option<String> {
        let (Some(dir), Some(file_name)) = (source.parent(), source.file_name()) else {
            warn!("unusable source path: {}", source.display());
            self.feedback.toast("Error while storing file.");
            return None;
        };
        let file_name = file_name.to_string_lossy();

        let dest = FileVault::new_file_name();
        match self.vault.copy_into(dir, &file_name, &dest).await {
            Ok(_) => {
                if self.add(dest.clone()).await {
                    Some(dest)
                } else {
                    None
                }
            }
            Err(e) => {
                warn!("{}", e);
                self.feedback.toast("Error while storing file.");
                None
            }
        }
    }

    /// Record a managed file: persist its name, then put it at the head of
    /// the roll and request a re-render.
    ///
    /// Returns false if persistence failed; the in-memory roll is left
    /// untouched in that case so the two views stay convergent.
    pub async fn add(&mut self, name: String) -> bool {
        if let Err(e) = self.store.append(&name) {
            error!("could not persist {}: {}", name, e);
            self.feedback.toast("Error while storing file.");
            return false;
        }

        let entry = self.entry_for(name);
        self.images.insert(0, entry);
        self.feedback.refresh();
        true
    }

    /// Remove the entry at `index` from the roll.
    ///
    /// The in-memory sequence drops it first, then the persisted list, then
    /// the backing file. A failed physical delete never rolls the logical
    /// removal back; the "File removed." toast fires after the delete
    /// attempt either way.
    pub async fn remove(&mut self, index: usize) {
        if index >= self.images.len() {
            warn!("remove index {} out of range", index);
            return;
        }
        let entry = self.images.remove(index);

        if let Err(e) = self.store.remove(&entry.name) {
            // The persisted list is now stale; reload will surface it again.
            error!("could not persist removal of {}: {}", entry.name, e);
        }

        if let Err(e) = self.vault.remove(&entry.name).await {
            warn!("{}", e);
        }

        self.feedback.toast("File removed.");
    }

    /// Remove an entry by its persisted identity.
    ///
    /// The upload pipeline cleans up through this, so an entry added while
    /// an upload is in flight can never be deleted in its place.
    pub async fn remove_by_name(&mut self, name: &str) {
        if let Some(index) = self.images.iter().position(|e| e.name == name) {
            self.remove(index).await;
        } else {
            warn!("no roll entry named {}", name);
        }
    }
}
