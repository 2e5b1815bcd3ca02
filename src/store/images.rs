/// The persisted image list
///
/// One JSON-encoded array of filenames under a single well-known key. The
/// filenames are the only persisted identity of a photo; display and storage
/// paths are re-derived on every load.

use tracing::warn;

use super::backend::{StorageBackend, StoreError};

/// Key under which the image list is persisted.
const STORAGE_KEY: &str = "my_images";

pub struct ImageStore {
    backend: Box<dyn StorageBackend>,
}

impl ImageStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Return the persisted list in insertion order.
    ///
    /// A missing key, an unreadable backend, or a value that is not valid
    /// JSON all degrade to an empty list. A corrupt value self-heals on the
    /// next write, so nothing is surfaced to the caller.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("could not read the stored image list: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(e) => {
                warn!("stored image list is not valid JSON ({}), treating as empty", e);
                Vec::new()
            }
        }
    }

    /// Add `name` to the end of the persisted list.
    pub fn append(&self, name: &str) -> Result<(), StoreError> {
        let mut names = self.load();
        names.push(name.to_string());
        self.save(&names)
    }

    /// Remove every occurrence of `name` and persist the filtered list.
    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let names: Vec<String> = self.load().into_iter().filter(|n| n != name).collect();
        self.save(&names)
    }

    fn save(&self, names: &[String]) -> Result<(), StoreError> {
        // A Vec<String> always serializes.
        let encoded = serde_json::to_string(names).expect("image list serialization");
        self.backend.set(STORAGE_KEY, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::super::backend::MemoryBackend;
    use super::*;
    use std::sync::Arc;

    fn store_over(backend: &Arc<MemoryBackend>) -> ImageStore {
        ImageStore::new(Box::new(Arc::clone(backend)))
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = store_over(&Arc::new(MemoryBackend::new()));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let store = store_over(&Arc::new(MemoryBackend::new()));
        store.append("a.jpg").unwrap();
        store.append("b.jpg").unwrap();
        assert_eq!(store.load(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_remove_filters_all_occurrences() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set(STORAGE_KEY, r#"["a.jpg","b.jpg","a.jpg"]"#)
            .unwrap();

        let store = store_over(&backend);
        store.remove("a.jpg").unwrap();
        assert_eq!(store.load(), vec!["b.jpg"]);
    }

    #[test]
    fn test_malformed_value_treated_as_empty() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set(STORAGE_KEY, "not-json").unwrap();

        let store = store_over(&backend);
        assert!(store.load().is_empty());

        // The next write replaces the corrupt value.
        store.append("x.jpg").unwrap();
        assert_eq!(store.load(), vec!["x.jpg"]);
    }
}
