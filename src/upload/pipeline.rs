/// Upload orchestration
///
/// Drives one entry through read → submit → outcome, with the progress
/// indicator up for exactly the duration of the request. On acceptance the
/// uploaded entry is cleaned out of the roll by name; on any other outcome
/// the roll is left alone so the user can retry by hand.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::CourierError;
use crate::registry::{ImageEntry, ImageRegistry};
use crate::ui::UserFeedback;

use super::payload;
use super::transport::{UploadTarget, UploadTransport};

pub struct Uploader {
    transport: Box<dyn UploadTransport>,
    target: UploadTarget,
    feedback: Arc<dyn UserFeedback>,
}

impl Uploader {
    pub fn new(
        transport: Box<dyn UploadTransport>,
        target: UploadTarget,
        feedback: Arc<dyn UserFeedback>,
    ) -> Self {
        Self {
            transport,
            target,
            feedback,
        }
    }

    /// Upload one roll entry and reconcile the roll with the outcome.
    pub async fn upload(&self, registry: &mut ImageRegistry, name: &str) {
        let Some(entry) = registry.find(name).cloned() else {
            warn!("no roll entry named {}", name);
            self.feedback.toast("Error while reading file.");
            return;
        };

        let bytes = match self.read_bytes(&entry).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{}", e);
                self.feedback.toast("Error while reading file.");
                return;
            }
        };
        debug!("read {} bytes from {}", bytes.len(), entry.name);

        let form = payload::build_form(bytes, &entry.name);

        self.feedback.loading_on("Uploading image...");
        let outcome = self.transport.submit(form, &self.target).await;
        self.feedback.loading_off();

        match outcome {
            Ok(response) if response.is_success() => {
                self.feedback.toast("File upload complete.");
                registry.remove_by_name(&entry.name).await;
            }
            Ok(response) => {
                let rejected = CourierError::Rejected {
                    status: response.status,
                };
                warn!("{} not accepted: {}", entry.name, rejected);
                self.feedback.toast("File upload failed.");
            }
            Err(e) => {
                warn!("{} not delivered: {}", entry.name, CourierError::from(e));
                self.feedback.toast("File upload failed.");
            }
        }
    }

    /// Read the full backing file for an entry.
    async fn read_bytes(&self, entry: &ImageEntry) -> Result<Vec<u8>, CourierError> {
        tokio::fs::read(&entry.file_path)
            .await
            .map_err(|e| CourierError::Read {
                name: entry.name.clone(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::super::payload::UploadForm;
    use super::super::transport::{TransportError, UploadResponse};
    use super::*;
    use crate::store::backend::MemoryBackend;
    use crate::store::images::ImageStore;
    use crate::ui::RecordingFeedback;
    use crate::vault::FileVault;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Answers every submit with a fixed status and counts the calls.
    struct ScriptedTransport {
        status: u16,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UploadTransport for ScriptedTransport {
        async fn submit(
            &self,
            _form: UploadForm,
            _target: &UploadTarget,
        ) -> Result<UploadResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UploadResponse {
                status: self.status,
            })
        }
    }

    /// Never produces a response.
    struct UnreachableTransport;

    #[async_trait]
    impl UploadTransport for UnreachableTransport {
        async fn submit(
            &self,
            _form: UploadForm,
            _target: &UploadTarget,
        ) -> Result<UploadResponse, TransportError> {
            Err(TransportError::NoResponse("connection refused".to_string()))
        }
    }

    struct Fixture {
        registry: ImageRegistry,
        backend: Arc<MemoryBackend>,
        feedback: Arc<RecordingFeedback>,
        vault_dir: TempDir,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let feedback = RecordingFeedback::new();
        let vault_dir = tempfile::tempdir().unwrap();

        let registry = ImageRegistry::new(
            ImageStore::new(Box::new(Arc::clone(&backend))),
            FileVault::at(vault_dir.path().to_path_buf()),
            feedback.clone(),
        );

        Fixture {
            registry,
            backend,
            feedback,
            vault_dir,
        }
    }

    impl Fixture {
        /// Materialize a backing file and record it in the roll.
        async fn seed(&mut self, name: &str) {
            std::fs::write(self.vault_dir.path().join(name), b"jpeg bytes").unwrap();
            assert!(self.registry.add(name.to_string()).await);
        }

        fn persisted(&self) -> Vec<String> {
            ImageStore::new(Box::new(Arc::clone(&self.backend))).load()
        }

        fn uploader(&self, status: u16) -> (Uploader, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let uploader = Uploader::new(
                Box::new(ScriptedTransport {
                    status,
                    calls: Arc::clone(&calls),
                }),
                UploadTarget::default(),
                self.feedback.clone(),
            );
            (uploader, calls)
        }
    }

    #[tokio::test]
    async fn test_accepted_upload_removes_the_entry() {
        let mut fx = fixture();
        fx.seed("1700000000000.jpg").await;
        let (uploader, calls) = fx.uploader(200);

        uploader.upload(&mut fx.registry, "1700000000000.jpg").await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(fx.persisted().is_empty());
        assert!(fx.registry.images().is_empty());
        assert!(!fx.vault_dir.path().join("1700000000000.jpg").exists());
        assert_eq!(
            fx.feedback.toasts(),
            vec!["File upload complete.", "File removed."]
        );
        assert_eq!(fx.feedback.loading_shown(), vec!["Uploading image..."]);
        assert_eq!(fx.feedback.loading_dismissed(), 1);
    }

    #[tokio::test]
    async fn test_rejected_upload_preserves_the_entry() {
        let mut fx = fixture();
        fx.seed("1700000000000.jpg").await;
        let (uploader, _) = fx.uploader(500);

        uploader.upload(&mut fx.registry, "1700000000000.jpg").await;

        assert_eq!(fx.persisted(), vec!["1700000000000.jpg"]);
        assert_eq!(fx.registry.images().len(), 1);
        assert!(fx.vault_dir.path().join("1700000000000.jpg").exists());
        // Exactly one failure notification.
        assert_eq!(fx.feedback.toasts(), vec!["File upload failed."]);
        assert_eq!(fx.feedback.loading_dismissed(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_preserves_the_entry() {
        let mut fx = fixture();
        fx.seed("1700000000000.jpg").await;
        let uploader = Uploader::new(
            Box::new(UnreachableTransport),
            UploadTarget::default(),
            fx.feedback.clone(),
        );

        uploader.upload(&mut fx.registry, "1700000000000.jpg").await;

        assert_eq!(fx.persisted(), vec!["1700000000000.jpg"]);
        assert_eq!(fx.registry.images().len(), 1);
        assert_eq!(fx.feedback.toasts(), vec!["File upload failed."]);
        assert_eq!(fx.feedback.loading_dismissed(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_file_sends_nothing() {
        let mut fx = fixture();
        // Recorded but never materialized on disk.
        assert!(fx.registry.add("ghost.jpg".to_string()).await);
        let (uploader, calls) = fx.uploader(200);

        uploader.upload(&mut fx.registry, "ghost.jpg").await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(fx.feedback.loading_shown().is_empty());
        assert_eq!(fx.feedback.toasts(), vec!["Error while reading file."]);
        assert_eq!(fx.persisted(), vec!["ghost.jpg"]);
    }

    #[tokio::test]
    async fn test_unknown_name_sends_nothing() {
        let mut fx = fixture();
        let (uploader, calls) = fx.uploader(200);

        uploader.upload(&mut fx.registry, "nope.jpg").await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.feedback.toasts(), vec!["Error while reading file."]);
    }

    #[tokio::test]
    async fn test_cleanup_targets_the_uploaded_entry_not_the_head() {
        let mut fx = fixture();
        fx.seed("1700000000000.jpg").await;
        fx.seed("1700000000001.jpg").await;
        let (uploader, _) = fx.uploader(200);

        // The older entry sits at index 1; a new photo at the head must
        // survive its upload.
        uploader.upload(&mut fx.registry, "1700000000000.jpg").await;

        assert_eq!(fx.persisted(), vec!["1700000000001.jpg"]);
        assert_eq!(fx.registry.images().len(), 1);
        assert_eq!(fx.registry.images()[0].name, "1700000000001.jpg");
    }
}
