/// User-facing signals consumed by the presentation layer
///
/// The core never talks to a screen directly. Toasts, the upload spinner,
/// and re-render requests all go through this trait, so the core can run
/// against a recording fake in tests and against the terminal in the binary.

use tracing::debug;

/// How long a toast stays visible in a graphical shell, in milliseconds.
pub const TOAST_DURATION_MS: u64 = 3_000;

pub trait UserFeedback: Send + Sync {
    /// Show a short notification to the user.
    fn toast(&self, message: &str);

    /// Show the blocking progress indicator with a message.
    fn loading_on(&self, message: &str);

    /// Dismiss the progress indicator. Always called exactly once per
    /// `loading_on`, whatever the outcome.
    fn loading_off(&self);

    /// The roll changed; the list view should re-render.
    fn refresh(&self);
}

/// Terminal rendition of the shell signals.
pub struct TerminalFeedback;

impl UserFeedback for TerminalFeedback {
    fn toast(&self, message: &str) {
        debug!(duration_ms = TOAST_DURATION_MS, "toast presented");
        println!("💬 {}", message);
    }

    fn loading_on(&self, message: &str) {
        println!("⏳ {}", message);
    }

    fn loading_off(&self) {}

    fn refresh(&self) {
        debug!("re-render requested");
    }
}

/// Records every signal so tests can assert on exact notification counts.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingFeedback {
    toasts: std::sync::Mutex<Vec<String>>,
    loading_shown: std::sync::Mutex<Vec<String>>,
    loading_dismissed: std::sync::atomic::AtomicUsize,
    refreshes: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingFeedback {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn loading_shown(&self) -> Vec<String> {
        self.loading_shown.lock().unwrap().clone()
    }

    pub fn loading_dismissed(&self) -> usize {
        self.loading_dismissed.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl UserFeedback for RecordingFeedback {
    fn toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }

    fn loading_on(&self, message: &str) {
        self.loading_shown.lock().unwrap().push(message.to_string());
    }

    fn loading_off(&self) {
        self.loading_dismissed
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn refresh(&self) {
        self.refreshes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
