/// Durable storage for the photo roll
///
/// This module owns everything that outlives the process:
/// - The key-value backend and its SQLite implementation (backend.rs)
/// - The persisted list of image filenames (images.rs)

pub mod backend;
pub mod images;
