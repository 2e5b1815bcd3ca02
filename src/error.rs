/// Failure kinds surfaced at operation boundaries
///
/// Every variant is caught where the operation runs and converted into a
/// single user-visible notification; none of them crash the process and
/// nothing is retried automatically.

use std::io;
use thiserror::Error;

use crate::upload::transport::TransportError;

#[derive(Debug, Error)]
pub enum CourierError {
    /// A source photo could not be copied into managed storage.
    /// No registry or store mutation happens when this is raised.
    #[error("could not copy {name} into managed storage: {source}")]
    Copy { name: String, source: io::Error },

    /// A backing file was missing or unreadable at upload time.
    /// No request is sent when this is raised.
    #[error("could not read {name}: {source}")]
    Read { name: String, source: io::Error },

    /// A backing file could not be deleted. Logical removal has already
    /// committed by the time this is raised and is not rolled back.
    #[error("could not delete {name}: {source}")]
    Delete { name: String, source: io::Error },

    /// The endpoint answered outside the 2xx class. The entry is retained
    /// for a later re-upload.
    #[error("upload rejected with HTTP status {status}")]
    Rejected { status: u16 },

    /// The request never produced an outcome.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
