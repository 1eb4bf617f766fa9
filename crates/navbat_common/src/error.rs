// --- File: crates/navbat_common/src/error.rs ---

use thiserror::Error;

/// Errors surfaced by record store implementations.
///
/// Store failures are transient infrastructure faults as far as the
/// scheduler is concerned: they are recoverable with retry-later messaging
/// and must never be silently treated as success.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store rejected an insert.
    #[error("Insert rejected: {0}")]
    InsertRejected(String),

    /// A query failed or the store was unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded into a domain model.
    #[error("Failed to decode stored row: {0}")]
    Decode(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by error types so handlers can map failures to responses
/// consistently.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for StoreError {
    fn status_code(&self) -> u16 {
        match self {
            StoreError::InsertRejected(_) => 503,
            StoreError::Unavailable(_) => 503,
            StoreError::Decode(_) => 500,
        }
    }
}
