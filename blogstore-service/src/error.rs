//! Error types for the service layer.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors that can occur in the blog service.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the storage backend.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type for service operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
