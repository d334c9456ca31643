use std::fmt::Debug;

use blogstore_types::Post;
use thiserror::Error;

/// A type-erased [`Backend`] instance.
pub type BoxedBackend = Box<dyn Backend>;

/// Whole-collection storage for posts.
///
/// Backends have no notion of individual posts. They load and store the complete, ordered list.
#[async_trait::async_trait]
pub trait Backend: Debug + Send + Sync + 'static {
    /// The backend name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Prepares the backend for use, for example by creating an empty data file.
    ///
    /// This is called once when the service is constructed, before any request is served.
    async fn init(&self) -> BackendResult<()> {
        Ok(())
    }

    /// Loads all posts in stored order.
    ///
    /// Backends that have never been written to return an empty list. Loading never writes.
    async fn load(&self) -> BackendResult<Vec<Post>>;

    /// Replaces the stored collection with `posts`.
    async fn store(&self, posts: &[Post]) -> BackendResult<()>;
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// IO errors related to file operations.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to de/serialization.
    #[error("serde error: {context}")]
    Serde {
        /// What was being de/serialized.
        context: String,
        /// The underlying JSON error.
        #[source]
        cause: serde_json::Error,
    },
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
