use std::sync::Arc;

use blogstore_service::{BlogService, StorageConfig};

use crate::config::{Config, Storage};

/// Shared reference to the blogstore [service state](State).
pub type ServiceState = Arc<State>;

/// Reference to the blogstore business logic.
///
/// This structure is created during server startup and shared with all HTTP request handlers.
///
/// In request handlers, use `axum::extract::State<ServiceState>` to retrieve a shared reference to
/// this structure.
#[derive(Debug)]
pub struct State {
    /// The server configuration.
    pub config: Config,
    /// The blog service instance.
    pub service: BlogService,
}

impl State {
    /// Creates the services for the given configuration.
    ///
    /// Fails if the storage backend cannot be initialized, for example when the data directory is
    /// not writable.
    pub async fn new(config: Config) -> anyhow::Result<ServiceState> {
        let service = BlogService::new(map_storage_config(&config.storage)).await?;
        Ok(Arc::new(Self { config, service }))
    }
}

fn map_storage_config(config: &'_ Storage) -> StorageConfig<'_> {
    match config {
        Storage::FileSystem { path } => StorageConfig::FileSystem { path },
    }
}
