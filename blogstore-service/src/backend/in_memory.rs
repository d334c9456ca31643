//! In-memory backend for tests.
//!
//! The backend is [`Clone`] so tests can hold a handle for direct inspection while the service
//! owns a boxed copy.

use std::sync::{Arc, Mutex};

use blogstore_types::Post;

use super::{Backend, BackendResult};

#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryBackend {
    posts: Arc<Mutex<Vec<Post>>>,
    stores: Arc<Mutex<usize>>,
}

impl InMemoryBackend {
    /// Returns a copy of the stored posts.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// Returns how often the collection has been written.
    pub fn store_count(&self) -> usize {
        *self.stores.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Backend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn load(&self) -> BackendResult<Vec<Post>> {
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn store(&self, posts: &[Post]) -> BackendResult<()> {
        *self.posts.lock().unwrap() = posts.to_vec();
        *self.stores.lock().unwrap() += 1;
        Ok(())
    }
}
