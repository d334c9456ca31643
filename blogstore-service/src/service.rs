//! Core blog service and configuration.

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use blogstore_types::{Post, PostId, PostInput, PostStatus};
use tokio::sync::Mutex;

use crate::backend::{self, BoxedBackend};
use crate::error::Result;

/// Configuration to initialize a [`BlogService`].
#[derive(Debug, Clone)]
pub enum StorageConfig<'a> {
    /// Store all posts in a single JSON file.
    FileSystem {
        /// Path to the JSON file. Missing parent directories are created on first use.
        path: &'a Path,
    },
}

/// High-level asynchronous service for reading and writing blog posts.
///
/// The service is cheap to clone and can be shared across request handlers.
///
/// # Consistency
///
/// Each write loads the full collection, modifies it and stores it again. Writes are serialized
/// with an async mutex, so two requests in the same process never interleave their
/// read-modify-write cycles. Reads do not take the lock; the backend guarantees they observe
/// either the old or the new collection.
#[derive(Clone, Debug)]
pub struct BlogService(Arc<BlogServiceInner>);

#[derive(Debug)]
struct BlogServiceInner {
    backend: BoxedBackend,
    write_lock: Mutex<()>,
}

impl BlogService {
    /// Creates a new `BlogService` with the specified configuration.
    ///
    /// The backend is initialized before this returns, so a missing data file is created here and
    /// never by a request.
    pub async fn new(config: StorageConfig<'_>) -> Result<Self> {
        let backend: BoxedBackend = match config {
            StorageConfig::FileSystem { path } => Box::new(backend::JsonFile::new(path)),
        };
        backend.init().await?;
        Ok(Self::from_backend(backend))
    }

    pub(crate) fn from_backend(backend: BoxedBackend) -> Self {
        tracing::debug!(backend = backend.name(), "initializing blog service");
        Self(Arc::new(BlogServiceInner {
            backend,
            write_lock: Mutex::new(()),
        }))
    }

    /// Returns all posts in the order they were created.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self.0.backend.load().await?)
    }

    /// Returns the post with the given id, if it exists.
    pub async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        let posts = self.0.backend.load().await?;
        Ok(posts.into_iter().find(|post| &post.id == id))
    }

    /// Creates a new post with the given status and appends it to the collection.
    pub async fn create_post(&self, input: PostInput, status: PostStatus) -> Result<Post> {
        let _guard = self.0.write_lock.lock().await;

        let mut posts = self.0.backend.load().await?;
        let post = Post::create(input, status, SystemTime::now());
        posts.push(post.clone());
        self.0.backend.store(&posts).await?;

        tracing::debug!(id = %post.id, %status, "created post");
        Ok(post)
    }

    /// Updates an existing post in place and sets its status.
    ///
    /// Returns `None` without writing anything if no post with the given id exists.
    pub async fn update_post(
        &self,
        id: &PostId,
        input: PostInput,
        status: PostStatus,
    ) -> Result<Option<Post>> {
        let _guard = self.0.write_lock.lock().await;

        let mut posts = self.0.backend.load().await?;
        let Some(post) = posts.iter_mut().find(|post| &post.id == id) else {
            return Ok(None);
        };
        post.apply(input, status, SystemTime::now());
        let post = post.clone();
        self.0.backend.store(&posts).await?;

        tracing::debug!(%id, %status, "updated post");
        Ok(Some(post))
    }
}

#[cfg(test)]
mod tests {
    use blogstore_types::DEFAULT_TITLE;

    use super::*;
    use crate::backend::in_memory::InMemoryBackend;

    fn make_service() -> (BlogService, InMemoryBackend) {
        let backend = InMemoryBackend::default();
        let service = BlogService::from_backend(Box::new(backend.clone()));
        (service, backend)
    }

    fn input(title: &str, content: &str, tags: &[&str]) -> PostInput {
        PostInput {
            title: Some(title.into()),
            content: Some(content.into()),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn draft_round_trip() {
        let (service, _backend) = make_service();

        let created = service
            .create_post(input("Hello", "<p>World</p>", &["a", "b"]), PostStatus::Draft)
            .await
            .unwrap();

        let fetched = service.get_post(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Hello");
        assert_eq!(fetched.content, "<p>World</p>");
        assert_eq!(fetched.tags, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(fetched.status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let (service, _backend) = make_service();

        for title in ["one", "two", "three"] {
            service
                .create_post(input(title, "", &[]), PostStatus::Published)
                .await
                .unwrap();
        }

        let titles: Vec<_> = service
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.title)
            .collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn create_with_empty_input() {
        let (service, _backend) = make_service();

        let post = service
            .create_post(PostInput::default(), PostStatus::Draft)
            .await
            .unwrap();
        assert_eq!(post.title, DEFAULT_TITLE);
        assert_eq!(post.content, "");
        assert!(post.tags.is_empty());
    }

    #[tokio::test]
    async fn publish_existing_draft() {
        let (service, backend) = make_service();

        let draft = service
            .create_post(input("Draft", "<p>text</p>", &["x"]), PostStatus::Draft)
            .await
            .unwrap();

        let update = PostInput {
            content: Some("<p>final text</p>".into()),
            ..Default::default()
        };
        let published = service
            .update_post(&draft.id, update, PostStatus::Published)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(published.id, draft.id);
        assert_eq!(published.title, "Draft");
        assert_eq!(published.content, "<p>final text</p>");
        assert_eq!(published.tags, vec!["x".to_owned()]);
        assert_eq!(published.status, PostStatus::Published);
        assert_eq!(published.created_at, draft.created_at);
        assert!(published.updated_at >= draft.updated_at);

        assert_eq!(backend.posts(), vec![published]);
    }

    #[tokio::test]
    async fn update_unknown_post() {
        let (service, backend) = make_service();

        let result = service
            .update_post(&"missing".into(), PostInput::default(), PostStatus::Draft)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(backend.store_count(), 0);
    }

    #[tokio::test]
    async fn get_unknown_post() {
        let (service, _backend) = make_service();
        assert!(service.get_post(&"missing".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_creates_are_not_lost() {
        let (service, backend) = make_service();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_post(input(&format!("post {i}"), "", &[]), PostStatus::Draft)
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(backend.posts().len(), 16);
    }

    #[tokio::test]
    async fn file_backend_survives_restart() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("data/blogs.json");

        let service = BlogService::new(StorageConfig::FileSystem { path: &path })
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");

        let created = service
            .create_post(input("Persisted", "<p>kept</p>", &[]), PostStatus::Published)
            .await
            .unwrap();
        drop(service);

        let service = BlogService::new(StorageConfig::FileSystem { path: &path })
            .await
            .unwrap();
        let fetched = service.get_post(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_racing_first_create() {
        for _ in 0..50 {
            let tempdir = tempfile::tempdir().unwrap();
            let path = tempdir.path().join("data/blogs.json");
            let service = BlogService::new(StorageConfig::FileSystem { path: &path })
                .await
                .unwrap();

            let readers: Vec<_> = (0..4)
                .map(|_| {
                    let service = service.clone();
                    tokio::spawn(async move { service.list_posts().await })
                })
                .collect();
            let writer = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_post(input("first", "", &[]), PostStatus::Draft)
                        .await
                })
            };

            for reader in readers {
                reader.await.unwrap().unwrap();
            }
            let created = writer.await.unwrap().unwrap();
            drop(service);

            let reopened = BlogService::new(StorageConfig::FileSystem { path: &path })
                .await
                .unwrap();
            let fetched = reopened.get_post(&created.id).await.unwrap();
            assert_eq!(fetched, Some(created));
        }
    }
}
