use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use blogstore_types::Post;
use tempfile::NamedTempFile;

use super::{Backend, BackendError, BackendResult};

/// Stores all posts as a pretty-printed JSON array in a single file.
///
/// Every write goes to its own temporary file in the same directory, which is synced and then
/// renamed over the target. Readers never observe a partially written file, and concurrent writers
/// never share a temporary file.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Creates a backend for the file at `path`. Nothing is touched on disk until first use.
    pub fn new(path: &Path) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, contents: Vec<u8>, overwrite: bool) -> io::Result<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents, overwrite))
            .await
            .map_err(io::Error::other)?
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes `contents` to a fresh temporary file next to `path` and moves it into place.
///
/// Without `overwrite`, an existing file at `path` is left alone and `AlreadyExists` is returned.
fn write_atomic(path: &Path, contents: &[u8], overwrite: bool) -> io::Result<()> {
    let parent = parent_dir(path);
    std::fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(contents)?;
    file.as_file().sync_data()?;

    if overwrite {
        file.persist(path)?;
    } else {
        file.persist_noclobber(path)?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl Backend for JsonFile {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn init(&self) -> BackendResult<()> {
        match self.write(b"[]".to_vec(), false).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "created empty data file");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn load(&self) -> BackendResult<Vec<Post>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&data).map_err(|cause| BackendError::Serde {
            context: format!("failed to parse {}", self.path.display()),
            cause,
        })
    }

    async fn store(&self, posts: &[Post]) -> BackendResult<()> {
        let json = serde_json::to_vec_pretty(posts).map_err(|cause| BackendError::Serde {
            context: "failed to serialize posts".to_owned(),
            cause,
        })?;

        self.write(json, true).await?;
        tracing::trace!(path = %self.path.display(), count = posts.len(), "stored posts");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::SystemTime;

    use blogstore_types::{PostInput, PostStatus};

    use super::*;

    fn post(title: &str) -> Post {
        let input = PostInput {
            title: Some(title.into()),
            ..Default::default()
        };
        Post::create(input, PostStatus::Draft, SystemTime::now())
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn init_creates_missing_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nested/data/blogs.json");
        let backend = JsonFile::new(&path);

        backend.init().await.unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "[]");
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn init_keeps_existing_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blogs.json");
        let backend = JsonFile::new(&path);

        let posts = vec![post("kept")];
        backend.store(&posts).await.unwrap();
        backend.init().await.unwrap();

        assert_eq!(backend.load().await.unwrap(), posts);
    }

    #[tokio::test]
    async fn load_missing_file_is_read_only() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blogs.json");
        let backend = JsonFile::new(&path);

        assert!(backend.load().await.unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn stores_pretty_json() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blogs.json");
        let backend = JsonFile::new(&path);

        let posts = vec![post("one"), post("two")];
        backend.store(&posts).await.unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("[\n  {"));
        assert_eq!(dir_entries(tempdir.path()), ["blogs.json"]);

        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded, posts);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_stores_do_not_collide() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blogs.json");
        let backend = Arc::new(JsonFile::new(&path));

        let candidates: Vec<_> = (0..8).map(|i| vec![post(&format!("post {i}"))]).collect();
        let tasks: Vec<_> = candidates
            .iter()
            .cloned()
            .map(|posts| {
                let backend = backend.clone();
                tokio::spawn(async move { backend.store(&posts).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let loaded = backend.load().await.unwrap();
        assert!(candidates.contains(&loaded));
        assert_eq!(dir_entries(tempdir.path()), ["blogs.json"]);
    }

    #[tokio::test]
    async fn rejects_corrupt_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("blogs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = JsonFile::new(&path);
        let err = backend.load().await.unwrap_err();
        assert!(matches!(err, BackendError::Serde { .. }));
    }
}
