//! Exposes an in-process test server for use in integration tests.
//!
//! ```
//! use blogstore_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!    let server = TestServer::new().await;
//!    let url = server.url("/api/blogs");
//!    // use the URL in tests...
//! }
//! ```

use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};

use blogstore_server::config::{Config, Storage};
use blogstore_server::state::State;
use blogstore_server::web::App;
use tempfile::TempDir;

/// An in-process test server for use in integration tests.
///
/// This server runs the full blog API using a data file in a temporary directory, which is deleted
/// when the server is dropped. It listens on a random available port on localhost.
#[derive(Debug)]
pub struct TestServer {
    handle: tokio::task::JoinHandle<()>,
    socket: SocketAddr,
    data_path: PathBuf,
    _tempdir: TempDir,
}

impl TestServer {
    /// Starts a server with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Starts a server with the given configuration.
    ///
    /// The storage path is always replaced with a file inside a fresh temporary directory.
    pub async fn with_config(config: Config) -> Self {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let tempdir = tempfile::tempdir().unwrap();
        let data_path = tempdir.path().join("data").join("blogs.json");
        let config = Config {
            http_addr: socket,
            storage: Storage::FileSystem {
                path: data_path.clone(),
            },
            ..config
        };

        let state = State::new(config).await.unwrap();
        let app = App::new(state);

        let handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            app.serve(listener).await.unwrap();
        });

        Self {
            handle,
            socket,
            data_path,
            _tempdir: tempdir,
        }
    }

    /// Returns a full URL pointing to the given path.
    ///
    /// This URL uses `localhost` as hostname.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("http://localhost:{}/{}", self.socket.port(), path)
    }

    /// Returns the path of the server's JSON data file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
