//! Configuration for the blogstore server.
//!
//! Configuration can be loaded from multiple sources with the following precedence (highest to
//! lowest):
//!
//! 1. Environment variables (prefixed with `BLOG__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! See [`Config`] for a description of all configuration fields and their defaults.
//!
//! # Environment Variables
//!
//! Environment variables use `BLOG__` as a prefix and double underscores (`__`) to denote nested
//! configuration structures. For example:
//!
//! - `BLOG__HTTP_ADDR=127.0.0.1:3001` sets the HTTP server address
//! - `BLOG__STORAGE__TYPE=filesystem` sets the storage type
//! - `BLOG__STORAGE__PATH=/data/blogs.json` sets the data file
//!
//! # YAML Configuration File
//!
//! The above configuration in YAML format would look like this:
//!
//! ```yaml
//! http_addr: 127.0.0.1:3001
//!
//! storage:
//!   type: filesystem
//!   path: /data/blogs.json
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::{CloneableSecret, SecretBox, SerializableSecret, zeroize::Zeroize};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "BLOG__";

/// Newtype around `String` that may protect against accidental
/// logging of secrets in our configuration struct. Use with
/// [`secrecy::SecretBox`].
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigSecret(String);

impl ConfigSecret {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ConfigSecret {
    fn from(str: &str) -> Self {
        ConfigSecret(str.to_string())
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[redacted]")
    }
}

impl CloneableSecret for ConfigSecret {}
impl SerializableSecret for ConfigSecret {}
impl Zeroize for ConfigSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Storage backend configuration.
///
/// The `type` field in YAML or `__TYPE` in environment variables determines which variant is used.
///
/// Used in: [`Config::storage`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Storage {
    /// JSON file storage backend (type `"filesystem"`).
    ///
    /// All posts are kept in a single JSON array, rewritten on every change.
    ///
    /// # Example
    ///
    /// ```yaml
    /// storage:
    ///   type: filesystem
    ///   path: /data/blogs.json
    /// ```
    FileSystem {
        /// Path of the JSON data file.
        ///
        /// The file and its parent directories are created if they don't exist. Relative paths
        /// are resolved from the server's working directory.
        ///
        /// # Default
        ///
        /// `"data/blogs.json"`
        ///
        /// # Environment Variables
        ///
        /// - `BLOG__STORAGE__TYPE=filesystem`
        /// - `BLOG__STORAGE__PATH=/path/to/blogs.json`
        path: PathBuf,
    },
}

/// Runtime configuration for the Tokio async runtime.
///
/// Used in: [`Config::runtime`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Runtime {
    /// Number of worker threads for the server runtime.
    ///
    /// # Default
    ///
    /// Number of CPU cores on the host machine.
    ///
    /// # Environment Variable
    ///
    /// `BLOG__RUNTIME__WORKER_THREADS`
    pub worker_threads: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

/// Error reporting to [Sentry](https://sentry.io/).
///
/// Reporting stays off until a DSN is configured. All fields are set through
/// `BLOG__SENTRY__<FIELD>`, tags through `BLOG__SENTRY__TAGS__<NAME>`.
///
/// Used in: [`Config::sentry`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Sentry {
    /// Project DSN. Kept in a secret so it never shows up in debug output.
    pub dsn: Option<SecretBox<ConfigSecret>>,
    /// Deployment environment reported with every event.
    pub environment: Option<Cow<'static, str>>,
    /// Host name reported with every event.
    pub server_name: Option<Cow<'static, str>>,
    /// Share of errors that are reported, `1.0` by default.
    pub sample_rate: f32,
    /// Share of requests that are traced, `0.01` by default.
    pub traces_sample_rate: f32,
    /// Tags attached to every event.
    pub tags: BTreeMap<String, String>,
}

impl Sentry {
    /// Returns `true` if a DSN is configured.
    pub fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }
}

impl Default for Sentry {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            server_name: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.01,
            tags: BTreeMap::new(),
        }
    }
}

/// How log lines are rendered on stderr.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// [`Pretty`](Self::Pretty) on a terminal, [`Simplified`](Self::Simplified) otherwise.
    Auto,
    /// Multi-line output with colors.
    Pretty,
    /// One plain line per event.
    Simplified,
    /// One JSON object per event.
    Json,
}

/// (De)serializes a [`LevelFilter`] by its name, such as `"info"` or `"off"`.
mod level_filter {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::level_filters::LevelFilter;

    pub fn serialize<S: Serializer>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(level)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging configuration.
///
/// Used in: [`Config::logging`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Most verbose level logged by blogstore crates, `info` by default. `RUST_LOG` overrides it.
    ///
    /// Environment variable: `BLOG__LOGGING__LEVEL`
    #[serde(with = "level_filter")]
    pub level: LevelFilter,

    /// Output format, `auto` by default.
    ///
    /// Environment variable: `BLOG__LOGGING__FORMAT`
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Cross-origin resource sharing settings.
///
/// The editor is usually served from a different origin than the API, so CORS is always enabled.
///
/// Used in: [`Config::cors`]
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Cors {
    /// Origins that may call the API.
    ///
    /// An empty list allows any origin.
    ///
    /// # Environment Variable
    ///
    /// `BLOG__CORS__ALLOWED_ORIGINS='["http://localhost:5173"]'`
    pub allowed_origins: Vec<String>,
}

/// Main configuration struct for the blogstore server.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// HTTP server bind address.
    ///
    /// # Default
    ///
    /// `0.0.0.0:3001`
    ///
    /// # Environment Variable
    ///
    /// `BLOG__HTTP_ADDR`
    pub http_addr: SocketAddr,

    /// Storage backend for posts. See [`Storage`].
    pub storage: Storage,

    /// Configuration of the internal task runtime.
    pub runtime: Runtime,

    /// Logging configuration.
    pub logging: Logging,

    /// Sentry error tracking configuration.
    pub sentry: Sentry,

    /// CORS configuration.
    pub cors: Cors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            storage: Storage::FileSystem {
                path: PathBuf::from("data/blogs.json"),
            },
            runtime: Runtime::default(),
            logging: Logging::default(),
            sentry: Sentry::default(),
            cors: Cors::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the provided arguments.
    ///
    /// Configuration is merged in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. YAML configuration file (if `path` is given)
    /// 3. Environment variables (prefixed with `BLOG__`)
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML file cannot be read or parsed, or if any source contains
    /// invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}
