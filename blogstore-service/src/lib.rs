//! The service layer provides durable access to blog posts.
//!
//! All posts live in a single JSON array. Every operation loads the whole array from a
//! [`Backend`](backend::Backend), works on it in memory and, for writes, stores the whole array
//! again. The [`BlogService`] serializes these read-modify-write cycles so that concurrent
//! requests within one process cannot overwrite each other's changes.
//!
//! It is designed as a library crate to be used by the `blogstore-server`.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backend;
pub mod error;
pub mod service;

pub use error::{Error, Result};
pub use service::{BlogService, StorageConfig};
