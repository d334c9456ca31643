//! Shared types for the blogstore server and its clients.
//!
//! The central type is [`Post`], a single blog entry as it is stored on disk and returned by the
//! HTTP API. Write requests carry a [`PostInput`], which only contains the fields a client may
//! change.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod post;

pub use post::*;
