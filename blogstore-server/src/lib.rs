//! The blog API server.
//!
//! This builds on top of the [`blogstore_service`] and exposes the stored posts through a small
//! JSON `HTTP` API, consumed by the editor and the `blogstore-client` crate.

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod healthcheck;
pub mod observability;
pub mod state;
pub mod web;
