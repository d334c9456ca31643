//! Test utilities for blogstore and its clients.
//!
//! This crate provides utilities to facilitate testing of the blogstore server and its clients.
//! See the modules for all available utilities.

pub mod server;
pub mod tracing;
