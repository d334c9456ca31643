//! Storage backends for the post collection.

mod common;
#[cfg(test)]
pub(crate) mod in_memory;
mod json_file;

pub use common::*;
pub use json_file::JsonFile;
