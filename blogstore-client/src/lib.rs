//! # Blogstore Client
//!
//! The client talks to the blogstore API and carries the editor's behavior: a [`Draft`] holds the
//! post being edited, and an [`AutoSaver`] saves it in the background once the author stops
//! typing. [`PostList`] and [`excerpt`] prepare stored posts for an overview.
//!
//! ## Usage
//!
//! ```no_run
//! use blogstore_client::{AutoSaver, Client, Draft};
//!
//! #[tokio::main]
//! # async fn main() -> blogstore_client::Result<()> {
//!     let client = Client::builder("http://localhost:3001/").build()?;
//!
//!     let mut draft = Draft::default();
//!     draft.title = "Hello, world!".into();
//!     draft.add_tag("intro");
//!
//!     let post = client.save_draft(&draft).await?;
//!     draft.id = Some(post.id);
//!
//!     let mut saver = AutoSaver::spawn(client, draft.clone());
//!     draft.content = "<p>More to come.</p>".into();
//!     saver.update(draft);
//!     let _event = saver.next_event().await;
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod autosave;
mod client;
mod editor;
mod error;
mod listing;

pub use blogstore_types::{Post, PostId, PostStatus};

pub use autosave::*;
pub use client::*;
pub use editor::*;
pub use error::*;
pub use listing::*;
