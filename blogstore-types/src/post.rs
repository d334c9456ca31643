//! The blog post data model.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// The title assigned to posts created without one.
pub const DEFAULT_TITLE: &str = "Untitled Blog";

/// Opaque identifier of a [`Post`].
///
/// Newly created posts receive a random UUID, but any string read back from storage is accepted
/// as an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Creates a fresh, random identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication state of a [`Post`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Saved, but not visible as a published entry.
    #[default]
    Draft,
    /// Published.
    Published,
}

impl PostStatus {
    /// Returns the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single blog entry.
///
/// Timestamps are serialized as RFC 3339 strings in UTC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier within the store.
    pub id: PostId,
    /// The post title.
    pub title: String,
    /// Rich-text body as HTML. Stored verbatim.
    pub content: String,
    /// Ordered list of tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the post is a draft or published.
    pub status: PostStatus,
    /// Time of the first save.
    #[serde(with = "humantime_serde")]
    pub created_at: SystemTime,
    /// Time of the most recent save.
    #[serde(with = "humantime_serde")]
    pub updated_at: SystemTime,
}

impl Post {
    /// Creates a new post from the given input.
    ///
    /// Missing or empty titles fall back to [`DEFAULT_TITLE`], missing content and tags to empty
    /// values. Both timestamps are set to `now`.
    pub fn create(input: PostInput, status: PostStatus, now: SystemTime) -> Self {
        let title = input
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        Self {
            id: PostId::random(),
            title,
            content: input.content.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place.
    ///
    /// Only fields present in `input` replace the stored values. The status is always set and
    /// `updated_at` moves to `now`, while `id` and `created_at` stay untouched.
    pub fn apply(&mut self, input: PostInput, status: PostStatus, now: SystemTime) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(content) = input.content {
            self.content = content;
        }
        if let Some(tags) = input.tags {
            self.tags = tags;
        }
        self.status = status;
        self.updated_at = now;
    }
}

/// Body of all write requests.
///
/// Every field is optional. Unknown fields, such as an `id` or timestamps echoed back by a client,
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New HTML content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New list of tags, replacing the previous one entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
