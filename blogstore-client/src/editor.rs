use blogstore_types::{Post, PostId, PostInput};

/// Minimum content length, in characters, required to publish a post.
pub const MIN_PUBLISH_CONTENT_LEN: usize = 50;

/// The post currently being edited.
///
/// A draft without an `id` has never been saved. Once the server assigned an id, all further
/// saves update the same post.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    /// Identifier of the saved post, if any.
    pub id: Option<PostId>,
    /// The post title.
    pub title: String,
    /// HTML content from the rich-text editor.
    pub content: String,
    /// Tags in the order they were added.
    pub tags: Vec<String>,
}

impl Draft {
    /// Returns `true` if the draft has a title or content.
    pub fn has_text(&self) -> bool {
        !self.title.is_empty() || !self.content.is_empty()
    }

    /// Adds a tag from user input.
    ///
    /// Surrounding whitespace is trimmed. Empty input and tags that are already present are
    /// ignored. Returns whether the tag was added.
    pub fn add_tag(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_owned());
        true
    }

    /// Removes all occurrences of `tag`.
    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Checks whether the draft may be saved.
    pub fn check_save(&self) -> Result<(), DraftError> {
        if !self.has_text() {
            return Err(DraftError::Empty);
        }
        Ok(())
    }

    /// Checks whether the draft may be published.
    ///
    /// Publishing requires a title and at least [`MIN_PUBLISH_CONTENT_LEN`] characters of content.
    pub fn check_publish(&self) -> Result<(), DraftError> {
        if self.title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.content.chars().count() < MIN_PUBLISH_CONTENT_LEN {
            return Err(DraftError::ContentTooShort);
        }
        Ok(())
    }

    /// Returns the request body sent to the server.
    pub fn to_input(&self) -> PostInput {
        PostInput {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            tags: Some(self.tags.clone()),
        }
    }
}

impl From<Post> for Draft {
    fn from(post: Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title,
            content: post.content,
            tags: post.tags,
        }
    }
}

/// Reasons a draft cannot be saved or published yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Neither title nor content are set.
    #[error("Please add a title or content before saving")]
    Empty,
    /// Publishing requires a title.
    #[error("Please add a title before publishing")]
    MissingTitle,
    /// Publishing requires more content.
    #[error("Please add more content before publishing")]
    ContentTooShort,
}
