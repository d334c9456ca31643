use blogstore_types::{DEFAULT_TITLE, Post, PostStatus};

/// Maximum length, in characters, of a post excerpt.
pub const EXCERPT_LEN: usize = 150;

/// Posts split by status, as shown in the post overview.
///
/// Both groups keep the order in which the server returned the posts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostList {
    /// Posts with [`PostStatus::Published`].
    pub published: Vec<Post>,
    /// Posts with [`PostStatus::Draft`].
    pub drafts: Vec<Post>,
}

impl PostList {
    /// Returns the posts with the given status.
    pub fn with_status(&self, status: PostStatus) -> &[Post] {
        match status {
            PostStatus::Published => &self.published,
            PostStatus::Draft => &self.drafts,
        }
    }
}

impl FromIterator<Post> for PostList {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        let (published, drafts) = iter
            .into_iter()
            .partition(|post| post.status == PostStatus::Published);
        Self { published, drafts }
    }
}

/// Returns the title to display for a post, falling back to the default for empty titles.
pub fn display_title(post: &Post) -> &str {
    if post.title.is_empty() {
        DEFAULT_TITLE
    } else {
        &post.title
    }
}

/// Returns a plain-text preview of HTML content.
///
/// Everything between `<` and the next `>` is dropped, then the text is cut to [`EXCERPT_LEN`]
/// characters. A `<` without a closing `>` is kept as text.
pub fn excerpt(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start..].find('>') else {
            break;
        };
        text.push_str(&rest[..start]);
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    text.chars().take(EXCERPT_LEN).collect()
}
