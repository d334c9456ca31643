use std::sync::Arc;
use std::time::Duration;

use blogstore_types::{Post, PostId};
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;

use crate::Draft;

const USER_AGENT: &str = concat!("blogstore-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
struct ClientBuilderInner {
    service_url: Url,
    reqwest_builder: reqwest::ClientBuilder,
}

/// Builder to create a [`Client`].
#[must_use]
#[derive(Debug)]
pub struct ClientBuilder(crate::Result<ClientBuilderInner>);

impl ClientBuilder {
    /// Creates a new [`ClientBuilder`], configured with the given `service_url`.
    pub fn new(service_url: impl reqwest::IntoUrl) -> Self {
        let service_url = match service_url.into_url() {
            Ok(url) => url,
            Err(err) => return Self(Err(err.into())),
        };

        let reqwest_builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT);

        Self(Ok(ClientBuilderInner {
            service_url,
            reqwest_builder,
        }))
    }

    /// Sets both the connect and the request timeout for the [`reqwest::Client`].
    /// For more fine-grained configuration, use [`Self::configure_reqwest`].
    pub fn timeout(self, timeout: Duration) -> Self {
        self.configure_reqwest(|builder| builder.connect_timeout(timeout).timeout(timeout))
    }

    /// Calls the closure with the underlying [`reqwest::ClientBuilder`].
    pub fn configure_reqwest<F>(self, closure: F) -> Self
    where
        F: FnOnce(reqwest::ClientBuilder) -> reqwest::ClientBuilder,
    {
        let Ok(inner) = self.0 else { return self };
        Self(Ok(ClientBuilderInner {
            service_url: inner.service_url,
            reqwest_builder: closure(inner.reqwest_builder),
        }))
    }

    /// Returns a [`Client`] that uses this [`ClientBuilder`] configuration.
    ///
    /// # Errors
    ///
    /// This method fails if:
    /// - the given `service_url` is invalid or cannot be a base URL
    /// - the [`reqwest::Client`] fails to build. Refer to [`reqwest::ClientBuilder::build`] for
    ///   more information on when this can happen.
    pub fn build(self) -> crate::Result<Client> {
        let inner = self.0?;
        if inner.service_url.cannot_be_a_base() {
            return Err(crate::Error::InvalidUrl {
                message: format!("service URL {} cannot be a base", inner.service_url),
            });
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                reqwest: inner.reqwest_builder.build()?,
                service_url: inner.service_url,
            }),
        })
    }
}

#[derive(Debug)]
struct ClientInner {
    reqwest: reqwest::Client,
    service_url: Url,
}

/// A client for the blog API.
///
/// The client is cheap to clone and shares its connection pool between clones.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

/// The error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl Client {
    /// Convenience function to create a [`ClientBuilder`].
    pub fn builder(service_url: impl reqwest::IntoUrl) -> ClientBuilder {
        ClientBuilder::new(service_url)
    }

    /// Returns all posts, drafts and published ones alike.
    pub async fn list_posts(&self) -> crate::Result<Vec<Post>> {
        let url = self.endpoint(&[])?;
        let response = self.inner.reqwest.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Returns the post with the given id, or `None` if it does not exist.
    pub async fn get_post(&self, id: &PostId) -> crate::Result<Option<Post>> {
        let url = self.endpoint(&[id.as_str()])?;
        let response = self.inner.reqwest.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check_status(response).await?.json().await?))
    }

    /// Saves the draft with draft status.
    ///
    /// Drafts without an id create a new post, otherwise the existing post is updated.
    pub async fn save_draft(&self, draft: &Draft) -> crate::Result<Post> {
        self.write(draft, "save-draft").await
    }

    /// Saves the draft and marks it as published.
    ///
    /// Drafts without an id create a new post, otherwise the existing post is updated.
    pub async fn publish(&self, draft: &Draft) -> crate::Result<Post> {
        self.write(draft, "publish").await
    }

    async fn write(&self, draft: &Draft, action: &str) -> crate::Result<Post> {
        let url = match &draft.id {
            Some(id) => self.endpoint(&[id.as_str(), action])?,
            None => self.endpoint(&[action])?,
        };

        let response = self
            .inner
            .reqwest
            .post(url)
            .json(&draft.to_input())
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Builds a URL below `/api/blogs` with the given, percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        let mut url = self.inner.service_url.clone();
        url.path_segments_mut()
            .map_err(|_| crate::Error::InvalidUrl {
                message: "service URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(["api", "blogs"])
            .extend(segments);
        Ok(url)
    }
}

/// Converts error responses into [`Error::Api`](crate::Error::Api), preserving the server's
/// message where possible.
async fn check_status(response: Response) -> crate::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("An error occurred")
            .to_owned(),
    };

    Err(crate::Error::Api { status, message })
}
