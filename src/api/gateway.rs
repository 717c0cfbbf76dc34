use super::types::{
    Channel, ErrorBody, IngestAllRequest, IngestRequest, ListedChannel, Post, SearchResponse,
    SortBy, SubscribedChannel, SubscriptionRequest,
};
use crate::util::validate_base_url;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound on any response body read from the backend.
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Default per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors returned by every [`Gateway`] operation.
///
/// `Network` and `Timeout` mean the request never completed, `Backend` means
/// the server answered with a failure, `Decode` means the body did not have the
/// expected shape.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (DNS, connection refused, TLS, reset).
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// No response within the configured timeout.
    #[error("Request timed out after {}", format_timeout(.0))]
    Timeout(Duration),
    /// Non-success HTTP status, or an `{"error": ...}` envelope.
    #[error("Backend error: status {status}")]
    Backend {
        status: u16,
        message: Option<String>,
    },
    /// Response body could not be parsed into the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// Response body exceeded the size limit.
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Search was called with a blank query.
    #[error("Search query is empty")]
    EmptyQuery,
    /// Base URL is not a usable http(s) URL.
    #[error("Invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// Short human-readable reason for status bar messages.
    pub fn reason(&self) -> String {
        match self {
            GatewayError::Backend {
                message: Some(msg),
                status,
            } => format!("{msg} (status {status})"),
            other => other.to_string(),
        }
    }
}

/// Whole seconds print as `20s`, anything finer as milliseconds.
fn format_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 && timeout.as_secs() > 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

/// Typed client for the ingestion/search backend.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
/// No operation retries on failure; retry policy belongs to the caller.
#[derive(Clone, Debug)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl Gateway {
    /// Build a gateway with its own pooled HTTP client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;
        Self::with_client(client, base_url, timeout)
    }

    /// Build a gateway around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let base_url = validate_base_url(base_url)
            .map_err(|e| GatewayError::InvalidBaseUrl(e.to_string()))?;
        tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "Gateway configured");
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /subreddits/`
    pub async fn list_channels(&self) -> Result<Vec<Channel>, GatewayError> {
        let url = self.endpoint(&["subreddits", ""])?;
        // An empty list is serialized as `null`
        let listed: Vec<ListedChannel> = self
            .fetch_json::<Option<_>>(self.client.get(url))
            .await?
            .unwrap_or_default();
        tracing::debug!(count = listed.len(), "Listed channels");
        Ok(listed.into_iter().map(Channel::from).collect())
    }

    /// `POST /subreddits/ingest`
    ///
    /// Subscribes to `name` if needed and starts an ingestion job. Each call
    /// triggers a new job on the backend.
    pub async fn subscribe_and_ingest(
        &self,
        name: &str,
        sort_by: SortBy,
    ) -> Result<Channel, GatewayError> {
        let url = self.endpoint(&["subreddits", "ingest"])?;
        let body = IngestRequest {
            subreddit: SubscriptionRequest { name, sort_by },
        };
        tracing::info!(channel = %name, sort_by = %sort_by, "Requesting ingestion");
        let channel: SubscribedChannel = self.fetch_json(self.client.post(url).json(&body)).await?;
        Ok(channel.into())
    }

    /// `POST /subreddits/ingest-all`
    ///
    /// Success means the backend accepted the request, not that ingestion finished.
    pub async fn ingest_all(&self, sort_by: SortBy) -> Result<(), GatewayError> {
        let url = self.endpoint(&["subreddits", "ingest-all"])?;
        let body = IngestAllRequest { sort_by };
        tracing::info!(sort_by = %sort_by, "Requesting ingestion of all channels");
        let bytes = self.execute(self.client.post(url).json(&body)).await?;
        if let Ok(err) = serde_json::from_slice::<ErrorBody>(&bytes) {
            return Err(GatewayError::Backend {
                status: 200,
                message: Some(err.error),
            });
        }
        Ok(())
    }

    /// `GET /subreddits/{name}`
    pub async fn fetch_posts(&self, channel: &str) -> Result<Vec<Post>, GatewayError> {
        let url = self.endpoint(&["subreddits", channel])?;
        let posts: Vec<Post> = self
            .fetch_json::<Option<_>>(self.client.get(url))
            .await?
            .unwrap_or_default();
        tracing::debug!(channel = %channel, count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    /// `GET /subreddits/search?q={query}`
    ///
    /// Blank queries are rejected locally without touching the network.
    pub async fn search(&self, query: &str) -> Result<Vec<Post>, GatewayError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GatewayError::EmptyQuery);
        }
        let mut url = self.endpoint(&["subreddits", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        let response: SearchResponse = self.fetch_json(self.client.get(url)).await?;
        tracing::debug!(query = %query, count = response.posts.len(), "Search completed");
        Ok(response.posts)
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let bytes = self.execute(request).await?;
        decode(&bytes)
    }

    /// Send a request and read the full body under the configured timeout.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
            if !status.is_success() {
                let message = serde_json::from_slice::<ErrorBody>(&bytes)
                    .ok()
                    .map(|b| b.error);
                tracing::warn!(status = status.as_u16(), message = ?message, "Backend returned error status");
                return Err(GatewayError::Backend {
                    status: status.as_u16(),
                    message,
                });
            }
            Ok::<_, GatewayError>(bytes)
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
    }
}

/// Parse a success body, recognizing the backend's `{"error": ...}` envelope.
///
/// The backend writes its error envelope with a 200 status, so a body that
/// fails to decode as `T` is checked for the envelope before being reported
/// as malformed.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, GatewayError> {
    match serde_json::from_slice::<T>(bytes) {
        Ok(value) => Ok(value),
        Err(e) => match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => Err(GatewayError::Backend {
                status: 200,
                message: Some(body.error),
            }),
            Err(_) => Err(GatewayError::Decode(e.to_string())),
        },
    }
}

async fn read_limited_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, GatewayError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
