//! HTTP client for the scouting service's `POST /api/v1/scout` endpoint.
//!
//! A successful submission yields a [`ScoutStream`] that decodes the
//! server-sent-event body incrementally. HTTP 429 and other non-2xx statuses
//! are returned as typed errors before any stream is opened.

use std::collections::VecDeque;
use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use reqwest::{Client, Url};
use scout_core::{AppConfig, SearchRequest, StreamEvent};

use crate::error::ScoutError;
use crate::sse::FrameDecoder;

const SCOUT_PATH: &str = "api/v1/scout";

/// Client for the scouting service.
///
/// Use [`ScoutClient::from_config`] in the binary or [`ScoutClient::new`] to
/// point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ScoutClient {
    client: Client,
    endpoint: Url,
}

impl ScoutClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// `timeout_secs` bounds the whole search, streaming included.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScoutError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScoutError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let endpoint = Self::endpoint_url(base_url)?;
        Ok(Self { client, endpoint })
    }

    /// Creates a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`ScoutClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScoutError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            config.connect_timeout_secs,
            &config.user_agent,
        )
    }

    /// Full URL searches are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submits a search and opens its event stream.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::RateLimited`] on HTTP 429.
    /// - [`ScoutError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScoutError::Http`] on network or TLS failure.
    pub async fn open_search(&self, request: &SearchRequest) -> Result<ScoutStream, ScoutError> {
        tracing::info!(
            query = %request.query,
            location = %request.location,
            endpoint = %self.endpoint,
            "submitting search"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            tracing::warn!(?retry_after_secs, "scouting service rate limited the search");
            return Err(ScoutError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "scouting service rejected the search");
            return Err(ScoutError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();
        Ok(ScoutStream::from_chunks(chunks))
    }

    fn endpoint_url(base_url: &str) -> Result<Url, ScoutError> {
        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| ScoutError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ScoutError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }
        base.join(SCOUT_PATH)
            .map_err(|e| ScoutError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Event stream of one search, read in arrival order.
pub struct ScoutStream {
    chunks: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>,
    decoder: FrameDecoder,
    pending: VecDeque<StreamEvent>,
    exhausted: bool,
}

impl ScoutStream {
    pub(crate) fn from_chunks(chunks: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>) -> Self {
        Self {
            chunks,
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Next decoded event, or `None` once the body has ended.
    ///
    /// Malformed frames are skipped. `error` events are returned as
    /// [`StreamEvent::Error`]; ending the search on them is the caller's call.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::Http`] if reading the body fails.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>, ScoutError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            if self.exhausted {
                return Ok(None);
            }
            match self.chunks.next().await {
                Some(Ok(chunk)) => {
                    tracing::trace!(bytes = chunk.len(), "stream chunk received");
                    self.pending.extend(self.decoder.push(&chunk));
                }
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Err(ScoutError::Http(e));
                }
                None => {
                    self.exhausted = true;
                    self.pending.extend(self.decoder.finish());
                }
            }
        }
    }
}

impl std::fmt::Debug for ScoutStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoutStream")
            .field("pending", &self.pending.len())
            .field("buffered", &self.decoder.buffered_len())
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
