use thiserror::Error;

/// Errors surfaced while submitting a search or reading its event stream.
///
/// Malformed frames are not represented here: the decoder logs and skips them.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Network or TLS failure, including a body read that dies mid-stream.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the scouting service.
    #[error("rate limited by scouting service (HTTP 429)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The service emitted an `error` event.
    #[error("{0}")]
    Stream(String),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ScoutError {
    /// `true` when the failure means the service is out of capacity.
    ///
    /// An explicit 429 always counts. Other errors count when their text
    /// carries a quota indicator (see [`crate::is_rate_limit_message`]).
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ScoutError::RateLimited { .. } => true,
            ScoutError::Http(e) if e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) => {
                true
            }
            // The request URL is stripped first: a port or path may contain "429".
            ScoutError::Http(e) => {
                let mut text = e.to_string();
                if let Some(url) = e.url() {
                    text = text.replace(url.as_str(), "");
                }
                crate::classify::is_rate_limit_message(&text)
            }
            ScoutError::Stream(message) => crate::classify::is_rate_limit_message(message),
            ScoutError::UnexpectedStatus { .. } | ScoutError::InvalidBaseUrl { .. } => false,
        }
    }
}
