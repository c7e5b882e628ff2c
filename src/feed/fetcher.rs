use crate::util::{parse_http_url, UrlValidationError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on a source document. Awesome-list READMEs are well below this.
pub const MAX_SOURCE_SIZE: usize = 5 * 1024 * 1024; // 5MB

const MAX_REDIRECTS: usize = 5;

/// Failure to retrieve a source document.
///
/// There is a single failure condition; what went wrong is carried in
/// [`FetchCause`] so callers can report it without matching on transport
/// details.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {cause}")]
    FetchFailed {
        url: String,
        #[source]
        cause: FetchCause,
    },
}

impl FetchError {
    fn failed(url: &str, cause: FetchCause) -> Self {
        FetchError::FetchFailed {
            url: url.to_string(),
            cause,
        }
    }

    /// The underlying reason for the failure.
    pub fn cause(&self) -> &FetchCause {
        match self {
            FetchError::FetchFailed { cause, .. } => cause,
        }
    }
}

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum FetchCause {
    /// The source URL is not an absolute http(s) URL
    #[error("invalid source URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,
    /// Response body exceeded [`MAX_SOURCE_SIZE`]
    #[error("response too large")]
    ResponseTooLarge,
    /// Response body is not UTF-8 text
    #[error("response is not valid UTF-8")]
    InvalidEncoding,
}

/// Builds the HTTP client used for source fetches.
///
/// `timeout` of `None` leaves the transport default in place.
pub fn build_client(
    user_agent: &str,
    timeout: Option<Duration>,
) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(redirect_policy());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("Too many redirects");
        }

        let url = attempt.url();
        if let Some(from) = attempt.previous().last() {
            if is_scheme_downgrade(from, url) {
                return attempt.error("Refusing redirect from https to http");
            }
        }

        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

fn is_scheme_downgrade(from: &url::Url, to: &url::Url) -> bool {
    from.scheme() == "https" && to.scheme() == "http"
}

/// Retrieves the full text of a source document with a single GET.
///
/// The body is buffered completely before returning. Nothing is retried:
/// network errors, non-2xx statuses, timeouts and oversized bodies all
/// surface as [`FetchError::FetchFailed`].
///
/// # Arguments
///
/// * `client` - HTTP client, usually from [`build_client`]
/// * `url` - Absolute http(s) URL of the document
/// * `timeout` - Optional deadline for the whole request, on top of the
///   client's own timeout
pub async fn fetch_source(
    client: &reqwest::Client,
    url: &str,
    timeout: Option<Duration>,
) -> Result<String, FetchError> {
    let parsed = parse_http_url(url).map_err(|e| FetchError::failed(url, e.into()))?;

    tracing::info!(url = %url, "Fetching source document");

    let request = get_body(client, parsed);

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or(Err(FetchCause::Timeout)),
        None => request.await,
    };

    let bytes = result.map_err(|cause| {
        let cause = match cause {
            FetchCause::Network(e) if e.is_timeout() => FetchCause::Timeout,
            other => other,
        };
        tracing::warn!(url = %url, error = %cause, "Source fetch failed");
        FetchError::failed(url, cause)
    })?;

    let text = String::from_utf8(bytes)
        .map_err(|_| FetchError::failed(url, FetchCause::InvalidEncoding))?;

    tracing::debug!(url = %url, bytes = text.len(), "Fetched source document");
    Ok(text)
}

async fn get_body(client: &reqwest::Client, url: url::Url) -> Result<Vec<u8>, FetchCause> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchCause::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_SOURCE_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchCause> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchCause::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchCause::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
