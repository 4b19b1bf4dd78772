//! HTTP fetching
//!
//! One GET per frontier entry, with client-level timeouts. Every failure
//! mode (timeout, connect, non-2xx, non-HTML) maps onto a [`FetchError`]
//! that the orchestrator records as a terminal node error; nothing here
//! retries or aborts the job.

use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// User-agent header sent with every request
pub const USER_AGENT: &str = concat!("crawlrank/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the HTTP client shared by a crawl job
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its HTML body
///
/// Requires a 2xx status and a `text/html` content type; anything else is a
/// [`FetchError`] classified for node-status reporting.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(FetchError::ContentType {
            url: url.to_string(),
            content_type,
        });
    }

    response.text().await.map_err(|e| FetchError::Other {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else {
        FetchError::Other {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
