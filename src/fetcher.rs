use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use std::time::Duration;
use crate::error::{AppError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Shared client so connections are reused across requests. The browser-like
// header set reduces the chance of bot-blocking by target sites;
// Accept-Encoding is added by reqwest itself (gzip/brotli features).
static CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Fetches the raw markup of a product page. A single attempt, no retries:
/// any transport error or non-success status fails the whole request.
pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::FetchFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchFailed(format!("status {}", status)));
    }

    response
        .text()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read response body: {}", e)))
}
