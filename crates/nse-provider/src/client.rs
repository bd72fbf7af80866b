//! Shared HTTP plumbing for the lookup clients.

use crate::error::{ProviderError, ProviderResult};
use nse_core::Lookup;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Build a reqwest client with the given timeout and User-Agent.
pub fn build_http_client(timeout: Duration, user_agent: &str) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| ProviderError::HttpClient(format!("Failed to create HTTP client: {e}")))
}

/// GET a URL and return the body text.
///
/// 404 maps to `NotFound`; transport errors and other non-success
/// statuses map to `Error`.
pub async fn get_text(client: &Client, url: Url) -> Lookup<String> {
    debug!(url = %url, "GET");

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return Lookup::Error(format!("HTTP request failed: {e}")),
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Lookup::NotFound;
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Lookup::Error(format!("HTTP {status}: {}", truncate(&body, 200)));
    }

    match response.text().await {
        Ok(body) => Lookup::Found(body),
        Err(e) => Lookup::Error(format!("Failed to read response body: {e}")),
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
