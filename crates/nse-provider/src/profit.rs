//! Profit lookup over a JSON endpoint.
//!
//! The endpoint is addressed by primary code through a URL template
//! (`https://host/api/{code}`); the profit value is picked out of the
//! response with a JSON pointer.

use crate::client::{build_http_client, get_text};
use crate::config::ProfitSourceConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, ProfitProvider};
use nse_core::Lookup;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Placeholder substituted with the primary code.
const CODE_PLACEHOLDER: &str = "{code}";

/// Extract the profit text at `pointer`.
///
/// Strings are trimmed; numbers are rendered as-is. Missing, null, or
/// blank values are `NotFound`. Any other JSON type is an error.
pub fn extract_profit(body: &Value, pointer: &str) -> Lookup<String> {
    match body.pointer(pointer) {
        None | Some(Value::Null) => Lookup::NotFound,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Lookup::NotFound
            } else {
                Lookup::Found(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Lookup::Found(n.to_string()),
        Some(other) => Lookup::Error(format!(
            "Unexpected profit value at {pointer}: {other}"
        )),
    }
}

/// Profit provider backed by a JSON HTTP endpoint.
pub struct JsonProfitClient {
    /// HTTP client.
    client: Client,
    /// URL template with `{code}` placeholder.
    url_template: String,
    /// JSON pointer to the profit value.
    value_pointer: String,
}

impl JsonProfitClient {
    /// Create a new client from configuration.
    ///
    /// Rejects templates without a `{code}` placeholder and pointers
    /// that are not RFC 6901 (must be empty or start with `/`).
    pub fn new(config: &ProfitSourceConfig) -> ProviderResult<Self> {
        if !config.url_template.contains(CODE_PLACEHOLDER) {
            return Err(ProviderError::InvalidConfig(format!(
                "profit url_template must contain {CODE_PLACEHOLDER}: {}",
                config.url_template
            )));
        }
        if !config.value_pointer.is_empty() && !config.value_pointer.starts_with('/') {
            return Err(ProviderError::InvalidConfig(format!(
                "profit value_pointer must start with '/': {}",
                config.value_pointer
            )));
        }
        // Validate the template with a representative code.
        Url::parse(&config.url_template.replace(CODE_PLACEHOLDER, "0"))
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {e}", config.url_template)))?;

        let client = build_http_client(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            value_pointer: config.value_pointer.clone(),
        })
    }

    /// Build the request URL for a code.
    pub fn profit_url(&self, code: &str) -> Result<Url, String> {
        let raw = self.url_template.replace(CODE_PLACEHOLDER, code);
        Url::parse(&raw).map_err(|e| format!("Invalid profit URL {raw}: {e}"))
    }

    async fn lookup(&self, code: &str) -> Lookup<String> {
        let url = match self.profit_url(code) {
            Ok(url) => url,
            Err(e) => return Lookup::Error(e),
        };

        let result = get_text(&self.client, url).await.and_then(|body| {
            match serde_json::from_str::<Value>(&body) {
                Ok(json) => extract_profit(&json, &self.value_pointer),
                Err(e) => Lookup::Error(format!("Failed to parse profit response: {e}")),
            }
        });
        debug!(code, outcome = result.kind(), "Profit lookup");
        result
    }
}

impl ProfitProvider for JsonProfitClient {
    fn fetch_profit<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Lookup<String>> {
        Box::pin(self.lookup(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_string_profit() {
        let body = json!({"netProfit": " 11,058 "});
        assert_eq!(
            extract_profit(&body, "/netProfit"),
            Lookup::Found("11,058".to_string())
        );
    }

    #[test]
    fn test_extract_number_profit() {
        let body = json!({"results": [{"netProfit": 6106.5}]});
        assert_eq!(
            extract_profit(&body, "/results/0/netProfit"),
            Lookup::Found("6106.5".to_string())
        );
    }

    #[test]
    fn test_extract_missing_null_blank_are_not_found() {
        assert_eq!(extract_profit(&json!({}), "/netProfit"), Lookup::NotFound);
        assert_eq!(
            extract_profit(&json!({"netProfit": null}), "/netProfit"),
            Lookup::NotFound
        );
        assert_eq!(
            extract_profit(&json!({"netProfit": "  "}), "/netProfit"),
            Lookup::NotFound
        );
    }

    #[test]
    fn test_extract_unexpected_type_is_error() {
        let body = json!({"netProfit": {"value": 1}});
        assert!(extract_profit(&body, "/netProfit").is_error());
    }

    #[test]
    fn test_profit_url_substitutes_code() {
        let config = ProfitSourceConfig {
            url_template: "https://example.com/api/{code}/results".to_string(),
            ..Default::default()
        };
        let client = JsonProfitClient::new(&config).unwrap();
        assert_eq!(
            client.profit_url("532540").unwrap().as_str(),
            "https://example.com/api/532540/results"
        );
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let config = ProfitSourceConfig {
            url_template: "https://example.com/api/results".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            JsonProfitClient::new(&config),
            Err(ProviderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pointer_must_be_rfc6901() {
        let config = ProfitSourceConfig {
            value_pointer: "netProfit".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            JsonProfitClient::new(&config),
            Err(ProviderError::InvalidConfig(_))
        ));
    }
}
