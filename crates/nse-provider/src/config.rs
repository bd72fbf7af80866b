//! Provider configuration.

use serde::{Deserialize, Serialize};

/// Metrics source (Yahoo quoteSummary) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSourceConfig {
    /// API base URL. Default: "https://query1.finance.yahoo.com".
    #[serde(default = "default_metrics_base_url")]
    pub base_url: String,
    /// Exchange suffix appended to every symbol. Default: ".NS".
    #[serde(default = "default_symbol_suffix")]
    pub symbol_suffix: String,
    /// Request timeout (seconds). Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with each request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_metrics_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_symbol_suffix() -> String {
    ".NS".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("nse-screener/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for MetricsSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_metrics_base_url(),
            symbol_suffix: default_symbol_suffix(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Profit source configuration.
///
/// The profit endpoint is any JSON API addressable by primary code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitSourceConfig {
    /// URL with a `{code}` placeholder.
    #[serde(default = "default_profit_url_template")]
    pub url_template: String,
    /// JSON pointer (RFC 6901) to the profit value in the response.
    #[serde(default = "default_profit_pointer")]
    pub value_pointer: String,
    /// Request timeout (seconds). Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with each request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_profit_url_template() -> String {
    "http://127.0.0.1:8080/profit/{code}".to_string()
}

fn default_profit_pointer() -> String {
    "/netProfit".to_string()
}

impl Default for ProfitSourceConfig {
    fn default() -> Self {
        Self {
            url_template: default_profit_url_template(),
            value_pointer: default_profit_pointer(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
