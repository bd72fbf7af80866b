//! Yahoo Finance quoteSummary client.
//!
//! Fetches the `price` and `financialData` modules for `{symbol}{suffix}`
//! and converts them to a `MetricsSnapshot`:
//! - `price.marketCap.raw` is in rupees and is converted to crores
//! - `financialData.returnOnEquity.raw` is a ratio and is converted to percent

use crate::client::{build_http_client, get_text};
use crate::config::MetricsSourceConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, MetricsProvider};
use nse_core::{Crores, Lookup, MetricsSnapshot, Percent};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Modules requested from quoteSummary.
const QUOTE_MODULES: &str = "price,financialData";

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<QuoteModules>>,
    #[serde(default)]
    error: Option<QuoteError>,
}

#[derive(Debug, Deserialize)]
struct QuoteError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteModules {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 0.18, "fmt": "18.00%"}`; an empty
/// object means the value is unavailable.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn raw(value: &Option<RawValue>) -> Option<f64> {
        value.as_ref().and_then(|v| v.raw)
    }
}

/// Parse a quoteSummary response body.
///
/// A "Not Found" error or an empty result is `NotFound`, as is a
/// response missing either the market cap or the ROE.
pub fn parse_quote_summary(body: &str) -> Lookup<MetricsSnapshot> {
    let envelope: QuoteSummaryEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => return Lookup::Error(format!("Failed to parse quoteSummary: {e}")),
    };

    if let Some(error) = envelope.quote_summary.error {
        let code = error.code.unwrap_or_default();
        if code.eq_ignore_ascii_case("not found") {
            return Lookup::NotFound;
        }
        return Lookup::Error(format!(
            "quoteSummary error {code}: {}",
            error.description.unwrap_or_default()
        ));
    }

    let Some(modules) = envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
    else {
        return Lookup::NotFound;
    };

    let market_cap = modules
        .price
        .as_ref()
        .and_then(|p| RawValue::raw(&p.market_cap));
    let roe = modules
        .financial_data
        .as_ref()
        .and_then(|f| RawValue::raw(&f.return_on_equity));

    let (Some(market_cap), Some(roe)) = (market_cap, roe) else {
        return Lookup::NotFound;
    };

    match (Crores::from_rupees_f64(market_cap), Percent::from_ratio_f64(roe)) {
        (Ok(market_cap), Ok(roe)) => Lookup::Found(MetricsSnapshot::new(market_cap, roe)),
        (Err(e), _) | (_, Err(e)) => Lookup::Error(e.to_string()),
    }
}

/// Metrics provider backed by Yahoo Finance.
pub struct YahooMetricsClient {
    /// HTTP client.
    client: Client,
    /// API base URL.
    base_url: Url,
    /// Suffix appended to symbols (e.g. ".NS").
    symbol_suffix: String,
}

impl YahooMetricsClient {
    /// Create a new client from configuration.
    pub fn new(config: &MetricsSourceConfig) -> ProviderResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidUrl(config.base_url.clone()));
        }

        let client = build_http_client(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;

        Ok(Self {
            client,
            base_url,
            symbol_suffix: config.symbol_suffix.clone(),
        })
    }

    /// Build the quoteSummary URL for a symbol.
    ///
    /// The symbol is pushed as a path segment, so `/`, `?` and spaces
    /// are percent-encoded.
    pub fn quote_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        let ticker = format!("{symbol}{}", self.symbol_suffix);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v10", "finance", "quoteSummary", ticker.as_str()]);
        }
        url.query_pairs_mut().append_pair("modules", QUOTE_MODULES);
        url
    }

    async fn lookup(&self, symbol: &str) -> Lookup<MetricsSnapshot> {
        let result = get_text(&self.client, self.quote_url(symbol))
            .await
            .and_then(|body| parse_quote_summary(&body));
        debug!(symbol, outcome = result.kind(), "Metrics lookup");
        result
    }
}

impl MetricsProvider for YahooMetricsClient {
    fn fetch_metrics<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Lookup<MetricsSnapshot>> {
        Box::pin(self.lookup(symbol))
    }
}
