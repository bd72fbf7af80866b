//! Provider traits for per-listing lookups.
//!
//! Trait-based so the ingester can be driven by HTTP clients in
//! production and by static tables in tests.

use nse_core::{Lookup, MetricsSnapshot};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Source of market metrics, queried by symbol.
pub trait MetricsProvider: Send + Sync {
    /// Fetch market cap and ROE for a symbol.
    fn fetch_metrics<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Lookup<MetricsSnapshot>>;
}

/// Source of profit figures, queried by primary code.
pub trait ProfitProvider: Send + Sync {
    /// Fetch the profit text for a primary code.
    fn fetch_profit<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Lookup<String>>;
}

/// Table-backed metrics provider for testing.
///
/// Unknown symbols resolve to `Lookup::NotFound`.
#[derive(Debug, Default)]
pub struct StaticMetricsProvider {
    entries: HashMap<String, Lookup<MetricsSnapshot>>,
    calls: Mutex<Vec<String>>,
}

impl StaticMetricsProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup result for a symbol.
    pub fn with(mut self, symbol: impl Into<String>, result: Lookup<MetricsSnapshot>) -> Self {
        self.entries.insert(symbol.into(), result);
        self
    }

    /// Register found metrics for a symbol.
    pub fn with_metrics(self, symbol: impl Into<String>, metrics: MetricsSnapshot) -> Self {
        self.with(symbol, Lookup::Found(metrics))
    }

    /// Symbols queried so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl MetricsProvider for StaticMetricsProvider {
    fn fetch_metrics<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Lookup<MetricsSnapshot>> {
        self.calls.lock().push(symbol.to_string());
        let result = self
            .entries
            .get(symbol)
            .cloned()
            .unwrap_or(Lookup::NotFound);
        Box::pin(async move { result })
    }
}

/// Table-backed profit provider for testing.
///
/// Unknown codes resolve to `Lookup::NotFound`.
#[derive(Debug, Default)]
pub struct StaticProfitProvider {
    entries: HashMap<String, Lookup<String>>,
    calls: Mutex<Vec<String>>,
}

impl StaticProfitProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup result for a code.
    pub fn with(mut self, code: impl Into<String>, result: Lookup<String>) -> Self {
        self.entries.insert(code.into(), result);
        self
    }

    /// Register a found profit figure for a code.
    pub fn with_profit(self, code: impl Into<String>, profit: impl Into<String>) -> Self {
        self.with(code, Lookup::Found(profit.into()))
    }

    /// Codes queried so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl ProfitProvider for StaticProfitProvider {
    fn fetch_profit<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Lookup<String>> {
        self.calls.lock().push(code.to_string());
        let result = self.entries.get(code).cloned().unwrap_or(Lookup::NotFound);
        Box::pin(async move { result })
    }
}
