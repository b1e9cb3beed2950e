//! stocksight-yahoo
//!
//! Connector that implements `StockConnector` against Yahoo Finance's public chart and
//! quoteSummary endpoints. History comes from the chart endpoint; the company snapshot is
//! seeded from chart metadata (live price, currency, 52-week range) and enriched with
//! fundamentals from quoteSummary when the crumb handshake succeeds.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod convert;
/// Wire types for the Yahoo endpoints.
pub mod wire;

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{Endpoints, RealAdapter, YahooChart, YahooSummary};
use async_trait::async_trait;
use chrono::Utc;
use stocksight_core::{
    CompanySnapshot, Interval, Period, PriceBar, SightError, Symbol,
    connector::{ConnectorKey, HistoryProvider, ProfileProvider, StockConnector},
};

#[cfg(not(feature = "test-adapters"))]
type AdapterArc = Arc<RealAdapter>;

#[cfg(feature = "test-adapters")]
type ChartAdapter = Arc<dyn YahooChart>;
#[cfg(not(feature = "test-adapters"))]
type ChartAdapter = AdapterArc;

#[cfg(feature = "test-adapters")]
type SummaryAdapter = Arc<dyn YahooSummary>;
#[cfg(not(feature = "test-adapters"))]
type SummaryAdapter = AdapterArc;

/// Range used when only the chart metadata is needed.
const META_RANGE: &str = "5d";

/// Default bound on the quoteSummary round trip, crumb handshake included.
///
/// Kept well below the orchestrator's provider timeout so slow fundamentals never turn a
/// priced symbol into a failed fetch.
pub const DEFAULT_FUNDAMENTALS_TIMEOUT: Duration = Duration::from_secs(3);

/// Public connector type. Production users construct it with [`YahooConnector::try_new_default`].
pub struct YahooConnector {
    chart: ChartAdapter,
    summary: SummaryAdapter,
    fundamentals_timeout: Duration,
}

impl YahooConnector {
    /// Static connector key used in logs and error tags.
    pub const KEY: ConnectorKey = ConnectorKey::new("stocksight-yahoo");

    fn normalize_error(e: SightError, symbol: &Symbol) -> SightError {
        match e {
            SightError::Connector { connector, msg } => {
                if adapter::looks_like_not_found(&msg) {
                    SightError::not_found(symbol.as_str())
                } else {
                    SightError::Connector { connector, msg }
                }
            }
            other => other,
        }
    }

    /// Build against Yahoo's production hosts.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn try_new_default() -> Result<Self, SightError> {
        Ok(Self::from_adapter(&RealAdapter::try_new_default()?))
    }

    /// Build against custom endpoints (a proxy or a local mock server).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn try_with_endpoints(endpoints: Endpoints) -> Result<Self, SightError> {
        Ok(Self::from_adapter(&RealAdapter::try_with_endpoints(
            endpoints,
        )?))
    }

    /// Bound the fundamentals lookup (crumb handshake plus quoteSummary).
    ///
    /// When it expires the snapshot keeps only the chart metadata.
    #[must_use]
    pub const fn with_fundamentals_timeout(mut self, timeout: Duration) -> Self {
        self.fundamentals_timeout = timeout;
        self
    }

    /// Build from a provided `reqwest::Client`.
    ///
    /// Note: the client should enable a cookie store for the crumb handshake.
    #[must_use]
    pub fn with_reqwest_client(http: reqwest::Client) -> Self {
        Self::from_adapter(&RealAdapter::with_client(http, Endpoints::default()))
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            chart: adapter.clone_arc_chart(),
            summary: adapter.clone_arc_summary(),
            fundamentals_timeout: DEFAULT_FUNDAMENTALS_TIMEOUT,
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter` by cloning it into shared handles.
    #[must_use]
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        let shared = Arc::new(adapter.clone());
        Self {
            chart: Arc::clone(&shared),
            summary: shared,
            fundamentals_timeout: DEFAULT_FUNDAMENTALS_TIMEOUT,
        }
    }
}

#[async_trait]
impl HistoryProvider for YahooConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, SightError> {
        let raw = self
            .chart
            .chart(symbol.as_str(), period.as_str(), interval.as_str())
            .await
            .map_err(|e| Self::normalize_error(e, symbol))?;
        let bars = convert::bars(&raw)?;
        tracing::debug!(symbol = %symbol, period = %period, bars = bars.len(), "yahoo history");
        Ok(bars)
    }
}

#[async_trait]
impl ProfileProvider for YahooConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanySnapshot, SightError> {
        let raw = self
            .chart
            .chart(symbol.as_str(), META_RANGE, Interval::D1.as_str())
            .await
            .map_err(|e| Self::normalize_error(e, symbol))?;
        let mut snap = convert::snapshot_from_meta(symbol, &raw.meta, Utc::now());
        if snap.market_price.is_none() {
            return Ok(snap);
        }

        // Fundamentals are best-effort: the chart metadata already answers the dashboard.
        let lookup = self.summary.summary(symbol.as_str());
        match tokio::time::timeout(self.fundamentals_timeout, lookup).await {
            Ok(Ok(summary)) => convert::merge_summary(&mut snap, &summary),
            Ok(Err(e)) => {
                tracing::debug!(symbol = %symbol, error = %e, "quoteSummary unavailable");
            }
            Err(_) => {
                tracing::debug!(
                    symbol = %symbol,
                    timeout_ms = u64::try_from(self.fundamentals_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                    "quoteSummary timed out"
                );
            }
        }
        Ok(snap)
    }
}

impl StockConnector for YahooConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }
}
