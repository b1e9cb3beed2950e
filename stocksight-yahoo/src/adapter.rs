#[cfg(feature = "test-adapters")]
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use stocksight_core::SightError;
use tokio::sync::Mutex;

use crate::wire::{ApiError, ChartEnvelope, ChartResult, SummaryEnvelope, SummaryResult};

const NAME: &str = "stocksight-yahoo";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const SUMMARY_MODULES: &str = "price,summaryProfile,summaryDetail,financialData";

/// Chart abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait YahooChart: Send + Sync {
    /// Fetch the chart for `symbol` using Yahoo range and interval codes (e.g. `1y`, `1d`).
    async fn chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartResult, SightError>;
}

/// quoteSummary abstraction for fundamentals.
#[async_trait]
pub trait YahooSummary: Send + Sync {
    /// Fetch the price, profile and detail modules for `symbol`.
    async fn summary(&self, symbol: &str) -> Result<SummaryResult, SightError>;
}

/// Base URLs the production adapter talks to. Overridable for tests and proxies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Host serving `/v8/finance/chart`.
    pub chart_base: String,
    /// Host serving `/v10/finance/quoteSummary` and `/v1/test/getcrumb`.
    pub summary_base: String,
    /// Page visited once to obtain the consent cookie before asking for a crumb.
    pub cookie_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            chart_base: "https://query1.finance.yahoo.com".into(),
            summary_base: "https://query2.finance.yahoo.com".into(),
            cookie_url: "https://fc.yahoo.com".into(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL (a local mock server, typically).
    #[must_use]
    pub fn single_host(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            cookie_url: format!("{base}/consent"),
            chart_base: base.clone(),
            summary_base: base,
        }
    }
}

/// Production adapter backed by `reqwest`.
#[derive(Clone)]
pub struct RealAdapter {
    http: reqwest::Client,
    endpoints: std::sync::Arc<Endpoints>,
    crumb: std::sync::Arc<Mutex<Option<String>>>,
}

impl std::fmt::Debug for RealAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealAdapter")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl RealAdapter {
    /// Build a client with a cookie store and a browser user agent against Yahoo's hosts.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn try_new_default() -> Result<Self, SightError> {
        Self::try_with_endpoints(Endpoints::default())
    }

    /// Like [`RealAdapter::try_new_default`] but against custom endpoints.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn try_with_endpoints(endpoints: Endpoints) -> Result<Self, SightError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| SightError::connector(NAME, e.to_string()))?;
        Ok(Self::with_client(http, endpoints))
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// The client should enable a cookie store, otherwise the crumb handshake fails and
    /// fundamentals are unavailable.
    #[must_use]
    pub fn with_client(http: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints: std::sync::Arc::new(endpoints),
            crumb: std::sync::Arc::new(Mutex::new(None)),
        }
    }

    fn url(base: &str, segments: &[&str]) -> Result<Url, SightError> {
        let mut url =
            Url::parse(base).map_err(|e| SightError::InvalidArg(format!("base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SightError::InvalidArg(format!("base url cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        symbol: &str,
    ) -> Result<T, SightError> {
        let resp = req.send().await.map_err(|e| transport(&e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| transport(&e))?;
        check_status(status, symbol, &body)?;
        serde_json::from_str(&body).map_err(|e| SightError::Data(format!("{symbol}: {e}")))
    }

    async fn crumb(&self) -> Result<String, SightError> {
        let mut slot = self.crumb.lock().await;
        if let Some(c) = slot.as_ref() {
            return Ok(c.clone());
        }
        // Only the Set-Cookie side effect matters; fc.yahoo.com answers 404 by design.
        if let Err(e) = self.http.get(&self.endpoints.cookie_url).send().await {
            tracing::debug!(error = %e, "cookie priming request failed");
        }
        let url = Self::url(&self.endpoints.summary_base, &["v1", "test", "getcrumb"])?;
        let resp = self.http.get(url).send().await.map_err(|e| transport(&e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| transport(&e))?;
        if !status.is_success() {
            return Err(SightError::connector(NAME, format!("crumb request: {status}")));
        }
        let crumb = text.trim();
        if crumb.is_empty() || crumb.contains('<') || crumb.contains('{') {
            return Err(SightError::Data("crumb response was not a token".into()));
        }
        tracing::debug!("obtained yahoo crumb");
        *slot = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn forget_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    async fn summary_once(&self, symbol: &str) -> Result<SummaryEnvelope, SightError> {
        let crumb = self.crumb().await?;
        let url = Self::url(
            &self.endpoints.summary_base,
            &["v10", "finance", "quoteSummary", symbol],
        )?;
        let req = self
            .http
            .get(url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())]);
        self.get_json(req, symbol).await
    }
}

fn transport(e: &reqwest::Error) -> SightError {
    SightError::connector(NAME, e.to_string())
}

fn check_status(status: StatusCode, symbol: &str, body: &str) -> Result<(), SightError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::NOT_FOUND => SightError::not_found(symbol),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SightError::connector(NAME, format!("unauthorized ({status})"))
        }
        StatusCode::TOO_MANY_REQUESTS => SightError::connector(NAME, "rate limited (429)"),
        s if s.is_server_error() => SightError::connector(NAME, format!("server error {s}")),
        s => {
            let snippet: String = body.chars().take(120).collect();
            SightError::connector(NAME, format!("unexpected status {s}: {snippet}"))
        }
    })
}

fn api_error(err: &ApiError, symbol: &str) -> SightError {
    if looks_like_not_found(&err.code) || looks_like_not_found(&err.description) {
        SightError::not_found(symbol)
    } else {
        SightError::connector(NAME, format!("{}: {}", err.code, err.description))
    }
}

pub(crate) fn looks_like_not_found(msg: &str) -> bool {
    let m = msg.to_ascii_lowercase();
    m.contains("not found") || m.contains("no data") || m.contains("delisted")
}

#[async_trait]
impl YahooChart for RealAdapter {
    async fn chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartResult, SightError> {
        let url = Self::url(&self.endpoints.chart_base, &["v8", "finance", "chart", symbol])?;
        let req = self.http.get(url).query(&[
            ("range", range),
            ("interval", interval),
            ("includePrePost", "false"),
        ]);
        let env: ChartEnvelope = self.get_json(req, symbol).await?;
        if let Some(err) = env.chart.error.as_ref() {
            return Err(api_error(err, symbol));
        }
        env.chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| SightError::not_found(symbol))
    }
}

#[async_trait]
impl YahooSummary for RealAdapter {
    async fn summary(&self, symbol: &str) -> Result<SummaryResult, SightError> {
        let env = match self.summary_once(symbol).await {
            Err(SightError::Connector { msg, .. }) if msg.starts_with("unauthorized") => {
                tracing::debug!(symbol, "crumb rejected; refreshing once");
                self.forget_crumb().await;
                self.summary_once(symbol).await?
            }
            other => other?,
        };
        if let Some(err) = env.quote_summary.error.as_ref() {
            return Err(api_error(err, symbol));
        }
        env.quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| SightError::not_found(symbol))
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn YahooChart {
    /// Build a `YahooChart` from a closure (tests only).
    ///
    /// The closure receives `(symbol, range, interval)`.
    pub fn from_fn<F>(f: F) -> Arc<dyn YahooChart>
    where
        F: Send + Sync + 'static + Fn(String, String, String) -> Result<ChartResult, SightError>,
    {
        struct FnChart<F>(F);
        #[async_trait]
        impl<F> YahooChart for FnChart<F>
        where
            F: Send
                + Sync
                + 'static
                + Fn(String, String, String) -> Result<ChartResult, SightError>,
        {
            async fn chart(
                &self,
                symbol: &str,
                range: &str,
                interval: &str,
            ) -> Result<ChartResult, SightError> {
                (self.0)(symbol.to_string(), range.to_string(), interval.to_string())
            }
        }
        Arc::new(FnChart(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn YahooSummary {
    /// Build a `YahooSummary` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YahooSummary>
    where
        F: Send + Sync + 'static + Fn(String) -> Result<SummaryResult, SightError>,
    {
        struct FnSummary<F>(F);
        #[async_trait]
        impl<F> YahooSummary for FnSummary<F>
        where
            F: Send + Sync + 'static + Fn(String) -> Result<SummaryResult, SightError>,
        {
            async fn summary(&self, symbol: &str) -> Result<SummaryResult, SightError> {
                (self.0)(symbol.to_string())
            }
        }
        Arc::new(FnSummary(f))
    }
}

/// Helper trait to split a concrete adapter into arc trait objects.
#[cfg(feature = "test-adapters")]
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn YahooChart>`.
    fn clone_arc_chart(&self) -> Arc<dyn YahooChart> {
        <dyn YahooChart>::from_fn(|_, _, _| Err(SightError::unsupported("chart")))
    }
    /// Clone as `Arc<dyn YahooSummary>`.
    fn clone_arc_summary(&self) -> Arc<dyn YahooSummary> {
        <dyn YahooSummary>::from_fn(|_| Err(SightError::unsupported("summary")))
    }
}

#[cfg(feature = "test-adapters")]
impl CloneArcAdapters for RealAdapter {
    fn clone_arc_chart(&self) -> Arc<dyn YahooChart> {
        Arc::new(self.clone())
    }
    fn clone_arc_summary(&self) -> Arc<dyn YahooSummary> {
        Arc::new(self.clone())
    }
}
