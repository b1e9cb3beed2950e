use std::sync::Arc;
use std::time::Duration;

use stocksight_core::{SightConfig, SightError, StockConnector, Symbol};
use stocksight_store::Store;

use crate::memo::Memo;
use crate::watchlist::Watchlist;

/// Symbols offered when nothing has been looked up recently.
pub const POPULAR_SYMBOLS: &[&str] = &["AAPL", "MSFT", "GOOG", "TSLA", "TCS.NS", "RELIANCE.NS"];

const RECENT_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Dashboard core: fetches live market data through one connector, persists it, and serves
/// the persisted copy when the provider fails.
pub struct StockSight {
    pub(crate) connector: Arc<dyn StockConnector>,
    pub(crate) store: Store,
    pub(crate) cfg: SightConfig,
    pub(crate) memo: Option<Memo>,
}

impl std::fmt::Debug for StockSight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockSight")
            .field("connector", &self.connector.name())
            .field("store", &self.store)
            .field("cfg", &self.cfg)
            .field("memo", &self.memo.is_some())
            .finish()
    }
}

/// Builder for constructing a [`StockSight`] with custom configuration.
pub struct StockSightBuilder {
    connector: Option<Arc<dyn StockConnector>>,
    store: Option<Store>,
    cfg: SightConfig,
}

impl Default for StockSightBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StockSightBuilder {
    /// Create a new builder with default configuration.
    ///
    /// A connector and a store must be supplied before [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            store: None,
            cfg: SightConfig::default(),
        }
    }

    /// Set the market data connector. It must provide both history and profile.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn StockConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Set the persistence store. The schema is expected to be initialized already.
    #[must_use]
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SightConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the per-provider-call timeout.
    ///
    /// An expired call counts as a fetch failure and feeds the cache fallback.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// How long live outcomes stay memoized. Zero disables memoization entirely.
    #[must_use]
    pub const fn memo_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.memo_ttl = ttl;
        self
    }

    /// How long failed and cache-served outcomes stay memoized before the next retry.
    #[must_use]
    pub const fn memo_failure_ttl(mut self, ttl: Duration) -> Self {
        self.cfg.memo_failure_ttl = ttl;
        self
    }

    /// Maximum number of memoized outcomes.
    #[must_use]
    pub const fn memo_capacity(mut self, entries: u64) -> Self {
        self.cfg.memo_capacity = entries;
        self
    }

    /// Build the [`StockSight`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if the connector or store is missing, if the connector lacks the
    /// history or profile capability, or if the provider timeout is zero.
    pub fn build(self) -> Result<StockSight, SightError> {
        let connector = self.connector.ok_or_else(|| {
            SightError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            )
        })?;
        let store = self.store.ok_or_else(|| {
            SightError::InvalidArg("no store configured; add one via with_store(...)".to_string())
        })?;
        if connector.as_history_provider().is_none() || connector.as_profile_provider().is_none()
        {
            return Err(SightError::InvalidArg(format!(
                "connector {} must provide both history and profile",
                connector.name()
            )));
        }
        if self.cfg.provider_timeout.is_zero() {
            return Err(SightError::InvalidArg(
                "provider_timeout must be greater than zero".to_string(),
            ));
        }

        let memo = Memo::new(&self.cfg);
        tracing::debug!(
            connector = connector.name(),
            memo = memo.is_some(),
            timeout_ms = u64::try_from(self.cfg.provider_timeout.as_millis()).unwrap_or(u64::MAX),
            "stocksight ready"
        );
        Ok(StockSight {
            connector,
            store,
            cfg: self.cfg,
            memo,
        })
    }
}

impl StockSight {
    /// Start building a new `StockSight`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use stocksight::{StockSight, Store};
    /// use stocksight_mock::MockConnector;
    ///
    /// let store = Store::open_path("stocksight.db")?;
    /// assert!(store.init_schema());
    /// let sight = StockSight::builder()
    ///     .with_connector(Arc::new(MockConnector::new()))
    ///     .with_store(store)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> StockSightBuilder {
        StockSightBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SightConfig {
        &self.cfg
    }

    /// The underlying store handle.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The connector in use.
    #[must_use]
    pub fn connector(&self) -> &Arc<dyn StockConnector> {
        &self.connector
    }

    /// Watchlist manager sharing this instance's store.
    #[must_use]
    pub fn watchlist(&self) -> Watchlist {
        Watchlist::new(self.store.clone())
    }

    /// Symbols refreshed within the last week, most recent first, or [`POPULAR_SYMBOLS`]
    /// when none were.
    pub async fn popular_symbols(&self, limit: usize) -> Vec<Symbol> {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || store.recent_symbols(RECENT_WINDOW, limit));
        let recent = task.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "recent symbols task failed");
            Vec::new()
        });
        if !recent.is_empty() {
            return recent;
        }
        POPULAR_SYMBOLS
            .iter()
            .take(limit)
            .filter_map(|s| Symbol::new(s).ok())
            .collect()
    }

    /// Drop every memoized outcome so the next fetch goes to the provider.
    pub fn invalidate_memo(&self) {
        if let Some(memo) = &self.memo {
            memo.invalidate_all();
        }
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[tracing::instrument(
        name = "stocksight::core::provider_call_with_timeout",
        level = "debug",
        skip(fut),
        fields(
            connector = connector_name,
            capability = capability,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SightError>
    where
        Fut: core::future::Future<Output = Result<T, SightError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(SightError::provider_timeout(connector_name, capability)))
    }
}
