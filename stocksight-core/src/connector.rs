use async_trait::async_trait;

use crate::{CompanySnapshot, Interval, Period, PriceBar, SightError, Symbol};
pub use stocksight_types::ConnectorKey;

/// Focused role trait for connectors that provide OHLCV history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch bars for `symbol` covering `period` at `interval`, ascending by date.
    ///
    /// An unknown symbol may legitimately yield an empty vector; existence is decided by
    /// [`ProfileProvider::profile`].
    async fn history(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, SightError>;
}

/// Focused role trait for connectors that provide company metadata and the live price.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Fetch the current company snapshot.
    ///
    /// Implementations report the live price in [`CompanySnapshot::market_price`] and leave
    /// it `None` when the provider has no price for the symbol.
    async fn profile(&self, symbol: &Symbol) -> Result<CompanySnapshot, SightError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
pub trait StockConnector: Send + Sync {
    /// A stable identifier used in logs and error tags (e.g. "stocksight-yahoo").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise history capability by returning a usable trait object reference when supported.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }

    /// Advertise profile capability by returning a usable trait object reference when supported.
    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        None
    }
}
