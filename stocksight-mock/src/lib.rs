//! stocksight-mock
//!
//! Deterministic connectors for tests and offline runs.
//!
//! [`MockConnector`] serves fixture data for a handful of US, Indian and German symbols.
//! Bars are dated relative to today. Two magic symbols exercise failure paths: `FAIL`
//! returns a connector error and `TIMEOUT` sleeps before answering. Any other unknown symbol
//! gets empty history and a snapshot without a live price.
//!
//! [`DynamicMockConnector`] defers every call to rules set through its controller and counts
//! calls per capability.
#![warn(missing_docs)]

use std::time::Duration;

use async_trait::async_trait;
use stocksight_core::connector::{HistoryProvider, ProfileProvider, StockConnector};
use stocksight_core::{CompanySnapshot, Interval, Period, PriceBar, SightError, Symbol};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// How long the `TIMEOUT` symbol stalls before answering.
pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

/// Mock connector for CI-safe runs. Provides deterministic data from static fixtures.
#[derive(Debug, Clone, Copy)]
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Create the fixture connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Symbols that have fixture data.
    pub fn known_symbols() -> impl Iterator<Item = &'static str> {
        fixtures::KNOWN.iter().map(|f| f.symbol)
    }

    async fn maybe_fail_or_timeout(
        symbol: &Symbol,
        capability: &'static str,
    ) -> Result<(), SightError> {
        match symbol.as_str() {
            "FAIL" => Err(SightError::connector(
                "stocksight-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl StockConnector for MockConnector {
    fn name(&self) -> &'static str {
        "stocksight-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, SightError> {
        Self::maybe_fail_or_timeout(symbol, "history").await?;
        Ok(fixtures::history::by_symbol(symbol.as_str(), period, interval).unwrap_or_default())
    }
}

#[async_trait]
impl ProfileProvider for MockConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanySnapshot, SightError> {
        Self::maybe_fail_or_timeout(symbol, "profile").await?;
        Ok(fixtures::profile::by_symbol(symbol))
    }
}
