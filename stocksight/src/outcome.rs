use stocksight_core::{CompanySnapshot, PriceBar, PriceChange, SightError, currency_symbol};

/// A complete market data record: price history plus the company snapshot.
///
/// Both parts are always present, so partial data cannot be mistaken for a full result.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    /// Bars, oldest first.
    pub bars: Vec<PriceBar>,
    /// Company metadata and live price.
    pub snapshot: CompanySnapshot,
}

impl MarketData {
    /// Move from the previous close to the live price, falling back to the last two bars.
    #[must_use]
    pub fn price_change(&self) -> Option<PriceChange> {
        PriceChange::from_snapshot(&self.snapshot).or_else(|| PriceChange::from_bars(&self.bars))
    }

    /// Display symbol for the snapshot's currency.
    #[must_use]
    pub fn currency_symbol(&self) -> &'static str {
        currency_symbol(self.snapshot.currency.as_deref())
    }
}

/// Result of [`StockSight::fetch_with_fallback`](crate::StockSight::fetch_with_fallback).
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Fresh data from the provider (already written back to the store).
    Live(MarketData),
    /// The provider failed; both bars and snapshot were served from the store.
    Cached {
        /// Last persisted data.
        data: MarketData,
        /// Why the live fetch failed.
        cause: SightError,
    },
    /// The provider failed and the store held no complete record.
    Failed(SightError),
}

impl FetchOutcome {
    /// True when data is available (live or cached).
    #[must_use]
    pub const fn success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// True only for fresh provider data.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// The data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&MarketData> {
        match self {
            Self::Live(data) | Self::Cached { data, .. } => Some(data),
            Self::Failed(_) => None,
        }
    }

    /// Bars, if any.
    #[must_use]
    pub fn bars(&self) -> Option<&[PriceBar]> {
        self.data().map(|d| d.bars.as_slice())
    }

    /// Snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&CompanySnapshot> {
        self.data().map(|d| &d.snapshot)
    }

    /// The error of a failed outcome.
    #[must_use]
    pub const fn error(&self) -> Option<&SightError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// The live-fetch error hidden behind a cache-served outcome.
    #[must_use]
    pub const fn fallback_cause(&self) -> Option<&SightError> {
        match self {
            Self::Cached { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Convert into the data or the error.
    ///
    /// # Errors
    /// Returns the error of a [`FetchOutcome::Failed`] outcome.
    pub fn into_result(self) -> Result<MarketData, SightError> {
        match self {
            Self::Live(data) | Self::Cached { data, .. } => Ok(data),
            Self::Failed(e) => Err(e),
        }
    }
}
