use stocksight_core::{CompanySnapshot, Interval, Period, PriceBar, SightError, Symbol};

use crate::StockSight;

/// Fresh provider data for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuote {
    /// Bars over the requested period, oldest first. May be empty.
    pub bars: Vec<PriceBar>,
    /// Snapshot carrying the live price.
    pub snapshot: CompanySnapshot,
}

impl StockSight {
    /// Fetch history and the company snapshot from the provider, concurrently.
    ///
    /// A snapshot without a live price means the provider does not know the symbol, since
    /// unknown symbols still get an empty-but-valid history payload.
    ///
    /// # Errors
    /// `SymbolNotFound` when the snapshot lacks a live price; otherwise the first provider
    /// error (profile before history), including `ProviderTimeout`.
    #[tracing::instrument(
        name = "stocksight::fetch_quote",
        skip(self),
        fields(symbol = %symbol, period = %period, interval = %interval),
    )]
    pub async fn fetch_quote(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<LiveQuote, SightError> {
        let profile = self
            .connector
            .as_profile_provider()
            .ok_or_else(|| SightError::unsupported("profile"))?;
        let history = self
            .connector
            .as_history_provider()
            .ok_or_else(|| SightError::unsupported("history"))?;
        let name = self.connector.name();
        let timeout = self.cfg.provider_timeout;

        let (snapshot, bars) = tokio::join!(
            Self::provider_call_with_timeout(name, "profile", timeout, profile.profile(symbol)),
            Self::provider_call_with_timeout(
                name,
                "history",
                timeout,
                history.history(symbol, period, interval)
            ),
        );
        let quote = decide(symbol, snapshot, bars)?;
        tracing::debug!(bars = quote.bars.len(), "live quote fetched");
        Ok(quote)
    }
}

fn decide(
    symbol: &Symbol,
    snapshot: Result<CompanySnapshot, SightError>,
    bars: Result<Vec<PriceBar>, SightError>,
) -> Result<LiveQuote, SightError> {
    match (snapshot, bars) {
        (Ok(snapshot), _) if snapshot.market_price.is_none() => {
            Err(SightError::not_found(symbol.as_str()))
        }
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
        (Ok(snapshot), Ok(bars)) => Ok(LiveQuote { bars, snapshot }),
    }
}
