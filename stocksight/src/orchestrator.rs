use stocksight_core::{CompanySnapshot, Interval, Period, PriceBar, Symbol};

use crate::StockSight;
use crate::fetcher::LiveQuote;
use crate::memo::MemoKey;
use crate::outcome::{FetchOutcome, MarketData};

impl StockSight {
    /// Fetch live data, persist it, and fall back to the store when the provider fails.
    ///
    /// Behavior:
    /// - Live success: bars (when non-empty) and the snapshot are written back, then returned
    ///   as [`FetchOutcome::Live`]. A failed write-back is logged and ignored.
    /// - Any failure with both bars and a snapshot cached: [`FetchOutcome::Cached`].
    /// - Any failure otherwise, including a partial cache: [`FetchOutcome::Failed`].
    ///
    /// Outcomes are memoized per (symbol, period, interval); see `SightConfig::memo_ttl`.
    #[tracing::instrument(
        name = "stocksight::fetch_with_fallback",
        skip(self),
        fields(symbol = %symbol, period = %period, interval = %interval),
    )]
    pub async fn fetch_with_fallback(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> FetchOutcome {
        let key = MemoKey::new(symbol, period, interval);
        if let Some(memo) = &self.memo
            && let Some(hit) = memo.get(&key).await
        {
            tracing::debug!(live = hit.is_live(), "memo hit");
            return hit;
        }

        let outcome = self.fetch_uncached(symbol, period, interval).await;
        if let Some(memo) = &self.memo {
            memo.insert(key, outcome.clone()).await;
        }
        outcome
    }

    async fn fetch_uncached(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> FetchOutcome {
        let (cached_bars, cached_snapshot) = self.read_cache(symbol, period).await;

        match self.fetch_quote(symbol, period, interval).await {
            Ok(live) => {
                self.write_back(symbol, &live).await;
                FetchOutcome::Live(MarketData {
                    bars: live.bars,
                    snapshot: live.snapshot,
                })
            }
            Err(cause) => match (cached_bars, cached_snapshot) {
                (Some(bars), Some(snapshot)) => {
                    tracing::warn!(
                        error = %cause,
                        bars = bars.len(),
                        "live fetch failed; serving cached data"
                    );
                    FetchOutcome::Cached {
                        data: MarketData { bars, snapshot },
                        cause,
                    }
                }
                (bars, snapshot) => {
                    tracing::info!(
                        error = %cause,
                        cached_bars = bars.is_some(),
                        cached_snapshot = snapshot.is_some(),
                        "live fetch failed; no complete cache"
                    );
                    FetchOutcome::Failed(cause)
                }
            },
        }
    }

    async fn read_cache(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> (Option<Vec<PriceBar>>, Option<CompanySnapshot>) {
        let store = self.store.clone();
        let sym = symbol.clone();
        let res = tokio::task::spawn_blocking(move || {
            (
                store.cached_price_bars(&sym, period),
                store.cached_company_snapshot(&sym),
            )
        })
        .await;
        res.unwrap_or_else(|e| {
            tracing::error!(error = %e, "cache read task failed");
            (None, None)
        })
    }

    async fn write_back(&self, symbol: &Symbol, live: &LiveQuote) {
        let store = self.store.clone();
        let sym = symbol.clone();
        let bars = live.bars.clone();
        let snapshot = live.snapshot.clone();
        let res = tokio::task::spawn_blocking(move || {
            let bars_ok = bars.is_empty() || store.upsert_price_bars(&sym, &bars);
            let snapshot_ok = store.upsert_company_snapshot(&snapshot);
            bars_ok && snapshot_ok
        })
        .await;
        match res {
            Ok(true) => {}
            Ok(false) => tracing::warn!("write-back incomplete; returning live data anyway"),
            Err(e) => tracing::error!(error = %e, "write-back task failed"),
        }
    }
}
