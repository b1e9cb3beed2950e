//! Short-lived in-process memo of fetch outcomes.
//!
//! Entries expire per outcome: live data after `memo_ttl`, failures and cache-served data
//! after `memo_failure_ttl`. Nothing is memoized forever, so a failure is always retried.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use stocksight_core::{Interval, Period, SightConfig, Symbol};

use crate::outcome::FetchOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    symbol: Symbol,
    period: Period,
    interval: Interval,
}

impl MemoKey {
    pub(crate) fn new(symbol: &Symbol, period: Period, interval: Interval) -> Self {
        Self {
            symbol: symbol.clone(),
            period,
            interval,
        }
    }
}

struct OutcomeExpiry {
    live: Duration,
    other: Duration,
}

impl Expiry<MemoKey, FetchOutcome> for OutcomeExpiry {
    fn expire_after_create(
        &self,
        _key: &MemoKey,
        value: &FetchOutcome,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(if value.is_live() { self.live } else { self.other })
    }
}

pub(crate) struct Memo {
    cache: Cache<MemoKey, FetchOutcome>,
}

impl Memo {
    /// `None` when memoization is disabled (`memo_ttl` of zero).
    pub(crate) fn new(cfg: &SightConfig) -> Option<Self> {
        if cfg.memo_ttl.is_zero() {
            return None;
        }
        let cache = Cache::builder()
            .max_capacity(cfg.memo_capacity)
            .expire_after(OutcomeExpiry {
                live: cfg.memo_ttl,
                other: cfg.memo_failure_ttl,
            })
            .build();
        Some(Self { cache })
    }

    pub(crate) async fn get(&self, key: &MemoKey) -> Option<FetchOutcome> {
        self.cache.get(key).await
    }

    pub(crate) async fn insert(&self, key: MemoKey, outcome: FetchOutcome) {
        self.cache.insert(key, outcome).await;
    }

    pub(crate) fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
