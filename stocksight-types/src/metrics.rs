use serde::{Deserialize, Serialize};

use crate::{CompanySnapshot, PriceBar};

/// Absolute and relative move between two prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    /// Latest price.
    pub current: f64,
    /// Reference price (previous close).
    pub previous: f64,
    /// `current - previous`.
    pub change: f64,
    /// Change in percent of `previous`.
    pub change_pct: f64,
}

impl PriceChange {
    /// Compute the move from `previous` to `current`.
    ///
    /// Returns `None` when `previous` is zero or either value is not finite.
    #[must_use]
    pub fn between(current: f64, previous: f64) -> Option<Self> {
        if !current.is_finite() || !previous.is_finite() || previous == 0.0 {
            return None;
        }
        let change = current - previous;
        Some(Self {
            current,
            previous,
            change,
            change_pct: change / previous * 100.0,
        })
    }

    /// Move between the last two closes of an ascending bar series.
    #[must_use]
    pub fn from_bars(bars: &[PriceBar]) -> Option<Self> {
        match bars {
            [.., prev, last] => Self::between(last.close, prev.close),
            _ => None,
        }
    }

    /// Move between the snapshot's live price and its previous close.
    #[must_use]
    pub fn from_snapshot(snapshot: &CompanySnapshot) -> Option<Self> {
        Self::between(snapshot.market_price?, snapshot.previous_close?)
    }
}
