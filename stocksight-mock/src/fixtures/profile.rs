use chrono::Utc;
use stocksight_core::{CompanySnapshot, Symbol};

use super::{history::close_at, lookup};

/// Snapshot for `symbol`. Unknown symbols get an empty snapshot without a live price,
/// which is how the real provider answers for them.
pub fn by_symbol(symbol: &Symbol) -> CompanySnapshot {
    let mut snap = CompanySnapshot::new(symbol.clone(), Utc::now());
    let Some(f) = lookup(symbol.as_str()) else {
        return snap;
    };
    snap.name = Some(f.name.to_string());
    snap.sector = Some(f.sector.to_string());
    snap.industry = Some(f.industry.to_string());
    snap.currency = Some(f.currency.to_string());
    snap.market_price = Some(close_at(f.base, 0));
    snap.previous_close = Some(close_at(f.base, 1));
    snap.market_cap = Some(f.base * 1.0e10);
    snap.pe_ratio = Some(25.0);
    snap.dividend_yield = Some(0.005);
    snap.week52_high = Some(f.base * 1.2);
    snap.week52_low = Some(f.base * 0.8);
    snap.summary = Some(format!("{} fixture company.", f.name));
    snap.total_revenue = Some(f.base * 2.0e9);
    snap.profit_margin = Some(0.2);
    snap
}
