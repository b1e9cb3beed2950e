//! Mapping from Yahoo wire types to stocksight records.

use chrono::{DateTime, Utc};
use stocksight_core::{CompanySnapshot, PriceBar, SightError, Symbol};

use crate::wire::{ChartMeta, ChartResult, SummaryResult, raw};

/// Turn column-oriented chart data into ascending bars.
///
/// Rows with a missing or non-finite price, or an unrepresentable timestamp, are skipped;
/// a missing volume becomes zero.
pub(crate) fn bars(res: &ChartResult) -> Result<Vec<PriceBar>, SightError> {
    let Some(cols) = res.indicators.quote.first() else {
        if res.timestamp.is_empty() {
            return Ok(Vec::new());
        }
        return Err(SightError::Data(
            "chart has timestamps but no quote indicators".into(),
        ));
    };

    let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten().filter(|x| x.is_finite());

    let mut out: Vec<PriceBar> = Vec::with_capacity(res.timestamp.len());
    for (i, ts) in res.timestamp.iter().copied().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&cols.open, i),
            at(&cols.high, i),
            at(&cols.low, i),
            at(&cols.close, i),
        ) else {
            continue;
        };
        let Some(date) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        out.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume: volume(at(&cols.volume, i)),
        });
    }
    out.sort_by_key(|b| b.date);
    out.dedup_by_key(|b| b.date);
    Ok(out)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn volume(v: Option<f64>) -> u64 {
    v.filter(|x| *x >= 0.0).map_or(0, |x| x.round() as u64)
}

/// Snapshot seeded from chart metadata. `market_price` is the existence signal.
pub(crate) fn snapshot_from_meta(
    symbol: &Symbol,
    meta: &ChartMeta,
    at: DateTime<Utc>,
) -> CompanySnapshot {
    let mut snap = CompanySnapshot::new(symbol.clone(), at);
    snap.name = meta.long_name.clone().or_else(|| meta.short_name.clone());
    snap.currency = meta.currency.clone();
    snap.market_price = meta.regular_market_price.filter(|p| p.is_finite());
    snap.previous_close = meta.previous_close.or(meta.chart_previous_close);
    snap.week52_high = meta.fifty_two_week_high;
    snap.week52_low = meta.fifty_two_week_low;
    snap
}

/// Overlay quoteSummary fundamentals onto a snapshot. Values present in the summary win.
pub(crate) fn merge_summary(snap: &mut CompanySnapshot, s: &SummaryResult) {
    if let Some(price) = &s.price {
        if let Some(name) = price.long_name.clone().or_else(|| price.short_name.clone()) {
            snap.name = Some(name);
        }
        if price.currency.is_some() {
            snap.currency.clone_from(&price.currency);
        }
        snap.market_cap = raw(price.market_cap).or(snap.market_cap);
        snap.previous_close = raw(price.regular_market_previous_close).or(snap.previous_close);
    }
    if let Some(profile) = &s.summary_profile {
        snap.sector.clone_from(&profile.sector);
        snap.industry.clone_from(&profile.industry);
        snap.summary.clone_from(&profile.long_business_summary);
        snap.employees = profile.full_time_employees;
        snap.website.clone_from(&profile.website);
    }
    if let Some(detail) = &s.summary_detail {
        snap.pe_ratio = raw(detail.trailing_pe);
        snap.dividend_yield = raw(detail.dividend_yield);
        snap.week52_high = raw(detail.fifty_two_week_high).or(snap.week52_high);
        snap.week52_low = raw(detail.fifty_two_week_low).or(snap.week52_low);
        snap.previous_close = snap.previous_close.or(raw(detail.previous_close));
        snap.market_cap = snap.market_cap.or(raw(detail.market_cap));
    }
    if let Some(financial) = &s.financial_data {
        snap.total_revenue = raw(financial.total_revenue);
        snap.profit_margin = raw(financial.profit_margins);
    }
}
