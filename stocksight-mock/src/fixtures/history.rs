use chrono::{DateTime, Duration, NaiveTime, Utc};
use stocksight_core::{Interval, Period, PriceBar};

use super::lookup;

const fn step_days(interval: Interval) -> i64 {
    match interval {
        Interval::D5 => 5,
        Interval::W1 => 7,
        Interval::Mo1 => 30,
        Interval::Mo3 => 90,
        _ => 1,
    }
}

/// Deterministic close `back` days before today: a small saw-tooth around `base`.
#[allow(clippy::cast_precision_loss)]
pub fn close_at(base: f64, back: i64) -> f64 {
    let phase = (back % 10) as f64 - 5.0;
    (base * (1.0 + 0.004 * phase) * 100.0).round() / 100.0
}

fn today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Bars dated relative to today, so the store's refresh and lookback windows see them as fresh.
pub fn by_symbol(s: &str, period: Period, interval: Interval) -> Option<Vec<PriceBar>> {
    let fixture = lookup(s)?;
    let step = step_days(interval);
    let today = today();
    let bars = (0..period.lookback_days())
        .rev()
        .filter(|back| back % step == 0)
        .map(|back| {
            let close = close_at(fixture.base, back);
            PriceBar {
                date: today - Duration::days(back),
                open: close * 0.995,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000_000 + u64::try_from(back).unwrap_or(0) * 1_000,
            }
        })
        .collect();
    Some(bars)
}
