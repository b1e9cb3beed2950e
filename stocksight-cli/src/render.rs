//! Plain-text and CSV rendering of market data.

use std::fmt::Write as _;
use std::io;

use stocksight::{MarketData, PriceBar};

/// Abbreviate large amounts: `2.50T`, `830.00B`, `12.40M`.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{value:.2}")
    }
}

/// Human-readable summary of a quote, ending with the last `tail` bars.
pub fn quote_report(data: &MarketData, tail: usize) -> String {
    let snap = &data.snapshot;
    let cur = data.currency_symbol();
    let money = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{cur}{v:.2}"));

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", snap.display_name(), snap.symbol);
    if let Some(sector) = &snap.sector {
        let industry = snap.industry.as_deref().unwrap_or("n/a");
        let _ = writeln!(out, "Sector:      {sector} / {industry}");
    }
    let _ = writeln!(out, "Price:       {}", money(snap.market_price));
    if let Some(change) = data.price_change() {
        let _ = writeln!(
            out,
            "Change:      {:+.2} ({:+.2}%)",
            change.change, change.change_pct
        );
    }
    let _ = writeln!(out, "Prev close:  {}", money(snap.previous_close));
    let _ = writeln!(
        out,
        "52w range:   {} - {}",
        money(snap.week52_low),
        money(snap.week52_high)
    );
    if let Some(cap) = snap.market_cap {
        let _ = writeln!(out, "Market cap:  {cur}{}", compact(cap));
    }
    if let Some(pe) = snap.pe_ratio {
        let _ = writeln!(out, "P/E:         {pe:.2}");
    }
    if let Some(dy) = snap.dividend_yield {
        let _ = writeln!(out, "Div yield:   {:.2}%", dy * 100.0);
    }
    if let Some(revenue) = snap.total_revenue {
        let _ = writeln!(out, "Revenue:     {cur}{}", compact(revenue));
    }
    if let Some(margin) = snap.profit_margin {
        let _ = writeln!(out, "Margin:      {:.2}%", margin * 100.0);
    }
    if let Some(employees) = snap.employees {
        let _ = writeln!(out, "Employees:   {employees}");
    }
    if let Some(website) = &snap.website {
        let _ = writeln!(out, "Website:     {website}");
    }

    let start = data.bars.len().saturating_sub(tail);
    for bar in &data.bars[start..] {
        let _ = writeln!(
            out,
            "{}  {cur}{:.2}  vol {}",
            bar.date.format("%Y-%m-%d"),
            bar.close,
            bar.volume
        );
    }
    out
}

/// Write `bars` as CSV with a header row.
pub fn write_bars_csv<W: io::Write>(w: W, bars: &[PriceBar]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(["date", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            format!("{:.4}", bar.open),
            format!("{:.4}", bar.high),
            format!("{:.4}", bar.low),
            format!("{:.4}", bar.close),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
