//! Cached OHLCV bars.

use std::time::Duration;

use chrono::Utc;
use rusqlite::params;
use stocksight_types::{Period, PriceBar, Symbol};

use crate::{Store, StoreError, or_default, time};

impl Store {
    /// Replace the refresh window of `symbol`'s bars with `bars`.
    ///
    /// Bars dated on or after `now - refresh_window` are deleted first, then every provided
    /// bar is inserted (older bars that collide on date are overwritten). When a retention
    /// window is configured, bars older than it are purged in the same transaction.
    /// Returns `false` and leaves the table untouched if any statement fails.
    pub fn upsert_price_bars(&self, symbol: &Symbol, bars: &[PriceBar]) -> bool {
        let res = self.write_price_bars(symbol, bars);
        if let Ok(n) = res {
            tracing::debug!(symbol = %symbol, bars = n, "price bars refreshed");
        }
        or_default("upsert_price_bars", Some(symbol), res.map(|_| true))
    }

    /// Cached bars for `symbol` within the lookback window of `period`, oldest first.
    ///
    /// Returns `None` when nothing is cached (or the read fails).
    #[must_use]
    pub fn cached_price_bars(&self, symbol: &Symbol, period: Period) -> Option<Vec<PriceBar>> {
        let res = self.read_price_bars(symbol, period).map(Some);
        or_default("cached_price_bars", Some(symbol), res).filter(|bars| !bars.is_empty())
    }

    /// Symbols refreshed within `within`, most recently refreshed first.
    #[must_use]
    pub fn recent_symbols(&self, within: Duration, limit: usize) -> Vec<Symbol> {
        or_default("recent_symbols", None, self.read_recent_symbols(within, limit))
    }

    fn write_price_bars(&self, symbol: &Symbol, bars: &[PriceBar]) -> Result<usize, StoreError> {
        let now = Utc::now();
        let cutoff = now - time::span(self.cfg.refresh_window)?;
        let created_at = time::encode(now);

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let replaced = tx.execute(
            "DELETE FROM price_bar WHERE symbol = ?1 AND date >= ?2",
            params![symbol.as_str(), time::encode(cutoff)],
        )?;
        if let Some(retention) = self.cfg.retention {
            let horizon = now - time::span(retention)?;
            let purged = tx.execute(
                "DELETE FROM price_bar WHERE symbol = ?1 AND date < ?2",
                params![symbol.as_str(), time::encode(horizon)],
            )?;
            if purged > 0 {
                tracing::debug!(symbol = %symbol, purged, "expired bars purged");
            }
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO price_bar (symbol, date, open, high, low, close, volume, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(symbol, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume,
                    created_at = excluded.created_at",
            )?;
            for bar in bars {
                stmt.execute(params![
                    symbol.as_str(),
                    time::encode(bar.date),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    i64::try_from(bar.volume).unwrap_or(i64::MAX),
                    created_at,
                ])?;
            }
        }
        tx.commit()?;

        tracing::trace!(symbol = %symbol, replaced, inserted = bars.len(), "bar window rewritten");
        Ok(bars.len())
    }

    fn read_price_bars(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PriceBar>, StoreError> {
        let since = time::encode(Utc::now() - period.lookback());
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT date, open, high, low, close, volume FROM price_bar
             WHERE symbol = ?1 AND date >= ?2
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(params![symbol.as_str(), since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (date, open, high, low, close, volume) = row?;
            out.push(PriceBar {
                date: time::decode(&date)?,
                open,
                high,
                low,
                close,
                volume: u64::try_from(volume).unwrap_or(0),
            });
        }
        Ok(out)
    }

    fn read_recent_symbols(
        &self,
        within: Duration,
        limit: usize,
    ) -> Result<Vec<Symbol>, StoreError> {
        let since = time::encode(Utc::now() - time::span(within)?);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT symbol, MAX(created_at) AS refreshed FROM price_bar
             WHERE created_at >= ?1
             GROUP BY symbol
             ORDER BY refreshed DESC, symbol ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![since, limit], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            let raw = row?;
            out.push(Symbol::new(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?);
        }
        Ok(out)
    }
}
