//! Soft-delete watchlist log.
//!
//! Rows are never deleted. Adding a symbol inserts a new active row; removing flips the
//! active row to inactive. The partial unique index keeps at most one active row per symbol.

use chrono::Utc;
use rusqlite::params;
use stocksight_types::{Symbol, WatchState, WatchlistEntry};

use crate::{Store, StoreError, or_default, time};

impl Store {
    /// Insert a new active row for `symbol` unless one already exists.
    ///
    /// Returns `true` if a row was inserted.
    pub fn add_watchlist_entry(&self, symbol: &Symbol) -> bool {
        or_default("add_watchlist_entry", Some(symbol), self.insert_active(symbol))
    }

    /// Mark every active row for `symbol` inactive.
    ///
    /// Returns `true` if any row changed.
    pub fn deactivate_watchlist_entry(&self, symbol: &Symbol) -> bool {
        or_default(
            "deactivate_watchlist_entry",
            Some(symbol),
            self.deactivate(symbol),
        )
    }

    /// Symbols with an active row, most recently added first.
    #[must_use]
    pub fn list_active_watchlist(&self) -> Vec<Symbol> {
        or_default("list_active_watchlist", None, self.read_active())
    }

    /// Every row ever recorded for `symbol`, newest first.
    #[must_use]
    pub fn watchlist_history(&self, symbol: &Symbol) -> Vec<WatchlistEntry> {
        or_default("watchlist_history", Some(symbol), self.read_history(symbol))
    }

    fn insert_active(&self, symbol: &Symbol) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let active: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM watchlist WHERE symbol = ?1 AND is_active = 1)",
            [symbol.as_str()],
            |row| row.get(0),
        )?;
        if active {
            return Ok(false);
        }
        tx.execute(
            "INSERT INTO watchlist (symbol, added_at, is_active) VALUES (?1, ?2, 1)",
            params![symbol.as_str(), time::encode(Utc::now())],
        )?;
        tx.commit()?;
        tracing::info!(symbol = %symbol, "added to watchlist");
        Ok(true)
    }

    fn deactivate(&self, symbol: &Symbol) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE watchlist SET is_active = 0 WHERE symbol = ?1 AND is_active = 1",
            [symbol.as_str()],
        )?;
        tx.commit()?;
        if changed > 0 {
            tracing::info!(symbol = %symbol, "removed from watchlist");
        }
        Ok(changed > 0)
    }

    fn read_active(&self) -> Result<Vec<Symbol>, StoreError> {
        let conn = self.conn()?;
        // Grouping keeps the newest active row authoritative even for databases written
        // before the unique index existed.
        let mut stmt = conn.prepare(
            "SELECT symbol, MAX(added_at) AS latest, MAX(id) AS newest_id FROM watchlist
             WHERE is_active = 1
             GROUP BY symbol
             ORDER BY latest DESC, newest_id DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(parse_symbol(&row?)?);
        }
        Ok(out)
    }

    fn read_history(&self, symbol: &Symbol) -> Result<Vec<WatchlistEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT added_at, is_active FROM watchlist
             WHERE symbol = ?1
             ORDER BY added_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([symbol.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (added_at, is_active) = row?;
            out.push(WatchlistEntry {
                symbol: symbol.clone(),
                added_at: time::decode(&added_at)?,
                state: WatchState::from_flag(is_active),
            });
        }
        Ok(out)
    }
}

fn parse_symbol(raw: &str) -> Result<Symbol, StoreError> {
    Symbol::new(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}
