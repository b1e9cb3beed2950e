use rusqlite::{OptionalExtension, params};
use stocksight_types::{CompanySnapshot, Symbol};

use crate::{Store, StoreError, or_default, time};

impl Store {
    /// Insert or overwrite the snapshot row for `snapshot.symbol`.
    ///
    /// Absent optional fields are stored as NULL, replacing whatever was there.
    pub fn upsert_company_snapshot(&self, snapshot: &CompanySnapshot) -> bool {
        let res = self.write_snapshot(snapshot).map(|()| true);
        or_default("upsert_company_snapshot", Some(&snapshot.symbol), res)
    }

    /// The cached snapshot for `symbol`, if any.
    #[must_use]
    pub fn cached_company_snapshot(&self, symbol: &Symbol) -> Option<CompanySnapshot> {
        or_default("cached_company_snapshot", Some(symbol), self.read_snapshot(symbol))
    }

    fn write_snapshot(&self, s: &CompanySnapshot) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO company_snapshot (
                symbol, name, sector, industry, market_cap, pe_ratio, dividend_yield,
                week52_high, week52_low, summary, currency, market_price, previous_close,
                last_updated, employees, website, total_revenue, profit_margin
             ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
             )
             ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                sector = excluded.sector,
                industry = excluded.industry,
                market_cap = excluded.market_cap,
                pe_ratio = excluded.pe_ratio,
                dividend_yield = excluded.dividend_yield,
                week52_high = excluded.week52_high,
                week52_low = excluded.week52_low,
                summary = excluded.summary,
                currency = excluded.currency,
                market_price = excluded.market_price,
                previous_close = excluded.previous_close,
                last_updated = excluded.last_updated,
                employees = excluded.employees,
                website = excluded.website,
                total_revenue = excluded.total_revenue,
                profit_margin = excluded.profit_margin",
            params![
                s.symbol.as_str(),
                s.name,
                s.sector,
                s.industry,
                s.market_cap,
                s.pe_ratio,
                s.dividend_yield,
                s.week52_high,
                s.week52_low,
                s.summary,
                s.currency,
                s.market_price,
                s.previous_close,
                time::encode(s.last_updated),
                s.employees.and_then(|n| i64::try_from(n).ok()),
                s.website,
                s.total_revenue,
                s.profit_margin,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn read_snapshot(&self, symbol: &Symbol) -> Result<Option<CompanySnapshot>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT name, sector, industry, market_cap, pe_ratio, dividend_yield,
                        week52_high, week52_low, summary, currency, market_price,
                        previous_close, last_updated, employees, website, total_revenue,
                        profit_margin
                 FROM company_snapshot WHERE symbol = ?1",
                [symbol.as_str()],
                |row| {
                    let mut snap = CompanySnapshot::new(symbol.clone(), chrono::Utc::now());
                    snap.name = row.get(0)?;
                    snap.sector = row.get(1)?;
                    snap.industry = row.get(2)?;
                    snap.market_cap = row.get(3)?;
                    snap.pe_ratio = row.get(4)?;
                    snap.dividend_yield = row.get(5)?;
                    snap.week52_high = row.get(6)?;
                    snap.week52_low = row.get(7)?;
                    snap.summary = row.get(8)?;
                    snap.currency = row.get(9)?;
                    snap.market_price = row.get(10)?;
                    snap.previous_close = row.get(11)?;
                    snap.employees = row
                        .get::<_, Option<i64>>(13)?
                        .and_then(|n| u64::try_from(n).ok());
                    snap.website = row.get(14)?;
                    snap.total_revenue = row.get(15)?;
                    snap.profit_margin = row.get(16)?;
                    Ok((snap, row.get::<_, String>(12)?))
                },
            )
            .optional()?;

        row.map(|(mut snap, updated)| {
            snap.last_updated = time::decode(&updated)?;
            Ok::<_, StoreError>(snap)
        })
        .transpose()
    }
}
