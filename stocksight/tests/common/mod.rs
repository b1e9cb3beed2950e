#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use stocksight::{CompanySnapshot, PriceBar, StockConnector, StockSight, Store, Symbol};
use stocksight_mock::{DynamicMockConnector, DynamicMockController, MockConnector};
use tempfile::TempDir;

pub struct Harness {
    _dir: TempDir, // keep alive for the life of the test
    pub sight: StockSight,
}

pub fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().expect("tempdir");
    let store = Store::open_path(dir.path().join("sight.db")).expect("open store");
    assert!(store.init_schema(), "schema init");
    (dir, store)
}

/// Fixture-backed instance with memoization disabled.
pub fn fixture_sight() -> Harness {
    build(Arc::new(MockConnector::new()), |b| b.memo_ttl(Duration::ZERO))
}

/// Dynamic-mock instance; `tweak` adjusts the builder before `build`.
pub fn dynamic_sight(
    tweak: impl FnOnce(stocksight::StockSightBuilder) -> stocksight::StockSightBuilder,
) -> (Harness, DynamicMockController) {
    let (connector, ctrl) = DynamicMockConnector::new_with_controller("dyn");
    (build(connector, tweak), ctrl)
}

fn build(
    connector: Arc<dyn StockConnector>,
    tweak: impl FnOnce(stocksight::StockSightBuilder) -> stocksight::StockSightBuilder,
) -> Harness {
    let (dir, store) = temp_store();
    let builder = StockSight::builder()
        .with_connector(connector)
        .with_store(store);
    let sight = tweak(builder).build().expect("build");
    Harness { _dir: dir, sight }
}

pub fn sym(s: &str) -> Symbol {
    Symbol::new(s).expect("valid symbol")
}

/// Midnight UTC `days` days before today.
pub fn days_ago(days: i64) -> DateTime<Utc> {
    (Utc::now() - chrono::Duration::days(days))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight")
        .and_utc()
}

/// One bar per day from `days` days ago up to today, oldest first.
pub fn bars(days: i64, close: f64) -> Vec<PriceBar> {
    (0..=days)
        .rev()
        .map(|d| PriceBar {
            date: days_ago(d),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

pub fn snapshot(s: &str, price: Option<f64>) -> CompanySnapshot {
    let mut snap = CompanySnapshot::new(sym(s), Utc::now());
    snap.name = Some(format!("{s} Inc."));
    snap.currency = Some("USD".into());
    snap.market_price = price;
    snap.previous_close = price.map(|p| p - 1.0);
    snap
}
