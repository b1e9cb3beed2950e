#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use stocksight_store::Store;
use stocksight_types::{PriceBar, StoreConfig, Symbol};
use tempfile::TempDir;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub store: Store,
    pub path: std::path::PathBuf,
}

pub fn setup_store() -> TestDb {
    setup_store_with(|_| {})
}

pub fn setup_store_with(tweak: impl FnOnce(&mut StoreConfig)) -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("test.db");
    let mut cfg = StoreConfig::at(&path);
    tweak(&mut cfg);
    let store = Store::open(cfg).expect("open store");
    assert!(store.init_schema(), "schema init");
    TestDb {
        _dir: dir,
        store,
        path,
    }
}

pub fn sym(s: &str) -> Symbol {
    Symbol::new(s).expect("valid symbol")
}

/// Midnight UTC `days` days before today.
pub fn days_ago(days: i64) -> DateTime<Utc> {
    (Utc::now() - Duration::days(days))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight")
        .and_utc()
}

pub fn bar(days: i64, close: f64) -> PriceBar {
    PriceBar {
        date: days_ago(days),
        open: close - 1.0,
        high: close + 2.0,
        low: close - 2.0,
        close,
        volume: 1_000 + u64::try_from(days).unwrap_or(0),
    }
}

/// One bar per day for `days` (inclusive range, oldest first).
pub fn series(days: std::ops::RangeInclusive<i64>, close: f64) -> Vec<PriceBar> {
    let mut out: Vec<PriceBar> = days.map(|d| bar(d, close)).collect();
    out.sort_by_key(|b| b.date);
    out
}
