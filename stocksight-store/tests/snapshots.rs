mod common;

use chrono::{TimeZone, Utc};
use common::{setup_store, sym};
use stocksight_types::CompanySnapshot;

fn infosys() -> CompanySnapshot {
    let at = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
    let mut s = CompanySnapshot::new(sym("INFY.NS"), at);
    s.name = Some("Infosys Limited".into());
    s.sector = Some("Technology".into());
    s.industry = Some("Information Technology Services".into());
    s.market_cap = Some(6.1e12);
    s.pe_ratio = Some(24.5);
    s.dividend_yield = Some(0.027);
    s.week52_high = Some(1_733.0);
    s.week52_low = Some(1_358.35);
    s.summary = Some("IT services and consulting.".into());
    s.employees = Some(317_240);
    s.website = Some("https://www.infosys.com".into());
    s.total_revenue = Some(1.53e12);
    s.profit_margin = Some(0.172);
    s.currency = Some("INR".into());
    s.market_price = Some(1_490.2);
    s.previous_close = Some(1_482.0);
    s
}

#[test]
fn snapshot_roundtrips_every_field() {
    let db = setup_store();
    let snap = infosys();
    assert!(db.store.upsert_company_snapshot(&snap));
    assert_eq!(db.store.cached_company_snapshot(&snap.symbol), Some(snap));
}

#[test]
fn missing_snapshot_is_none() {
    let db = setup_store();
    assert!(db.store.cached_company_snapshot(&sym("NOPE")).is_none());
}

#[test]
fn upsert_overwrites_the_single_row() {
    let db = setup_store();
    let first = infosys();
    assert!(db.store.upsert_company_snapshot(&first));

    let later = Utc.with_ymd_and_hms(2024, 6, 4, 10, 0, 0).unwrap();
    let mut second = CompanySnapshot::new(first.symbol.clone(), later);
    second.name = Some("Infosys Ltd".into());
    second.market_price = Some(1_500.0);
    assert!(db.store.upsert_company_snapshot(&second));

    let cached = db.store.cached_company_snapshot(&first.symbol).expect("cached");
    assert_eq!(cached, second);
    assert!(cached.sector.is_none(), "absent fields are cleared, not kept");

    let conn = rusqlite::Connection::open(&db.path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM company_snapshot", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sparse_snapshot_is_stored() {
    let db = setup_store();
    let bare = CompanySnapshot::new(sym("XYZ"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert!(db.store.upsert_company_snapshot(&bare));
    let cached = db.store.cached_company_snapshot(&sym("xyz")).expect("cached");
    assert_eq!(cached.display_name(), "XYZ");
    assert!(cached.market_cap.is_none());
}
