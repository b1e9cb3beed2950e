mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{bars, dynamic_sight, fixture_sight, snapshot, sym};
use stocksight::{ErrorKind, FetchOutcome, Interval, Period, SightError, StockSight};
use stocksight_mock::{MockBehavior, MockConnector};

#[tokio::test]
async fn live_fetch_is_written_back() {
    let h = fixture_sight();
    let aapl = sym("AAPL");

    let outcome = h.sight.fetch_with_fallback(&aapl, Period::M1, Interval::D1).await;
    assert!(outcome.is_live(), "unexpected outcome: {outcome:?}");
    let live = outcome.into_result().unwrap();
    assert!(!live.bars.is_empty());
    assert!(live.snapshot.market_price.is_some());

    let store = h.sight.store();
    let cached = store.cached_price_bars(&aapl, Period::M1).expect("bars cached");
    assert_eq!(cached.len(), live.bars.len());
    let snap = store.cached_company_snapshot(&aapl).expect("snapshot cached");
    assert_eq!(snap.market_price, live.snapshot.market_price);
}

#[tokio::test]
async fn unknown_symbol_fails_without_touching_the_store() {
    let h = fixture_sight();
    let bad = sym("BADSYM");

    let outcome = h.sight.fetch_with_fallback(&bad, Period::M1, Interval::D1).await;
    let err = outcome.error().expect("failed outcome");
    assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
    assert!(err.hint().is_some());

    assert!(h.sight.store().cached_price_bars(&bad, Period::M1).is_none());
    assert!(h.sight.store().cached_company_snapshot(&bad).is_none());
}

#[tokio::test]
async fn provider_failure_serves_complete_cache() {
    let (h, ctrl) = dynamic_sight(|b| b.memo_ttl(Duration::ZERO));
    let aapl = sym("AAPL");
    ctrl.set_history_behavior(aapl.clone(), MockBehavior::Return(bars(5, 150.0)))
        .await;
    ctrl.set_profile_behavior(aapl.clone(), MockBehavior::Return(snapshot("AAPL", Some(150.0))))
        .await;
    assert!(
        h.sight
            .fetch_with_fallback(&aapl, Period::M1, Interval::D1)
            .await
            .is_live()
    );

    let store = h.sight.store();
    let cached_bars = store.cached_price_bars(&aapl, Period::M1).expect("bars cached");
    let cached_snapshot = store.cached_company_snapshot(&aapl).expect("snapshot cached");

    let boom = SightError::connector("dyn", "connection reset");
    ctrl.set_history_behavior(aapl.clone(), MockBehavior::Fail(boom.clone()))
        .await;
    ctrl.set_profile_behavior(aapl.clone(), MockBehavior::Fail(boom.clone()))
        .await;

    let outcome = h.sight.fetch_with_fallback(&aapl, Period::M1, Interval::D1).await;
    match &outcome {
        FetchOutcome::Cached { data, cause } => {
            assert_eq!(cause, &boom);
            assert_eq!(data.bars, cached_bars);
            assert_eq!(data.snapshot, cached_snapshot);
            assert_eq!(data.bars.len(), 6);
        }
        other => panic!("expected cached outcome, got {other:?}"),
    }
    assert!(outcome.success());
    assert!(!outcome.is_live());
}

#[tokio::test]
async fn partial_cache_is_not_served() {
    let (h, ctrl) = dynamic_sight(|b| b.memo_ttl(Duration::ZERO));
    let msft = sym("MSFT");
    assert!(h.sight.store().upsert_company_snapshot(&snapshot("MSFT", Some(300.0))));

    let boom = SightError::connector("dyn", "503");
    ctrl.set_history_behavior(msft.clone(), MockBehavior::Fail(boom.clone()))
        .await;
    ctrl.set_profile_behavior(msft.clone(), MockBehavior::Fail(boom.clone()))
        .await;

    let outcome = h.sight.fetch_with_fallback(&msft, Period::M1, Interval::D1).await;
    assert_eq!(outcome.error(), Some(&boom));
}

#[tokio::test]
async fn empty_history_keeps_previous_bars() {
    let (h, ctrl) = dynamic_sight(|b| b.memo_ttl(Duration::ZERO));
    let goog = sym("GOOG");
    ctrl.set_history_behavior(goog.clone(), MockBehavior::Return(bars(3, 90.0)))
        .await;
    ctrl.set_profile_behavior(goog.clone(), MockBehavior::Return(snapshot("GOOG", Some(90.0))))
        .await;
    assert!(
        h.sight
            .fetch_with_fallback(&goog, Period::M1, Interval::D1)
            .await
            .is_live()
    );

    ctrl.set_history_behavior(goog.clone(), MockBehavior::Return(Vec::new()))
        .await;
    ctrl.set_profile_behavior(goog.clone(), MockBehavior::Return(snapshot("GOOG", Some(95.0))))
        .await;
    let outcome = h.sight.fetch_with_fallback(&goog, Period::M1, Interval::D1).await;
    assert!(outcome.is_live());
    assert!(outcome.bars().unwrap().is_empty());

    let store = h.sight.store();
    assert_eq!(store.cached_price_bars(&goog, Period::M1).unwrap().len(), 4);
    assert_eq!(
        store.cached_company_snapshot(&goog).unwrap().market_price,
        Some(95.0)
    );
}

#[tokio::test]
async fn refresh_overwrites_cached_bars() {
    let (h, ctrl) = dynamic_sight(|b| b.memo_ttl(Duration::ZERO));
    let tsla = sym("TSLA");
    ctrl.set_profile_behavior(tsla.clone(), MockBehavior::Return(snapshot("TSLA", Some(200.0))))
        .await;

    ctrl.set_history_behavior(tsla.clone(), MockBehavior::Return(bars(4, 200.0)))
        .await;
    h.sight.fetch_with_fallback(&tsla, Period::M1, Interval::D1).await;
    ctrl.set_history_behavior(tsla.clone(), MockBehavior::Return(bars(2, 210.0)))
        .await;
    h.sight.fetch_with_fallback(&tsla, Period::M1, Interval::D1).await;

    let cached = h.sight.store().cached_price_bars(&tsla, Period::M1).unwrap();
    assert_eq!(cached.len(), 3);
    assert!(cached.iter().all(|b| (b.close - 210.0).abs() < f64::EPSILON));
}

#[tokio::test]
async fn timeout_falls_back_to_cache() {
    let (h, ctrl) = dynamic_sight(|b| {
        b.memo_ttl(Duration::ZERO)
            .provider_timeout(Duration::from_millis(50))
    });
    let aapl = sym("AAPL");
    ctrl.set_history_behavior(aapl.clone(), MockBehavior::Return(bars(2, 100.0)))
        .await;
    ctrl.set_profile_behavior(aapl.clone(), MockBehavior::Return(snapshot("AAPL", Some(100.0))))
        .await;
    h.sight.fetch_with_fallback(&aapl, Period::M1, Interval::D1).await;

    ctrl.set_profile_behavior(aapl.clone(), MockBehavior::Hang).await;
    let outcome = h.sight.fetch_with_fallback(&aapl, Period::M1, Interval::D1).await;
    let cause = outcome.fallback_cause().expect("served from cache");
    assert!(matches!(cause, SightError::ProviderTimeout { .. }));
    assert!(cause.is_transport());
}

#[tokio::test]
async fn fixture_timeout_symbol_times_out() {
    let (_dir, store) = common::temp_store();
    let sight = StockSight::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .with_store(store)
        .provider_timeout(Duration::from_millis(20))
        .build()
        .unwrap();
    let err = sight
        .fetch_quote(&sym("TIMEOUT"), Period::M1, Interval::D1)
        .await
        .unwrap_err();
    assert!(matches!(err, SightError::ProviderTimeout { .. }));
}
