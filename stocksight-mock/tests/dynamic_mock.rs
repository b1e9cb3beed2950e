use std::time::Duration;

use chrono::Utc;
use stocksight_core::{CompanySnapshot, Interval, Period, SightError, Symbol};
use stocksight_mock::{DynamicMockConnector, MockBehavior};

#[tokio::test]
async fn test_mock_profile_return() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("AAPL").unwrap();
    let mut snap = CompanySnapshot::new(sym.clone(), Utc::now());
    snap.market_price = Some(190.0);
    controller
        .set_profile_behavior(sym.clone(), MockBehavior::Return(snap.clone()))
        .await;

    let pp = mock.as_profile_provider().expect("profile provider");
    let got = pp.profile(&sym).await.expect("profile ok");
    assert_eq!(got, snap);
    assert_eq!(controller.profile_calls(), 1);
    assert_eq!(controller.history_calls(), 0);
}

#[tokio::test]
async fn test_mock_history_fail() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("MSFT").unwrap();
    let err = SightError::connector("P0", "boom");
    controller
        .set_history_behavior(sym.clone(), MockBehavior::Fail(err.clone()))
        .await;

    let hp = mock.as_history_provider().expect("history provider");
    let got = hp
        .history(&sym, Period::Y1, Interval::D1)
        .await
        .expect_err("err");
    assert_eq!(got, err);
}

#[tokio::test]
async fn test_mock_hang_never_resolves() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("TSLA").unwrap();
    controller
        .set_profile_behavior(sym.clone(), MockBehavior::Hang)
        .await;

    let pp = mock.as_profile_provider().expect("profile provider");
    let res = tokio::time::timeout(Duration::from_millis(50), pp.profile(&sym)).await;
    assert!(res.is_err(), "hang should time out");
}

#[tokio::test]
async fn test_mock_unset_rule_is_unsupported_and_clear_resets() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let sym = Symbol::new("GOOG").unwrap();

    let pp = mock.as_profile_provider().expect("profile provider");
    let err = pp.profile(&sym).await.expect_err("no rule");
    assert!(matches!(err, SightError::Unsupported { .. }));
    assert_eq!(controller.profile_calls(), 1);

    controller.clear_all_behaviors().await;
    assert_eq!(controller.profile_calls(), 0);
}
