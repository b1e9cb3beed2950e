#![cfg(feature = "test-adapters")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use stocksight_core::{
    Interval, Period, SightError, Symbol,
    connector::{HistoryProvider, ProfileProvider},
};
use stocksight_yahoo::{
    YahooConnector, adapter,
    wire::{ChartMeta, ChartResult, ProfileModule, SummaryResult},
};

struct Combo {
    chart: Arc<dyn adapter::YahooChart>,
    summary: Option<Arc<dyn adapter::YahooSummary>>,
}

impl adapter::CloneArcAdapters for Combo {
    fn clone_arc_chart(&self) -> Arc<dyn adapter::YahooChart> {
        self.chart.clone()
    }
    fn clone_arc_summary(&self) -> Arc<dyn adapter::YahooSummary> {
        self.summary.clone().unwrap_or_else(|| {
            <dyn adapter::YahooSummary>::from_fn(|_| Err(SightError::unsupported("summary")))
        })
    }
}

fn meta(price: Option<f64>, currency: &str) -> ChartResult {
    ChartResult {
        meta: ChartMeta {
            currency: Some(currency.into()),
            regular_market_price: price,
            short_name: Some("TATA CONSULTANCY".into()),
            ..ChartMeta::default()
        },
        ..ChartResult::default()
    }
}

#[tokio::test]
async fn profile_uses_injected_adapters() {
    let chart = <dyn adapter::YahooChart>::from_fn(|symbol, range, interval| {
        assert_eq!(symbol, "TCS.NS");
        assert_eq!(range, "5d");
        assert_eq!(interval, "1d");
        Ok(meta(Some(3890.5), "INR"))
    });
    let summary = <dyn adapter::YahooSummary>::from_fn(|_| {
        Ok(SummaryResult {
            summary_profile: Some(ProfileModule {
                sector: Some("Technology".into()),
                industry: Some("Information Technology Services".into()),
                full_time_employees: Some(601_546),
                ..ProfileModule::default()
            }),
            ..SummaryResult::default()
        })
    });
    let yf = YahooConnector::from_adapter(&Combo {
        chart,
        summary: Some(summary),
    });

    let snap = yf.profile(&Symbol::new("tcs.ns").unwrap()).await.unwrap();
    assert_eq!(snap.market_price, Some(3890.5));
    assert_eq!(snap.currency.as_deref(), Some("INR"));
    assert_eq!(snap.name.as_deref(), Some("TATA CONSULTANCY"));
    assert_eq!(snap.sector.as_deref(), Some("Technology"));
    assert_eq!(snap.employees, Some(601_546));
}

#[tokio::test]
async fn summary_is_not_called_without_a_price() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let summary = <dyn adapter::YahooSummary>::from_fn(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(SummaryResult::default())
    });
    let yf = YahooConnector::from_adapter(&Combo {
        chart: <dyn adapter::YahooChart>::from_fn(|_, _, _| Ok(meta(None, "USD"))),
        summary: Some(summary),
    });

    let snap = yf.profile(&Symbol::new("ZZZZ").unwrap()).await.unwrap();
    assert!(snap.market_price.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn not_found_messages_are_normalized() {
    let yf = YahooConnector::from_adapter(&Combo {
        chart: <dyn adapter::YahooChart>::from_fn(|_, _, _| {
            Err(SightError::connector(
                "stocksight-yahoo",
                "No data found, symbol may be delisted",
            ))
        }),
        summary: None,
    });
    let sym = Symbol::new("GONE").unwrap();

    let err = yf.history(&sym, Period::Y1, Interval::D1).await.unwrap_err();
    assert_eq!(err, SightError::not_found("GONE"));
    let err = yf.profile(&sym).await.unwrap_err();
    assert_eq!(err, SightError::not_found("GONE"));
}

#[tokio::test]
async fn other_connector_errors_pass_through() {
    let yf = YahooConnector::from_adapter(&Combo {
        chart: <dyn adapter::YahooChart>::from_fn(|_, _, _| {
            Err(SightError::connector("stocksight-yahoo", "rate limited (429)"))
        }),
        summary: None,
    });
    let err = yf
        .history(&Symbol::new("AAPL").unwrap(), Period::M6, Interval::W1)
        .await
        .unwrap_err();
    assert!(matches!(err, SightError::Connector { .. }));
}

#[tokio::test]
async fn history_forwards_period_and_interval_codes() {
    let yf = YahooConnector::from_adapter(&Combo {
        chart: <dyn adapter::YahooChart>::from_fn(|_, range, interval| {
            assert_eq!(range, "6mo");
            assert_eq!(interval, "1wk");
            Ok(ChartResult::default())
        }),
        summary: None,
    });
    let bars = yf
        .history(&Symbol::new("AAPL").unwrap(), Period::M6, Interval::W1)
        .await
        .unwrap();
    assert!(bars.is_empty());
}
