use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use stocksight_core::{
    Interval, Period, SightError, Symbol,
    connector::{HistoryProvider, ProfileProvider},
};
use stocksight_yahoo::{YahooConnector, adapter::Endpoints};

fn chart_body(price: Option<f64>) -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "regularMarketPrice": price,
                    "chartPreviousClose": 189.5,
                    "fiftyTwoWeekHigh": 199.62,
                    "fiftyTwoWeekLow": 164.08,
                    "longName": "Apple Inc."
                },
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{
                        "open":   [187.15, null, 184.22],
                        "high":   [188.44, null, 185.88],
                        "low":    [183.89, null, 183.43],
                        "close":  [185.64, null, 184.25],
                        "volume": [82488700, null, 58414500]
                    }]
                }
            }],
            "error": null
        }
    })
}

fn connector(server: &MockServer) -> YahooConnector {
    YahooConnector::try_with_endpoints(Endpoints::single_host(server.base_url()))
        .expect("client builds")
}

fn aapl() -> Symbol {
    Symbol::new("AAPL").unwrap()
}

#[tokio::test]
async fn history_parses_chart_and_skips_null_rows() {
    let server = MockServer::start_async().await;
    let chart = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v8/finance/chart/AAPL")
                .query_param("range", "1mo")
                .query_param("interval", "1d");
            then.status(200).json_body(chart_body(Some(185.0)));
        })
        .await;

    let yf = connector(&server);
    let bars = yf.history(&aapl(), Period::M1, Interval::D1).await.unwrap();

    chart.assert_async().await;
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].close, 185.64);
    assert_eq!(bars[1].volume, 58_414_500);
    assert!(bars[0].date < bars[1].date);
}

#[tokio::test]
async fn http_404_is_symbol_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/BADSYM");
            then.status(404).json_body(json!({
                "chart": {
                    "result": null,
                    "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
                }
            }));
        })
        .await;

    let yf = connector(&server);
    let err = yf.profile(&Symbol::new("BADSYM").unwrap()).await.unwrap_err();
    assert_eq!(err, SightError::not_found("BADSYM"));
}

#[tokio::test]
async fn rate_limit_and_server_errors_are_connector_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/AAPL");
            then.status(429).body("Too Many Requests");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/MSFT");
            then.status(503).body("unavailable");
        })
        .await;

    let yf = connector(&server);
    let err = yf.history(&aapl(), Period::Y1, Interval::D1).await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("rate limited"), "{err}");

    let msft = Symbol::new("MSFT").unwrap();
    let err = yf.history(&msft, Period::Y1, Interval::D1).await.unwrap_err();
    assert!(err.to_string().contains("server error"), "{err}");
}

#[tokio::test]
async fn malformed_json_is_data_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/AAPL");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let yf = connector(&server);
    let err = yf.history(&aapl(), Period::Y1, Interval::D1).await.unwrap_err();
    assert!(matches!(err, SightError::Data(_)), "{err:?}");
}

#[tokio::test]
async fn profile_merges_fundamentals_and_reuses_crumb() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/consent");
            then.status(404).header("set-cookie", "A3=d=abc; Path=/");
        })
        .await;
    let crumb = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200).body("crumb-123");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v8/finance/chart/AAPL")
                .query_param("range", "5d");
            then.status(200).json_body(chart_body(Some(185.0)));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v10/finance/quoteSummary/AAPL")
                .query_param("crumb", "crumb-123");
            then.status(200).json_body(json!({
                "quoteSummary": {
                    "result": [{
                        "price": {
                            "longName": "Apple Inc.",
                            "currency": "USD",
                            "marketCap": {"raw": 2.9e12, "fmt": "2.9T"}
                        },
                        "summaryProfile": {
                            "sector": "Technology",
                            "industry": "Consumer Electronics",
                            "longBusinessSummary": "Designs phones.",
                            "fullTimeEmployees": 161000,
                            "website": "https://www.apple.com"
                        },
                        "financialData": {
                            "totalRevenue": {"raw": 3.83e11, "fmt": "383.29B"},
                            "profitMargins": {"raw": 0.253}
                        },
                        "summaryDetail": {
                            "trailingPE": {"raw": 29.4},
                            "dividendYield": {"raw": 0.0052},
                            "fiftyTwoWeekHigh": {"raw": 199.62},
                            "fiftyTwoWeekLow": {}
                        }
                    }],
                    "error": null
                }
            }));
        })
        .await;

    let yf = connector(&server);
    let first = yf.profile(&aapl()).await.unwrap();
    let second = yf.profile(&aapl()).await.unwrap();

    crumb.assert_async().await;
    assert_eq!(first.market_price, Some(185.0));
    assert_eq!(first.sector.as_deref(), Some("Technology"));
    assert_eq!(first.pe_ratio, Some(29.4));
    assert_eq!(first.market_cap, Some(2.9e12));
    assert_eq!(first.week52_low, Some(164.08));
    assert_eq!(first.currency.as_deref(), Some("USD"));
    assert_eq!(second.name.as_deref(), Some("Apple Inc."));
    assert_eq!(first.employees, Some(161_000));
    assert_eq!(first.website.as_deref(), Some("https://www.apple.com"));
    assert_eq!(first.total_revenue, Some(3.83e11));
    assert_eq!(first.profit_margin, Some(0.253));
}

#[tokio::test]
async fn profile_survives_missing_fundamentals() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/AAPL");
            then.status(200).json_body(chart_body(Some(185.0)));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(500);
        })
        .await;

    let yf = connector(&server);
    let snap = yf.profile(&aapl()).await.unwrap();
    assert_eq!(snap.market_price, Some(185.0));
    assert_eq!(snap.name.as_deref(), Some("Apple Inc."));
    assert!(snap.sector.is_none());
}

#[tokio::test]
async fn profile_without_price_skips_fundamentals() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/AAPL");
            then.status(200).json_body(chart_body(None));
        })
        .await;
    let crumb = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200).body("unused");
        })
        .await;

    let yf = connector(&server);
    let snap = yf.profile(&aapl()).await.unwrap();
    assert!(snap.market_price.is_none());
    crumb.assert_hits_async(0).await;
}

#[tokio::test]
async fn slow_crumb_handshake_keeps_chart_snapshot() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v8/finance/chart/AAPL");
            then.status(200).json_body(chart_body(Some(185.0)));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200)
                .delay(Duration::from_secs(3))
                .body("late-crumb");
        })
        .await;

    let yf = connector(&server).with_fundamentals_timeout(Duration::from_millis(200));
    let snap = tokio::time::timeout(Duration::from_secs(1), yf.profile(&aapl()))
        .await
        .expect("profile answers before the outer timeout")
        .unwrap();
    assert_eq!(snap.market_price, Some(185.0));
    assert_eq!(snap.name.as_deref(), Some("Apple Inc."));
    assert!(snap.sector.is_none());
}
