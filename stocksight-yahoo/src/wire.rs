//! Response shapes of the Yahoo chart and quoteSummary endpoints.
//!
//! Only the fields stocksight reads are modelled; everything is optional or defaulted
//! because Yahoo omits fields freely.

use serde::Deserialize;

/// Error object embedded in both endpoints' envelopes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    /// Short code, e.g. `Not Found`.
    #[serde(default)]
    pub code: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
}

/// `GET /v8/finance/chart/{symbol}` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartEnvelope {
    /// Payload.
    #[serde(default)]
    pub chart: ChartBody,
}

/// Chart payload: either results or an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartBody {
    /// Results (one per requested symbol).
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Error, when the request failed.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// One chart result: metadata plus column-oriented OHLCV arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartResult {
    /// Quote metadata (live price, currency, 52-week range).
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar timestamps in Unix seconds.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// OHLCV columns aligned with `timestamp`.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Chart metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Trading currency.
    pub currency: Option<String>,
    /// Symbol echoed by Yahoo.
    pub symbol: Option<String>,
    /// Live price; missing for unknown symbols.
    pub regular_market_price: Option<f64>,
    /// Close before the first bar of the chart range.
    pub chart_previous_close: Option<f64>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// 52-week high.
    pub fifty_two_week_high: Option<f64>,
    /// 52-week low.
    pub fifty_two_week_low: Option<f64>,
    /// Full company name.
    pub long_name: Option<String>,
    /// Abbreviated company name.
    pub short_name: Option<String>,
}

/// Indicator columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    /// OHLCV arrays (Yahoo wraps them in a one-element list).
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
}

/// Column-oriented OHLCV values. Entries are `null` for missing bars.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteColumns {
    /// Opens.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// Highs.
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    /// Lows.
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    /// Closes.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    /// Volumes.
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// `GET /v10/finance/quoteSummary/{symbol}` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryEnvelope {
    /// Payload.
    #[serde(rename = "quoteSummary", default)]
    pub quote_summary: SummaryBody,
}

/// quoteSummary payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryBody {
    /// Results (one per symbol).
    #[serde(default)]
    pub result: Option<Vec<SummaryResult>>,
    /// Error, when the request failed.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Modules requested from quoteSummary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    /// `price` module.
    pub price: Option<PriceModule>,
    /// `summaryProfile` module.
    pub summary_profile: Option<ProfileModule>,
    /// `summaryDetail` module.
    pub summary_detail: Option<DetailModule>,
    /// `financialData` module.
    pub financial_data: Option<FinancialModule>,
}

/// Numeric value in Yahoo's `{ "raw": .., "fmt": .. }` wrapper.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawNum {
    /// Machine-readable value.
    pub raw: Option<f64>,
}

/// Read the raw value out of an optional wrapper.
pub(crate) fn raw(v: Option<RawNum>) -> Option<f64> {
    v.and_then(|n| n.raw).filter(|x| x.is_finite())
}

/// `price` module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    /// Full company name.
    pub long_name: Option<String>,
    /// Abbreviated company name.
    pub short_name: Option<String>,
    /// Trading currency.
    pub currency: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<RawNum>,
    /// Live price.
    pub regular_market_price: Option<RawNum>,
    /// Previous session close.
    pub regular_market_previous_close: Option<RawNum>,
}

/// `summaryProfile` module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileModule {
    /// Sector.
    pub sector: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Business description.
    pub long_business_summary: Option<String>,
    /// Full-time employee count (a plain integer, not a `raw` wrapper).
    pub full_time_employees: Option<u64>,
    /// Company website.
    pub website: Option<String>,
}

/// `summaryDetail` module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailModule {
    /// Trailing P/E.
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawNum>,
    /// Dividend yield as a fraction.
    pub dividend_yield: Option<RawNum>,
    /// 52-week high.
    pub fifty_two_week_high: Option<RawNum>,
    /// 52-week low.
    pub fifty_two_week_low: Option<RawNum>,
    /// Previous session close.
    pub previous_close: Option<RawNum>,
    /// Market capitalization.
    pub market_cap: Option<RawNum>,
}

/// `financialData` module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialModule {
    /// Trailing twelve-month revenue.
    pub total_revenue: Option<RawNum>,
    /// Net profit margin as a fraction.
    pub profit_margins: Option<RawNum>,
}
