//! Domain records shared by the store, the connectors, and the orchestrator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SightError;

const MAX_SYMBOL_LEN: usize = 32;

/// Normalized ticker symbol (trimmed, upper-case).
///
/// Accepts ASCII letters, digits, and the punctuation used by exchange suffixes and index
/// tickers (`.`, `-`, `^`, `=`, `&`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a raw symbol.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the input is empty, too long, or contains characters that
    /// cannot appear in a ticker.
    pub fn new(raw: &str) -> Result<Self, SightError> {
        let s = raw.trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(SightError::InvalidArg("symbol must not be empty".into()));
        }
        if s.len() > MAX_SYMBOL_LEN {
            return Err(SightError::InvalidArg(format!(
                "symbol '{s}' is longer than {MAX_SYMBOL_LEN} characters"
            )));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '&')))
        {
            return Err(SightError::InvalidArg(format!(
                "symbol '{s}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(s))
    }

    /// Borrow the normalized symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the symbol already carries an exchange suffix such as `.NS`.
    #[must_use]
    pub fn has_exchange_suffix(&self) -> bool {
        self.0.contains('.')
    }

    /// Append an exchange suffix (e.g. `NS` gives `TCS.NS`).
    ///
    /// # Errors
    /// Returns `InvalidArg` if the combined symbol is not valid.
    pub fn with_exchange_suffix(&self, suffix: &str) -> Result<Self, SightError> {
        Self::new(&format!("{}.{}", self.0, suffix.trim_start_matches('.')))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = SightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = SightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lookback range for a history request, in the provider's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Period {
    /// One month.
    #[serde(rename = "1mo")]
    M1,
    /// Three months.
    #[serde(rename = "3mo")]
    M3,
    /// Six months.
    #[serde(rename = "6mo")]
    M6,
    /// One year.
    #[default]
    #[serde(rename = "1y")]
    Y1,
    /// Two years.
    #[serde(rename = "2y")]
    Y2,
    /// Five years.
    #[serde(rename = "5y")]
    Y5,
    /// Ten years.
    #[serde(rename = "10y")]
    Y10,
    /// Year to date.
    #[serde(rename = "ytd")]
    Ytd,
    /// Everything the provider has.
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// All periods in ascending order of length (`Ytd` and `Max` last).
    pub const ALL: [Self; 9] = [
        Self::M1,
        Self::M3,
        Self::M6,
        Self::Y1,
        Self::Y2,
        Self::Y5,
        Self::Y10,
        Self::Ytd,
        Self::Max,
    ];

    /// Provider token for this period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1mo",
            Self::M3 => "3mo",
            Self::M6 => "6mo",
            Self::Y1 => "1y",
            Self::Y2 => "2y",
            Self::Y5 => "5y",
            Self::Y10 => "10y",
            Self::Ytd => "ytd",
            Self::Max => "max",
        }
    }

    /// Number of days of cached bars that satisfy a request for this period.
    ///
    /// Periods without a fixed mapping read one year of cache.
    #[must_use]
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::M1 => 30,
            Self::M3 => 90,
            Self::M6 => 180,
            Self::Y2 => 730,
            Self::Y1 | Self::Y5 | Self::Y10 | Self::Ytd | Self::Max => 365,
        }
    }

    /// [`Self::lookback_days`] as a `chrono::Duration`.
    #[must_use]
    pub const fn lookback(self) -> chrono::Duration {
        chrono::Duration::days(self.lookback_days())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = SightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| SightError::InvalidArg(format!("unknown period '{s}'")))
    }
}

/// Bar spacing for a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Interval {
    /// One bar per trading day.
    #[default]
    #[serde(rename = "1d")]
    D1,
    /// One bar per five trading days.
    #[serde(rename = "5d")]
    D5,
    /// Weekly bars.
    #[serde(rename = "1wk")]
    W1,
    /// Monthly bars.
    #[serde(rename = "1mo")]
    Mo1,
    /// Quarterly bars.
    #[serde(rename = "3mo")]
    Mo3,
}

impl Interval {
    /// All supported intervals, finest first.
    pub const ALL: [Self; 5] = [Self::D1, Self::D5, Self::W1, Self::Mo1, Self::Mo3];

    /// Provider token for this interval.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::D1 => "1d",
            Self::D5 => "5d",
            Self::W1 => "1wk",
            Self::Mo1 => "1mo",
            Self::Mo3 => "3mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = SightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == needle)
            .ok_or_else(|| SightError::InvalidArg(format!("unknown interval '{s}'")))
    }
}

/// One OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar timestamp (UTC, start of the bar).
    pub date: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

/// Latest fetched fundamentals and quote metadata for a company.
///
/// Every descriptive field is optional; providers routinely omit some of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    /// Symbol this snapshot describes.
    pub symbol: Symbol,
    /// Display name (long name preferred).
    pub name: Option<String>,
    /// Sector classification.
    pub sector: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Market capitalization in `currency` units.
    pub market_cap: Option<f64>,
    /// Trailing price/earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Dividend yield as a fraction (0.005 means 0.5%).
    pub dividend_yield: Option<f64>,
    /// 52-week high.
    pub week52_high: Option<f64>,
    /// 52-week low.
    pub week52_low: Option<f64>,
    /// Free-text business summary.
    pub summary: Option<String>,
    /// Full-time employee count.
    pub employees: Option<u64>,
    /// Company website.
    pub website: Option<String>,
    /// Trailing twelve-month revenue in `currency` units.
    pub total_revenue: Option<f64>,
    /// Net profit margin as a fraction.
    pub profit_margin: Option<f64>,
    /// ISO currency code of the quoted prices.
    pub currency: Option<String>,
    /// Live market price at fetch time. Its absence in a provider response means the
    /// symbol is unknown to the provider.
    pub market_price: Option<f64>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// When the snapshot was fetched.
    pub last_updated: DateTime<Utc>,
}

impl CompanySnapshot {
    /// Empty snapshot for `symbol` stamped with `last_updated`.
    #[must_use]
    pub const fn new(symbol: Symbol, last_updated: DateTime<Utc>) -> Self {
        Self {
            symbol,
            name: None,
            sector: None,
            industry: None,
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
            week52_high: None,
            week52_low: None,
            summary: None,
            employees: None,
            website: None,
            total_revenue: None,
            profit_margin: None,
            currency: None,
            market_price: None,
            previous_close: None,
            last_updated,
        }
    }

    /// Name to display, falling back to the symbol.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.symbol.as_str())
    }
}

/// Watchlist membership state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WatchState {
    /// Currently on the watchlist.
    Active,
    /// Removed (or never added).
    #[default]
    Inactive,
}

impl WatchState {
    /// Map the stored `is_active` flag.
    #[must_use]
    pub const fn from_flag(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }

    /// True for [`WatchState::Active`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One row of the watchlist log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Watched symbol.
    pub symbol: Symbol,
    /// When this row was inserted (the transition into Active).
    pub added_at: DateTime<Utc>,
    /// Whether the row still represents membership.
    pub state: WatchState,
}
