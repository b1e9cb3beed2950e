//! stocksight ties a market-data connector to the SQLite store and serves a stock dashboard.
//!
//! Overview
//! - [`StockSight::fetch_quote`] fetches history and the company snapshot concurrently, each
//!   provider call bounded by a timeout. A snapshot without a live price means "symbol not
//!   found".
//! - [`StockSight::fetch_with_fallback`] persists live data and, when the provider fails,
//!   serves the last persisted copy, but only if both bars and snapshot are cached.
//! - Outcomes are memoized briefly in-process; failures expire sooner than live data and are
//!   always retried after expiry.
//! - [`Watchlist`] is a two-state membership log on top of the store's soft-delete table.
//! - [`StockSight::resolve_symbol`] maps user input (`tcs`, `apple`) to a priced symbol.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use stocksight::{Interval, Period, StockSight, Store, Symbol};
//! use stocksight_yahoo::YahooConnector;
//!
//! let store = Store::open_path("stocksight.db")?;
//! assert!(store.init_schema());
//! let sight = StockSight::builder()
//!     .with_connector(Arc::new(YahooConnector::try_new_default()?))
//!     .with_store(store)
//!     .build()?;
//!
//! let symbol = sight.resolve_symbol("reliance").await?;
//! let outcome = sight.fetch_with_fallback(&symbol, Period::Y1, Interval::D1).await;
//! if let Some(snapshot) = outcome.snapshot() {
//!     println!("{} {:?}", snapshot.display_name(), snapshot.market_price);
//! }
//! ```
#![warn(missing_docs)]

mod core;
mod fetcher;
mod memo;
mod orchestrator;
mod outcome;
mod resolve;
mod watchlist;

pub use crate::core::{POPULAR_SYMBOLS, StockSight, StockSightBuilder};
pub use fetcher::LiveQuote;
pub use outcome::{FetchOutcome, MarketData};
pub use watchlist::Watchlist;

pub use stocksight_core::{
    CompanySnapshot, ErrorKind, Interval, Period, PriceBar, PriceChange, SYMBOL_HINT,
    SightConfig, SightError, StockConnector, StoreConfig, Symbol, WatchState, WatchlistEntry,
    currency_symbol,
};
pub use stocksight_store::Store;
