//! Re-export of foundational types from `stocksight-types`.
// Consolidated re-exports so downstream crates can depend on `stocksight-core` only

pub use stocksight_types::{
    CompanySnapshot, ConnectorKey, DEFAULT_CURRENCY_SYMBOL, ErrorKind, Interval, Period,
    PriceBar, PriceChange, SYMBOL_HINT, SightConfig, SightError, StoreConfig, Symbol, WatchState,
    WatchlistEntry, currency_symbol,
};
