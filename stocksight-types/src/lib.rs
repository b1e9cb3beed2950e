//! Shared stocksight data transfer objects, error taxonomy, and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod currency;
mod error;
mod metrics;
mod model;

pub use config::{SightConfig, StoreConfig};
pub use connector::ConnectorKey;
pub use currency::{DEFAULT_CURRENCY_SYMBOL, currency_symbol};
pub use error::{ErrorKind, SYMBOL_HINT, SightError};
pub use metrics::PriceChange;
pub use model::{
    CompanySnapshot, Interval, Period, PriceBar, Symbol, WatchState, WatchlistEntry,
};
