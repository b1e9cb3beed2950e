//! stocksight-core
//!
//! Contracts shared between market-data providers and the stocksight orchestrator.
//!
//! - `types`: domain records (bars, snapshots, watchlist rows), errors, and configuration.
//! - `connector`: the `StockConnector` trait and its capability provider traits.
//!
//! Connectors are async and assume a Tokio 1.x runtime; the orchestrator bounds every
//! provider call with `tokio::time::timeout`.
#![warn(missing_docs)]

/// Connector capability traits and the primary `StockConnector` interface.
pub mod connector;
pub mod types;

pub use connector::StockConnector;
pub use types::*;
