//! stocksight-store
//!
//! SQLite persistence for the dashboard core: cached price bars, one company snapshot per
//! symbol, and the soft-delete watchlist log.
//!
//! Every public operation checks a connection out of the pool, runs in its own transaction,
//! and never returns an error: failures are logged with `tracing` and converted to a safe
//! default (`false`, `None`, or an empty collection). Only [`Store::open`] reports errors,
//! because opening the store is owned by the process entry point.
//!
//! ```no_run
//! use stocksight_store::Store;
//! use stocksight_types::{StoreConfig, Symbol};
//!
//! let store = Store::open(StoreConfig::at("stocksight.db"))?;
//! assert!(store.init_schema());
//! let aapl = Symbol::new("AAPL")?;
//! store.add_watchlist_entry(&aapl);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![warn(missing_docs)]

mod bars;
mod error;
mod schema;
mod snapshot;
mod time;
mod watchlist;

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use stocksight_types::{StoreConfig, Symbol};

pub use error::StoreError;

const MEMORY_PATH: &str = ":memory:";
const MIN_WAIT: Duration = Duration::from_millis(50);

/// Handle to the SQLite store. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct Store {
    pool: Pool<SqliteConnectionManager>,
    cfg: StoreConfig,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.cfg.path)
            .field("pool_size", &self.cfg.pool_size)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open (creating if needed) the database described by `cfg`.
    ///
    /// The schema is not touched; call [`Store::init_schema`] afterwards.
    ///
    /// # Errors
    /// Returns an error if the pool cannot establish its first connection.
    pub fn open(cfg: StoreConfig) -> Result<Self, StoreError> {
        if cfg.pool_size == 0 {
            return Err(StoreError::Config("pool_size must be at least 1".into()));
        }
        // r2d2 rejects a zero connection timeout
        let busy = cfg.busy_timeout.max(MIN_WAIT);
        let in_memory = cfg.path == Path::new(MEMORY_PATH);
        let manager = (if in_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(&cfg.path)
        })
        .with_init(move |conn| {
            conn.busy_timeout(busy)?;
            conn.execute_batch(
                "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
            )
        });

        // A private in-memory database only lives as long as its single connection.
        let builder = if in_memory {
            Pool::builder()
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            Pool::builder().max_size(cfg.pool_size)
        };
        let pool = builder.connection_timeout(busy).build(manager)?;

        tracing::debug!(path = %cfg.path.display(), "store opened");
        Ok(Self { pool, cfg })
    }

    /// Open a file-backed store with default settings.
    ///
    /// # Errors
    /// See [`Store::open`].
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(StoreConfig::at(path.as_ref()))
    }

    /// Configuration this store was opened with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Create all tables and indexes if missing. Idempotent.
    ///
    /// Returns `false` (after logging) if the database cannot be reached or a migration fails.
    #[must_use = "a false return means the schema is unusable"]
    pub fn init_schema(&self) -> bool {
        let res = self
            .conn()
            .and_then(|mut conn| schema::run_migrations(&mut conn));
        match res {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %self.cfg.path.display(),
                    "schema initialization failed"
                );
                false
            }
        }
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }
}

/// Convert an operation result to its safe default, logging the failure.
fn or_default<T: Default>(
    op: &'static str,
    symbol: Option<&Symbol>,
    res: Result<T, StoreError>,
) -> T {
    res.unwrap_or_else(|e| {
        match symbol {
            Some(s) => tracing::warn!(op, symbol = %s, error = %e, "store operation failed"),
            None => tracing::warn!(op, error = %e, "store operation failed"),
        }
        T::default()
    })
}
