use stocksight_core::{Symbol, WatchState, WatchlistEntry};
use stocksight_store::Store;

/// Two-state (Active/Inactive) watchlist over the store's soft-delete log.
///
/// A symbol never added behaves as Inactive. Calls are blocking; from async code run them
/// on `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct Watchlist {
    store: Store,
}

impl Watchlist {
    /// Manager over `store`.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inactive → Active. Returns `false` if `symbol` is already Active.
    pub fn add(&self, symbol: &Symbol) -> bool {
        self.store.add_watchlist_entry(symbol)
    }

    /// Active → Inactive. Returns `false` if `symbol` is not Active.
    pub fn remove(&self, symbol: &Symbol) -> bool {
        self.store.deactivate_watchlist_entry(symbol)
    }

    /// Active symbols, most recently added first.
    #[must_use]
    pub fn list(&self) -> Vec<Symbol> {
        self.store.list_active_watchlist()
    }

    /// Current state of `symbol`.
    #[must_use]
    pub fn state(&self, symbol: &Symbol) -> WatchState {
        self.history(symbol)
            .first()
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// Shorthand for `state(symbol).is_active()`.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.state(symbol).is_active()
    }

    /// Every membership row for `symbol`, newest first.
    #[must_use]
    pub fn history(&self, symbol: &Symbol) -> Vec<WatchlistEntry> {
        self.store.watchlist_history(symbol)
    }
}
