use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use stocksight_core::connector::{HistoryProvider, ProfileProvider, StockConnector};
use stocksight_core::{CompanySnapshot, Interval, Period, PriceBar, SightError, Symbol};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(SightError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    history_rules: HashMap<Symbol, MockBehavior<Vec<PriceBar>>>,
    profile_rules: HashMap<Symbol, MockBehavior<CompanySnapshot>>,
}

#[derive(Default)]
struct Counters {
    history: AtomicUsize,
    profile: AtomicUsize,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    calls: Arc<Counters>,
}

impl DynamicMockController {
    /// Set the behavior for `history` calls for a specific symbol.
    pub async fn set_history_behavior(
        &self,
        symbol: Symbol,
        behavior: MockBehavior<Vec<PriceBar>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.history_rules.insert(symbol, behavior);
    }

    /// Set the behavior for `profile` calls for a specific symbol.
    pub async fn set_profile_behavior(
        &self,
        symbol: Symbol,
        behavior: MockBehavior<CompanySnapshot>,
    ) {
        let mut guard = self.state.lock().await;
        guard.profile_rules.insert(symbol, behavior);
    }

    /// Number of `history` calls received so far.
    #[must_use]
    pub fn history_calls(&self) -> usize {
        self.calls.history.load(Ordering::SeqCst)
    }

    /// Number of `profile` calls received so far.
    #[must_use]
    pub fn profile_calls(&self) -> usize {
        self.calls.profile.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and reset the call counters.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.history_rules.clear();
        guard.profile_rules.clear();
        self.calls.history.store(0, Ordering::SeqCst);
        self.calls.profile.store(0, Ordering::SeqCst);
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    calls: Arc<Counters>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn StockConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let calls = Arc::new(Counters::default());
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            calls: Arc::clone(&calls),
        };
        let me = Arc::new(Self { name, state, calls });
        (me as Arc<dyn StockConnector>, controller)
    }

    async fn run<T>(behavior: Option<MockBehavior<T>>, capability: &str) -> Result<T, SightError> {
        match behavior {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(SightError::unsupported(capability)),
        }
    }
}

impl StockConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }
}

#[async_trait]
impl HistoryProvider for DynamicMockConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        _period: Period,
        _interval: Interval,
    ) -> Result<Vec<PriceBar>, SightError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        // Acquire behavior snapshot without holding the lock across await points
        let behavior = {
            let guard = self.state.lock().await;
            guard.history_rules.get(symbol).cloned()
        };
        Self::run(behavior, "history").await
    }
}

#[async_trait]
impl ProfileProvider for DynamicMockConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanySnapshot, SightError> {
        self.calls.profile.fetch_add(1, Ordering::SeqCst);
        let behavior = {
            let guard = self.state.lock().await;
            guard.profile_rules.get(symbol).cloned()
        };
        Self::run(behavior, "profile").await
    }
}
