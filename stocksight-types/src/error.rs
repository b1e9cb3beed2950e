use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hint shown to users when a symbol cannot be resolved or fetched.
pub const SYMBOL_HINT: &str = "Make sure it's a valid NSE symbol like TCS, RELIANCE, or a US symbol like AAPL, GOOG. \
If it's an Indian stock, try adding `.NS` (e.g., `TATASTEEL.NS`).";

/// Unified error type for the stocksight workspace.
///
/// Variants fall into three families (see [`ErrorKind`]): the provider answered but does not
/// know the symbol, the provider could not be reached or answered with garbage, or the local
/// store rejected an operation.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SightError {
    /// The provider responded but reported no live price for the symbol.
    #[error("symbol '{symbol}' not found or no data available")]
    SymbolNotFound {
        /// Symbol as requested by the caller.
        symbol: String,
    },

    /// An individual connector returned an error (network, HTTP status, throttling).
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "history", "profile").
        capability: String,
    },

    /// Issues with the returned or expected data (undecodable payload, missing arrays).
    #[error("data issue: {0}")]
    Data(String),

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested.
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The local store could not be reached or rejected a write.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// Coarse classification of a [`SightError`] used for branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Provider responded without a live price.
    SymbolNotFound,
    /// Network or provider error, timeout, malformed response.
    Transport,
    /// Store unreachable or write rejected.
    Persistence,
    /// Caller-side misuse (bad argument, missing capability).
    Usage,
}

impl SightError {
    /// Helper: build a `SymbolNotFound` error.
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Persistence` error.
    #[must_use]
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SymbolNotFound { .. } => ErrorKind::SymbolNotFound,
            Self::Connector { .. } | Self::ProviderTimeout { .. } | Self::Data(_) => {
                ErrorKind::Transport
            }
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::Unsupported { .. } | Self::InvalidArg(_) => ErrorKind::Usage,
        }
    }

    /// Returns true for network, timeout, and malformed-response failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    /// Actionable advice for the user, if any applies to this error.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::SymbolNotFound | ErrorKind::Transport => Some(SYMBOL_HINT),
            ErrorKind::Persistence | ErrorKind::Usage => None,
        }
    }
}
