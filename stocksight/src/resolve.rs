use stocksight_core::{SightError, Symbol};

use crate::StockSight;

/// Company names users commonly type instead of tickers.
const ALIASES: &[(&str, &str)] = &[
    ("APPLE", "AAPL"),
    ("MICROSOFT", "MSFT"),
    ("GOOGLE", "GOOG"),
    ("ALPHABET", "GOOG"),
    ("TESLA", "TSLA"),
    ("AMAZON", "AMZN"),
    ("FACEBOOK", "META"),
    ("META", "META"),
];

/// Candidates in lookup order: as typed, with `.NS`, then the target of every alias whose
/// name contains the input, in table order.
fn candidates(input: &Symbol) -> Vec<Symbol> {
    let mut out = vec![input.clone()];
    if !input.has_exchange_suffix()
        && let Ok(ns) = input.with_exchange_suffix("NS")
    {
        out.push(ns);
    }
    for (_, target) in ALIASES
        .iter()
        .filter(|(name, _)| name.contains(input.as_str()))
    {
        if let Ok(sym) = Symbol::new(target)
            && !out.contains(&sym)
        {
            out.push(sym);
        }
    }
    out
}

impl StockSight {
    /// Turn user input (a ticker, an NSE ticker without suffix, or a well-known company
    /// name) into a symbol the provider prices.
    ///
    /// # Errors
    /// `InvalidArg` for input that cannot be a ticker. `SymbolNotFound` when no candidate
    /// has a live price. If no candidate matched and the provider failed for at least one of
    /// them, that first transport error is returned instead so callers can still fall back
    /// to cached data.
    #[tracing::instrument(name = "stocksight::resolve_symbol", skip(self))]
    pub async fn resolve_symbol(&self, query: &str) -> Result<Symbol, SightError> {
        let input = Symbol::new(query)?;
        let profile = self
            .connector
            .as_profile_provider()
            .ok_or_else(|| SightError::unsupported("profile"))?;
        let name = self.connector.name();

        let mut transport: Option<SightError> = None;
        for candidate in candidates(&input) {
            let res = Self::provider_call_with_timeout(
                name,
                "profile",
                self.cfg.provider_timeout,
                profile.profile(&candidate),
            )
            .await;
            match res {
                Ok(snap) if snap.market_price.is_some() => {
                    tracing::debug!(resolved = %candidate, "symbol resolved");
                    return Ok(candidate);
                }
                Ok(_) | Err(SightError::SymbolNotFound { .. }) => {}
                Err(e) => {
                    tracing::debug!(candidate = %candidate, error = %e, "candidate lookup failed");
                    transport.get_or_insert(e);
                }
            }
        }
        Err(transport.unwrap_or_else(|| SightError::not_found(input.as_str())))
    }
}
