//! Display symbols for ISO currency codes.

/// Symbol used when the code is unknown or missing.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Map an ISO currency code to the symbol shown next to prices.
///
/// INR, USD and EUR have dedicated symbols; anything else (including `None`) falls back to `$`.
/// Matching ignores case and surrounding whitespace.
#[must_use]
pub fn currency_symbol(code: Option<&str>) -> &'static str {
    let Some(code) = code else {
        return DEFAULT_CURRENCY_SYMBOL;
    };
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => "₹",
        "EUR" => "€",
        _ => DEFAULT_CURRENCY_SYMBOL,
    }
}
