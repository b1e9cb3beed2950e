pub mod history;
pub mod profile;

/// Static description of one fixture company.
pub struct Fixture {
    pub symbol: &'static str,
    pub base: f64,
    pub name: &'static str,
    pub sector: &'static str,
    pub industry: &'static str,
    pub currency: &'static str,
}

const fn fx(
    symbol: &'static str,
    base: f64,
    name: &'static str,
    sector: &'static str,
    industry: &'static str,
    currency: &'static str,
) -> Fixture {
    Fixture {
        symbol,
        base,
        name,
        sector,
        industry,
        currency,
    }
}

pub const KNOWN: &[Fixture] = &[
    fx("AAPL", 185.0, "Apple Inc.", "Technology", "Consumer Electronics", "USD"),
    fx("MSFT", 410.0, "Microsoft Corporation", "Technology", "Software", "USD"),
    fx("GOOG", 140.0, "Alphabet Inc.", "Communication Services", "Internet Content", "USD"),
    fx("TSLA", 240.0, "Tesla, Inc.", "Consumer Cyclical", "Auto Manufacturers", "USD"),
    fx("AMZN", 175.0, "Amazon.com, Inc.", "Consumer Cyclical", "Internet Retail", "USD"),
    fx("META", 480.0, "Meta Platforms, Inc.", "Communication Services", "Internet Content", "USD"),
    fx("TCS.NS", 3900.0, "Tata Consultancy Services", "Technology", "IT Services", "INR"),
    fx("RELIANCE.NS", 2900.0, "Reliance Industries", "Energy", "Oil & Gas Refining", "INR"),
    fx("SAP.DE", 175.0, "SAP SE", "Technology", "Software", "EUR"),
];

pub fn lookup(symbol: &str) -> Option<&'static Fixture> {
    KNOWN.iter().find(|f| f.symbol == symbol)
}
