//! stocksight command-line dashboard.
//!
//! Commands:
//! - `quote` resolves a symbol and shows live metrics, or the last cached copy when the
//!   provider is unreachable
//! - `watch add|remove|list` manages the watchlist
//! - `popular` lists recently viewed symbols, or a default set
//! - `export` writes cached bars as CSV to stdout

mod render;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use stocksight::{
    Interval, Period, SightError, StockConnector, StockSight, Store, Symbol, WatchState,
};
use stocksight_mock::MockConnector;
use stocksight_yahoo::YahooConnector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stocksight",
    version,
    about = "Stock dashboard with offline cache fallback"
)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "STOCKSIGHT_DB", default_value = "stocksight.db", global = true)]
    db: PathBuf,

    /// Per-call provider timeout in seconds.
    #[arg(long, default_value_t = 10, global = true)]
    timeout_secs: u64,

    /// Serve deterministic fixture data instead of calling Yahoo Finance.
    #[arg(long, env = "STOCKSIGHT_USE_MOCK", global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show price, change and fundamentals for a symbol or company name.
    Quote {
        /// Ticker (AAPL, TCS, TATASTEEL.NS) or a well-known company name.
        symbol: String,

        /// History range: 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
        #[arg(long, default_value = "1y")]
        period: Period,

        /// Bar spacing: 1d, 5d, 1wk, 1mo, 3mo.
        #[arg(long, default_value = "1d")]
        interval: Interval,

        /// Number of trailing bars to print.
        #[arg(long, default_value_t = 5)]
        bars: usize,
    },
    /// Watchlist management.
    Watch {
        #[command(subcommand)]
        action: WatchAction,
    },
    /// Recently viewed symbols, or a default selection.
    Popular {
        /// Maximum number of symbols.
        #[arg(long, default_value_t = 6)]
        limit: usize,
    },
    /// Write cached bars as CSV (date, open, high, low, close, volume) to stdout.
    Export {
        /// Symbol exactly as stored (e.g. TCS.NS).
        symbol: String,

        /// Lookback window of the export.
        #[arg(long, default_value = "1mo")]
        period: Period,
    },
}

#[derive(Subcommand)]
enum WatchAction {
    /// Start watching a symbol.
    Add { symbol: String },
    /// Stop watching a symbol.
    Remove { symbol: String },
    /// Active symbols, most recently added first.
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = e.downcast_ref::<SightError>().and_then(SightError::hint) {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let store = Store::open_path(&cli.db)?;
    if !store.init_schema() {
        return Err(SightError::persistence(format!(
            "could not initialize schema at {}",
            cli.db.display()
        ))
        .into());
    }

    match cli.command {
        Commands::Quote {
            symbol,
            period,
            interval,
            bars,
        } => {
            let sight = build_sight(store, cli.mock, cli.timeout_secs)?;
            run_quote(&sight, &symbol, period, interval, bars).await
        }
        Commands::Watch { action } => run_watch(store, action).await,
        Commands::Popular { limit } => {
            let sight = build_sight(store, cli.mock, cli.timeout_secs)?;
            for symbol in sight.popular_symbols(limit).await {
                println!("{symbol}");
            }
            Ok(())
        }
        Commands::Export { symbol, period } => run_export(store, &symbol, period).await,
    }
}

fn connector(use_mock: bool) -> Result<Arc<dyn StockConnector>, SightError> {
    if use_mock {
        tracing::debug!("using fixture connector");
        return Ok(Arc::new(MockConnector::new()));
    }
    Ok(Arc::new(YahooConnector::try_new_default()?))
}

fn build_sight(store: Store, use_mock: bool, timeout_secs: u64) -> Result<StockSight, SightError> {
    StockSight::builder()
        .with_connector(connector(use_mock)?)
        .with_store(store)
        .provider_timeout(Duration::from_secs(timeout_secs))
        .build()
}

async fn run_quote(
    sight: &StockSight,
    query: &str,
    period: Period,
    interval: Interval,
    tail: usize,
) -> Result<(), Box<dyn Error>> {
    // A transport failure during resolution still lets the cache answer for the raw input.
    let symbol = match sight.resolve_symbol(query).await {
        Ok(symbol) => symbol,
        Err(e) if e.is_transport() => {
            tracing::warn!(error = %e, "symbol resolution failed; trying input as typed");
            Symbol::new(query)?
        }
        Err(e) => return Err(e.into()),
    };

    let outcome = sight.fetch_with_fallback(&symbol, period, interval).await;
    if let Some(cause) = outcome.fallback_cause() {
        eprintln!("warning: showing cached data ({cause})");
    }
    let data = outcome.into_result()?;
    print!("{}", render::quote_report(&data, tail));
    Ok(())
}

async fn run_watch(store: Store, action: WatchAction) -> Result<(), Box<dyn Error>> {
    let watchlist = stocksight::Watchlist::new(store);
    let line = tokio::task::spawn_blocking(move || -> Result<String, SightError> {
        Ok(match action {
            WatchAction::Add { symbol } => {
                let symbol = Symbol::new(&symbol)?;
                if watchlist.add(&symbol) {
                    format!("added {symbol}")
                } else if watchlist.state(&symbol) == WatchState::Active {
                    format!("{symbol} is already on the watchlist")
                } else {
                    return Err(SightError::persistence(format!("could not add {symbol}")));
                }
            }
            WatchAction::Remove { symbol } => {
                let symbol = Symbol::new(&symbol)?;
                if watchlist.remove(&symbol) {
                    format!("removed {symbol}")
                } else {
                    format!("{symbol} is not on the watchlist")
                }
            }
            WatchAction::List => watchlist
                .list()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        })
    })
    .await??;
    if !line.is_empty() {
        println!("{line}");
    }
    Ok(())
}

async fn run_export(store: Store, symbol: &str, period: Period) -> Result<(), Box<dyn Error>> {
    let symbol = Symbol::new(symbol)?;
    let lookup = symbol.clone();
    let bars = tokio::task::spawn_blocking(move || store.cached_price_bars(&lookup, period))
        .await?
        .ok_or_else(|| SightError::not_found(symbol.as_str()))?;
    let stdout = std::io::stdout();
    render::write_bars_csv(stdout.lock(), &bars)?;
    Ok(())
}
