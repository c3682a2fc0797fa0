//! CLI definition and dispatch.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter;
use crate::adapters::file_config_adapter::{FileConfigAdapter, Settings};
use crate::adapters::file_log_adapter::FileLogAdapter;
use crate::adapters::json_data_adapter::JsonDataAdapter;
use crate::adapters::json_store_adapter::{JsonPortfolioStore, JsonWatchlistStore};
use crate::domain::backtest::run_batch;
use crate::domain::error::ScreenerError;
use crate::domain::ledger::PaperLedger;
use crate::domain::score::{score, MomentumFilter, MOMENTUM_THRESHOLD};
use crate::domain::screener::{rank, MarketCapTier, ScreenFilters};
use crate::domain::stock_record::StockRecord;
use crate::ports::data_port::StockDataPort;
use crate::ports::log_port::ErrorLogPort;
use crate::ports::store_port::WatchlistStore;

#[derive(Parser, Debug)]
#[command(name = "canscreen", about = "CAN SLIM stock screener and paper trader")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score and rank the stored universe
    Screen {
        /// Keep only one market cap tier: large, mid or small
        #[arg(long)]
        market_cap: Option<MarketCapTier>,
        /// Keep only this sector
        #[arg(long)]
        sector: Option<String>,
        /// Momentum filter: positive, negative or all
        #[arg(long, value_parser = parse_momentum, default_value = "all")]
        momentum: MomentumFilter,
        /// Restrict to tickers on the watchlist
        #[arg(long)]
        watchlist_only: bool,
        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the score breakdown for one ticker
    Score {
        #[arg(long)]
        ticker: String,
    },
    /// Backtest the trend-following strategy
    Backtest {
        /// Comma-separated tickers from the universe; defaults to all
        #[arg(long)]
        tickers: Option<String>,
        /// Backtest CSV history files instead of the stored universe
        #[arg(long)]
        csv: Vec<PathBuf>,
    },
    /// Inspect or trade the paper portfolio
    Portfolio {
        #[command(subcommand)]
        action: PortfolioAction,
    },
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PortfolioAction {
    /// Show cash and open positions
    Show,
    /// Buy shares at the latest price, or at an explicit price
    Buy {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        shares: u64,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Sell shares at the latest price, or at an explicit price
    Sell {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        shares: u64,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Mark positions to the latest prices and apply stop rules
    Revalue,
}

#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    /// Print the watchlist
    List,
    /// Add a ticker
    Add {
        #[arg(long)]
        ticker: String,
    },
    /// Remove a ticker
    Remove {
        #[arg(long)]
        ticker: String,
    },
}

fn parse_momentum(s: &str) -> Result<MomentumFilter, String> {
    match s.to_ascii_lowercase().as_str() {
        "positive" => Ok(MomentumFilter::Positive),
        "negative" => Ok(MomentumFilter::Negative),
        "all" => Ok(MomentumFilter::All),
        other => Err(format!("unknown momentum filter '{other}'")),
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match cli.command {
        Command::Screen {
            market_cap,
            sector,
            momentum,
            watchlist_only,
            limit,
        } => run_screen(&settings, market_cap, sector, momentum, watchlist_only, limit),
        Command::Score { ticker } => run_score(&settings, &ticker),
        Command::Backtest { tickers, csv } => run_backtest(&settings, tickers.as_deref(), &csv),
        Command::Portfolio { action } => run_portfolio(&settings, action),
        Command::Watchlist { action } => run_watchlist(&settings, action),
    }
}

fn load_settings(config_path: Option<&Path>) -> Result<Settings, ExitCode> {
    let result = match config_path {
        Some(path) => {
            FileConfigAdapter::from_file(path).and_then(|a| Settings::from_config(&a))
        }
        None => Settings::from_config(&FileConfigAdapter::empty()),
    };
    result.map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_universe(settings: &Settings) -> Result<JsonDataAdapter, ExitCode> {
    JsonDataAdapter::open(&settings.data_file).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: &ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

fn run_screen(
    settings: &Settings,
    market_cap: Option<MarketCapTier>,
    sector: Option<String>,
    momentum: MomentumFilter,
    watchlist_only: bool,
    limit: Option<usize>,
) -> ExitCode {
    let universe = match open_universe(settings) {
        Ok(u) => u,
        Err(code) => return code,
    };
    let log = FileLogAdapter::new(&settings.error_log_file);

    let mut records = universe.all_records();
    if watchlist_only {
        let watchlist = match JsonWatchlistStore::new(&settings.watchlist_file).load() {
            Ok(w) => w,
            Err(err) => return fail(&err),
        };
        let keep: HashSet<String> = watchlist.into_iter().collect();
        records.retain(|r| keep.contains(&r.ticker));
    }

    let filters = ScreenFilters {
        market_cap,
        sector,
        momentum,
        limit,
    };
    let rows = rank(&records, &filters, &log, |done, total, ticker| {
        eprint!("\rscoring {done}/{total} {ticker:<8}");
    });
    eprintln!();

    if let Ok(Some(when)) = universe.last_fetch() {
        println!("Data as of {when}");
    }
    println!(
        "{:<4} {:<8} {:>5} {:>5} {:>5}  {:<20} {:>8} {:>10}",
        "#", "Ticker", "Total", "Fund", "Tech", "Sector", "Cap", "Price"
    );
    for (i, row) in rows.iter().enumerate() {
        let cap = match row.market_cap {
            Some(cap) => format!("{:.1}B", cap / 1e9),
            None => "-".to_string(),
        };
        println!(
            "{:<4} {:<8} {:>5} {:>5} {:>5}  {:<20} {:>8} {:>10.2}",
            i + 1,
            row.ticker,
            row.total,
            row.fundamental,
            row.technical,
            row.sector,
            cap,
            row.price
        );
    }
    if rows.is_empty() {
        println!("no tickers passed the filters");
    }

    ExitCode::SUCCESS
}

fn run_score(settings: &Settings, ticker: &str) -> ExitCode {
    let universe = match open_universe(settings) {
        Ok(u) => u,
        Err(code) => return code,
    };

    let record = match universe.fetch(ticker) {
        Ok(Some(record)) => record,
        Ok(None) => {
            return fail(&ScreenerError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }
        Err(err) => return fail(&err),
    };

    let result = score(&record);
    let momentum = if result.technical >= MOMENTUM_THRESHOLD {
        "positive"
    } else {
        "negative"
    };
    println!("{ticker}: {} bars of history", record.bar_count());
    println!("  fundamental: {:>3} / 80", result.fundamental);
    println!("  technical:   {:>3} / 80  ({momentum} momentum)", result.technical);
    println!("  total:       {:>3} / 160", result.total);

    ExitCode::SUCCESS
}

fn run_backtest(settings: &Settings, tickers: Option<&str>, csv: &[PathBuf]) -> ExitCode {
    let log = FileLogAdapter::new(&settings.error_log_file);
    let mut records: Vec<StockRecord> = Vec::new();

    if csv.is_empty() {
        let universe = match open_universe(settings) {
            Ok(u) => u,
            Err(code) => return code,
        };
        match tickers {
            Some(list) => {
                for ticker in list.split(',').map(|t| t.trim().to_uppercase()) {
                    match universe.fetch(&ticker) {
                        Ok(Some(record)) => records.push(record),
                        Ok(None) => {
                            let err = ScreenerError::DataUnavailable {
                                ticker: ticker.clone(),
                            };
                            eprintln!("warning: {err}");
                            log.log(&ticker, &err.to_string());
                        }
                        Err(err) => return fail(&err),
                    }
                }
            }
            None => records = universe.all_records(),
        }
    } else {
        for path in csv {
            let ticker = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_else(|| "UNKNOWN".to_string());
            match csv_adapter::read_record(&ticker, path) {
                Ok(record) => records.push(record),
                Err(err) => return fail(&err),
            }
        }
    }

    if records.is_empty() {
        eprintln!("error: nothing to backtest");
        return ExitCode::from(5);
    }

    let runs = run_batch(
        &records,
        &settings.strategy,
        &settings.backtest,
        &log,
        |done, total, ticker| eprint!("\rbacktesting {done}/{total} {ticker:<8}"),
    );
    eprintln!();

    if runs.is_empty() {
        eprintln!("error: no ticker had enough history to backtest");
        return ExitCode::from(5);
    }

    println!(
        "{:<8} {:>9} {:>8} {:>9} {:>7} {:>14}",
        "Ticker", "CAGR%", "Sharpe", "MaxDD%", "Trades", "Final equity"
    );
    let succeeded: HashSet<&str> = runs.iter().map(|r| r.ticker.as_str()).collect();
    for run in &runs {
        println!(
            "{:<8} {:>9.2} {:>8.2} {:>9.2} {:>7} {:>14.2}",
            run.ticker,
            run.result.cagr_pct,
            run.result.sharpe,
            run.result.max_drawdown_pct,
            run.result.trade_count,
            run.result.final_equity
        );
    }
    for record in &records {
        if !succeeded.contains(record.ticker.as_str()) {
            println!("{:<8} unavailable (see error log)", record.ticker);
        }
    }

    ExitCode::SUCCESS
}

fn run_portfolio(settings: &Settings, action: PortfolioAction) -> ExitCode {
    let store = JsonPortfolioStore::new(&settings.portfolio_file);
    let log = FileLogAdapter::new(&settings.error_log_file);
    let mut ledger = match PaperLedger::open(&store, &log) {
        Ok(l) => l,
        Err(err) => return fail(&err),
    };

    match action {
        PortfolioAction::Show => {
            let prices = universe_prices(settings, ledger.portfolio());
            let portfolio = ledger.portfolio();
            println!("cash: {:.2}", portfolio.cash);
            if portfolio.positions.is_empty() {
                println!("no open positions");
            } else {
                println!(
                    "{:<8} {:>8} {:>10} {:>10} {:>10} {:>12}",
                    "Ticker", "Shares", "Avg", "Mark", "Last", "Value"
                );
                for position in &portfolio.positions {
                    let last = prices
                        .get(&position.ticker)
                        .copied()
                        .unwrap_or(position.avg_price);
                    println!(
                        "{:<8} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>12.2}",
                        position.ticker,
                        position.shares,
                        position.avg_price,
                        position.high_water_mark(),
                        last,
                        position.market_value(last)
                    );
                }
            }
            println!("total value: {:.2}", portfolio.total_value(&prices));
            ExitCode::SUCCESS
        }
        PortfolioAction::Buy {
            ticker,
            shares,
            price,
        } => {
            let ticker = ticker.to_uppercase();
            let price = match resolve_price(settings, &ticker, price) {
                Ok(p) => p,
                Err(code) => return code,
            };
            let today = Local::now().date_naive();
            match ledger.buy(&ticker, shares, price, today) {
                Ok(()) => {
                    println!(
                        "bought {shares} {ticker} @ {price:.2}; cash {:.2}",
                        ledger.portfolio().cash
                    );
                    ExitCode::SUCCESS
                }
                Err(err) => fail(&err),
            }
        }
        PortfolioAction::Sell {
            ticker,
            shares,
            price,
        } => {
            let ticker = ticker.to_uppercase();
            let price = match resolve_price(settings, &ticker, price) {
                Ok(p) => p,
                Err(code) => return code,
            };
            match ledger.sell(&ticker, shares, price) {
                Ok(()) => {
                    println!(
                        "sold {shares} {ticker} @ {price:.2}; cash {:.2}",
                        ledger.portfolio().cash
                    );
                    ExitCode::SUCCESS
                }
                Err(err) => fail(&err),
            }
        }
        PortfolioAction::Revalue => {
            let prices = universe_prices(settings, ledger.portfolio());
            match ledger.revalue(&prices, &settings.strategy) {
                Ok(sales) => {
                    if sales.is_empty() {
                        println!("no stops triggered");
                    }
                    for sale in &sales {
                        println!(
                            "stopped out of {}: sold {} @ {:.2} for {:.2}",
                            sale.ticker, sale.shares, sale.price, sale.proceeds
                        );
                    }
                    println!("cash: {:.2}", ledger.portfolio().cash);
                    ExitCode::SUCCESS
                }
                Err(err) => fail(&err),
            }
        }
    }
}

/// Latest closes for every held ticker. Missing data file or missing tickers
/// degrade to marking at the entry price rather than failing the command.
fn universe_prices(
    settings: &Settings,
    portfolio: &crate::domain::portfolio::Portfolio,
) -> HashMap<String, f64> {
    let Ok(universe) = JsonDataAdapter::open(&settings.data_file) else {
        return HashMap::new();
    };
    portfolio
        .positions
        .iter()
        .filter_map(|position| {
            let record = universe.fetch(&position.ticker).ok().flatten()?;
            let price = record.latest_close().unwrap_or(record.fundamentals.price);
            Some((position.ticker.clone(), price))
        })
        .collect()
}

fn resolve_price(
    settings: &Settings,
    ticker: &str,
    explicit: Option<f64>,
) -> Result<f64, ExitCode> {
    if let Some(price) = explicit {
        return Ok(price);
    }
    let universe = open_universe(settings)?;
    match universe.fetch(ticker) {
        Ok(Some(record)) => record
            .latest_close()
            .or(Some(record.fundamentals.price))
            .filter(|p| *p > 0.0)
            .ok_or_else(|| {
                fail(&ScreenerError::DataUnavailable {
                    ticker: ticker.to_string(),
                })
            }),
        Ok(None) => Err(fail(&ScreenerError::DataUnavailable {
            ticker: ticker.to_string(),
        })),
        Err(err) => Err(fail(&err)),
    }
}

fn run_watchlist(settings: &Settings, action: WatchlistAction) -> ExitCode {
    let store = JsonWatchlistStore::new(&settings.watchlist_file);
    let mut watchlist = match store.load() {
        Ok(w) => w,
        Err(err) => return fail(&err),
    };

    match action {
        WatchlistAction::List => {
            if watchlist.is_empty() {
                println!("watchlist is empty");
            }
            for ticker in &watchlist {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        WatchlistAction::Add { ticker } => {
            let ticker = ticker.to_uppercase();
            if watchlist.contains(&ticker) {
                println!("{ticker} already on the watchlist");
                return ExitCode::SUCCESS;
            }
            watchlist.push(ticker.clone());
            watchlist.sort();
            match store.save(&watchlist) {
                Ok(()) => {
                    println!("added {ticker}");
                    ExitCode::SUCCESS
                }
                Err(err) => fail(&err),
            }
        }
        WatchlistAction::Remove { ticker } => {
            let ticker = ticker.to_uppercase();
            let before = watchlist.len();
            watchlist.retain(|t| t != &ticker);
            if watchlist.len() == before {
                println!("{ticker} is not on the watchlist");
                return ExitCode::SUCCESS;
            }
            match store.save(&watchlist) {
                Ok(()) => {
                    println!("removed {ticker}");
                    ExitCode::SUCCESS
                }
                Err(err) => fail(&err),
            }
        }
    }
}
