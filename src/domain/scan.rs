//! Scan orchestration: one run = one entry pass plus one exit pass.
//!
//! Strictly sequential and single-threaded. The ledger and running balance
//! are only touched from this one thread of control; determinism comes from
//! sorted ticker order, not synchronization.

use chrono::NaiveDate;
use std::time::Duration;

use crate::domain::error::TraderError;
use crate::domain::exit_rules::evaluate_exit;
use crate::domain::ledger::Ledger;
use crate::domain::signal::{evaluate_entry, SignalEvaluation};
use crate::domain::sizing::{position_from_signal, size_entry, SizerConfig, SizingDecision};
use crate::ports::data_port::MarketDataPort;
use crate::ports::ledger_store_port::LedgerStorePort;
use crate::ports::universe_port::UniversePort;

pub const DEFAULT_ENTRY_LOOKBACK_DAYS: usize = 250;
pub const DEFAULT_EXIT_LOOKBACK_DAYS: usize = 30;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub starting_cash: f64,
    pub max_position_fraction: f64,
    pub max_hold_days: i64,
    pub entry_lookback_days: usize,
    pub exit_lookback_days: usize,
    /// Inter-ticker delay, a rate-limiting courtesy to the data source.
    pub scan_delay: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub buys: Vec<String>,
    pub sells: Vec<String>,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    /// Plain-text report body for the notification sink.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No trades executed today.\n".to_string();
        }

        let mut out = String::new();
        if !self.buys.is_empty() {
            out.push_str("Buys:\n");
            for line in &self.buys {
                out.push_str(&format!("  {}\n", line));
            }
        }
        if !self.sells.is_empty() {
            out.push_str("Sells:\n");
            for line in &self.sells {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out
    }
}

/// One full run: entry scan over the universe, then exit scan over open
/// positions, then a full rewrite of the persisted ledger. Per-ticker data
/// problems are logged and skipped; ledger or storage faults abort.
pub fn run_scan(
    universe: &dyn UniversePort,
    data: &dyn MarketDataPort,
    store: &dyn LedgerStorePort,
    config: &ScanConfig,
    today: NaiveDate,
) -> Result<RunSummary, TraderError> {
    let mut ledger = Ledger::with_positions(config.starting_cash, store.load_positions()?)?;
    let sizer = SizerConfig {
        starting_cash: config.starting_cash,
        max_position_fraction: config.max_position_fraction,
    };

    let mut symbols = universe.fetch_symbols()?;
    symbols.sort();
    symbols.dedup();

    let mut summary = RunSummary::default();

    // Phase 1: entries.
    eprintln!("Scanning {} tickers...", symbols.len());
    for ticker in &symbols {
        if ledger.is_open(ticker) {
            continue;
        }

        let bars = match data.fetch_daily(ticker, config.entry_lookback_days) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", ticker, e);
                pause(config.scan_delay);
                continue;
            }
        };

        match evaluate_entry(ticker, &bars) {
            SignalEvaluation::Signal(signal) => {
                if let SizingDecision::Sized { shares } =
                    size_entry(signal.price, ledger.available_balance(), &sizer)
                {
                    let position = position_from_signal(&signal, shares, today);
                    store.append_position(&position)?;
                    eprintln!(
                        "[BUY] {} at ${:.2} for {} shares ({})",
                        position.ticker, position.entry_price, position.shares, position.reason
                    );
                    summary.buys.push(format!(
                        "{} at ${:.2} ({})",
                        position.ticker,
                        position.entry_price,
                        signal.reason_line()
                    ));
                    ledger.open(position)?;
                }
            }
            SignalEvaluation::NoSignal | SignalEvaluation::DataUnavailable => {}
            SignalEvaluation::ComputationFault(msg) => {
                eprintln!("Warning: skipping {} ({})", ticker, msg);
            }
        }

        pause(config.scan_delay);
    }

    // Phase 2: exits. Positions with no trigger carry forward unchanged.
    let open_tickers = ledger.tickers();
    for ticker in &open_tickers {
        let bars = match data.fetch_daily(ticker, config.exit_lookback_days) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: holding {} unevaluated ({})", ticker, e);
                continue;
            }
        };
        if bars.is_empty() {
            eprintln!("Warning: holding {} unevaluated (no data)", ticker);
            continue;
        }

        let Some(position) = ledger.get(ticker).cloned() else {
            continue;
        };

        if let Some(decision) = evaluate_exit(&position, &bars, today, config.max_hold_days) {
            let record = ledger.close(ticker, decision.price, today, &decision.reason)?;
            store.append_exit(&record)?;
            eprintln!(
                "[SELL] {} at ${:.2} ({})",
                record.ticker, record.exit_price, record.reason
            );
            summary
                .sells
                .push(format!("{} at ${:.2} ({})", record.ticker, record.exit_price, record.reason));
        }
    }

    let remaining: Vec<_> = ledger.positions().cloned().collect();
    store.save_positions(&remaining)?;

    Ok(summary)
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
