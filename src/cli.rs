//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_universe_adapter::FileUniverseAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::error::TraderError;
use crate::domain::ledger::Ledger;
use crate::domain::scan::{
    run_scan, ScanConfig, DEFAULT_ENTRY_LOOKBACK_DAYS, DEFAULT_EXIT_LOOKBACK_DAYS,
};
use crate::domain::signal::{satisfied_conditions, ENTRY_CONDITIONS};
use crate::domain::snapshot::build_snapshots;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::ledger_store_port::LedgerStorePort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::universe_port::UniversePort;

pub const REPORT_SUBJECT: &str = "Daily Swing Trade Report";

#[derive(Parser, Debug)]
#[command(name = "papertrader", about = "Rule-based swing-trading paper bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one full scan: entries over the universe, exits over open positions
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Print the resolved configuration and universe without trading
        #[arg(long)]
        dry_run: bool,
    },
    /// Evaluate the entry conditions for a single ticker
    Scan {
        #[arg(long)]
        ticker: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show open positions and the available balance
    Positions {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, dry_run } => run_daily(&config, dry_run),
        Command::Scan { ticker, config } => run_single_scan(&ticker, &config),
        Command::Positions { config } => run_positions(&config),
    }
}

/// Resolved application configuration, immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub data_path: PathBuf,
    pub universe_file: PathBuf,
    pub buys_path: PathBuf,
    pub exits_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_app_config(adapter: &dyn ConfigPort) -> Result<AppConfig, TraderError> {
    let starting_cash = adapter.get_double("account", "starting_cash", 10_000.0);
    if starting_cash <= 0.0 {
        return Err(TraderError::ConfigInvalid {
            section: "account".into(),
            key: "starting_cash".into(),
            reason: "must be positive".into(),
        });
    }

    let max_position_fraction = adapter.get_double("account", "max_position_size", 0.05);
    if max_position_fraction <= 0.0 || max_position_fraction > 1.0 {
        return Err(TraderError::ConfigInvalid {
            section: "account".into(),
            key: "max_position_size".into(),
            reason: "must be in (0, 1]".into(),
        });
    }

    let max_hold_days = adapter.get_int("account", "max_hold_days", 14);
    if max_hold_days < 1 {
        return Err(TraderError::ConfigInvalid {
            section: "account".into(),
            key: "max_hold_days".into(),
            reason: "must be at least 1".into(),
        });
    }

    let data_path = adapter
        .get_string("data", "path")
        .ok_or_else(|| TraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    let universe_file =
        adapter
            .get_string("universe", "file")
            .ok_or_else(|| TraderError::ConfigMissing {
                section: "universe".into(),
                key: "file".into(),
            })?;

    let scan = ScanConfig {
        starting_cash,
        max_position_fraction,
        max_hold_days,
        entry_lookback_days: adapter.get_int(
            "data",
            "entry_lookback_days",
            DEFAULT_ENTRY_LOOKBACK_DAYS as i64,
        ) as usize,
        exit_lookback_days: adapter.get_int(
            "data",
            "exit_lookback_days",
            DEFAULT_EXIT_LOOKBACK_DAYS as i64,
        ) as usize,
        scan_delay: Duration::from_millis(adapter.get_int("data", "scan_delay_ms", 500) as u64),
    };

    Ok(AppConfig {
        scan,
        data_path: PathBuf::from(data_path),
        universe_file: PathBuf::from(universe_file),
        buys_path: PathBuf::from(
            adapter
                .get_string("ledger", "buys")
                .unwrap_or_else(|| "buys.csv".to_string()),
        ),
        exits_path: PathBuf::from(
            adapter
                .get_string("ledger", "exits")
                .unwrap_or_else(|| "exits.csv".to_string()),
        ),
        report_path: adapter.get_string("report", "output").map(PathBuf::from),
    })
}

fn run_daily(config_path: &PathBuf, dry_run: bool) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let universe = FileUniverseAdapter::new(app.universe_file.clone());
    let data = CsvDataAdapter::new(app.data_path.clone());
    let store = CsvLedgerAdapter::new(app.buys_path.clone(), app.exits_path.clone());
    let notify = TextReportAdapter::new(app.report_path.clone());

    if dry_run {
        return run_dry_run(&app, &universe);
    }

    let today = Local::now().date_naive();
    eprintln!("Swing trader paper bot running - {}", today);

    let summary = match run_scan(&universe, &data, &store, &app.scan, today) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Ledger state is already persisted; a failed delivery only warns.
    if let Err(e) = notify.send(REPORT_SUBJECT, &summary.render()) {
        eprintln!("Warning: report delivery failed ({})", e);
    }

    ExitCode::SUCCESS
}

fn run_dry_run(app: &AppConfig, universe: &dyn UniversePort) -> ExitCode {
    println!("starting_cash: {}", app.scan.starting_cash);
    println!("max_position_size: {}", app.scan.max_position_fraction);
    println!("max_hold_days: {}", app.scan.max_hold_days);
    println!("entry_lookback_days: {}", app.scan.entry_lookback_days);
    println!("exit_lookback_days: {}", app.scan.exit_lookback_days);
    println!("data_path: {}", app.data_path.display());
    println!("buys: {}", app.buys_path.display());
    println!("exits: {}", app.exits_path.display());

    match universe.fetch_symbols() {
        Ok(symbols) => {
            println!("universe: {} symbols", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_single_scan(ticker: &str, config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvDataAdapter::new(app.data_path.clone());
    let bars = match data.fetch_daily(ticker, app.scan.entry_lookback_days) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let rows = build_snapshots(&bars);
    let Some(latest) = rows.last() else {
        println!("{}: insufficient history ({} bars)", ticker, bars.len());
        return ExitCode::SUCCESS;
    };

    let satisfied = satisfied_conditions(latest);
    println!("{} as of {} (close {:.2})", ticker, latest.date, latest.close);
    for condition in ENTRY_CONDITIONS {
        let mark = if satisfied.contains(&condition) {
            "pass"
        } else {
            "fail"
        };
        println!("  {:<16} {}", condition, mark);
    }
    if satisfied.len() == ENTRY_CONDITIONS.len() {
        println!("signal: BUY");
    } else {
        println!("signal: none");
    }

    ExitCode::SUCCESS
}

fn run_positions(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let store = CsvLedgerAdapter::new(app.buys_path.clone(), app.exits_path.clone());
    let positions = match store.load_positions() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ledger = match Ledger::with_positions(app.scan.starting_cash, positions) {
        Ok(l) => l,
        Err(e) => {
            let err: TraderError = e.into();
            eprintln!("error: {err}");
            return (&err).into();
        }
    };

    if ledger.position_count() == 0 {
        println!("No open positions.");
    } else {
        for position in ledger.positions() {
            println!(
                "{:<8} {:>4} shares at ${:<8.2} since {}  ({})",
                position.ticker,
                position.shares,
                position.entry_price,
                position.entry_date,
                position.reason
            );
        }
    }
    println!("Available balance: ${:.2}", ledger.available_balance());

    ExitCode::SUCCESS
}
