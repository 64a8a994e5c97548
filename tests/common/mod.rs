#![allow(dead_code)]

use chrono::NaiveDate;
use papertrader::domain::error::TraderError;
use papertrader::domain::ohlcv::PriceBar;
use papertrader::domain::position::{ExitRecord, Position};
use papertrader::ports::data_port::MarketDataPort;
use papertrader::ports::ledger_store_port::LedgerStorePort;
use papertrader::ports::universe_port::UniversePort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date,
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume: 1000,
    }
}

/// Consecutive calendar days starting at `start`, one bar per close.
pub fn bars_from_closes(ticker: &str, start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let day = start
                .checked_add_days(chrono::Days::new(i as u64))
                .unwrap();
            make_bar(ticker, day, close)
        })
        .collect()
}

pub fn flat_bars(ticker: &str, start: NaiveDate, count: usize, close: f64) -> Vec<PriceBar> {
    bars_from_closes(ticker, start, &vec![close; count])
}

/// 260 bars shaped to satisfy all five entry conditions on the final bar.
/// A long uptrend keeps the close above the 200-day average with a trending
/// ADX. A sharp 20-day pullback drives RSI below 50 and pulls the close back
/// under the upper band. A 10-day recovery then lifts the MACD line back
/// above its lagging signal line. Increments are powers of two so the closes
/// are exact in binary. Final close is 199.5.
pub fn entry_signal_bars(ticker: &str, start: NaiveDate) -> Vec<PriceBar> {
    let mut closes = Vec::with_capacity(260);
    let mut c = 100.0;
    for _ in 0..230 {
        closes.push(c);
        c += 0.5;
    }
    for _ in 0..20 {
        closes.push(c);
        c -= 1.0;
    }
    for _ in 0..10 {
        closes.push(c);
        c += 0.5;
    }
    bars_from_closes(ticker, start, &closes)
}

pub const ENTRY_SIGNAL_CLOSE: f64 = 199.5;

pub struct MockMarketData {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<(String, usize)>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_daily(
        &self,
        ticker: &str,
        lookback_days: usize,
    ) -> Result<Vec<PriceBar>, TraderError> {
        self.calls
            .borrow_mut()
            .push((ticker.to_string(), lookback_days));

        if let Some(reason) = self.errors.get(ticker) {
            return Err(TraderError::Storage {
                reason: reason.clone(),
            });
        }

        let mut bars = self.data.get(ticker).cloned().unwrap_or_default();
        if lookback_days > 0 && bars.len() > lookback_days {
            bars.drain(..bars.len() - lookback_days);
        }
        Ok(bars)
    }
}

pub struct MockUniverse {
    pub symbols: Vec<String>,
}

impl MockUniverse {
    pub fn new(symbols: &[&str]) -> Self {
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UniversePort for MockUniverse {
    fn fetch_symbols(&self) -> Result<Vec<String>, TraderError> {
        Ok(self.symbols.clone())
    }
}

#[derive(Default)]
pub struct MockLedgerStore {
    pub initial: Vec<Position>,
    pub appended: RefCell<Vec<Position>>,
    pub saved: RefCell<Option<Vec<Position>>>,
    pub exits: RefCell<Vec<ExitRecord>>,
}

impl MockLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.initial.push(position);
        self
    }
}

impl LedgerStorePort for MockLedgerStore {
    fn load_positions(&self) -> Result<Vec<Position>, TraderError> {
        Ok(self.initial.clone())
    }

    fn append_position(&self, position: &Position) -> Result<(), TraderError> {
        self.appended.borrow_mut().push(position.clone());
        Ok(())
    }

    fn save_positions(&self, positions: &[Position]) -> Result<(), TraderError> {
        *self.saved.borrow_mut() = Some(positions.to_vec());
        Ok(())
    }

    fn append_exit(&self, record: &ExitRecord) -> Result<(), TraderError> {
        self.exits.borrow_mut().push(record.clone());
        Ok(())
    }
}

pub fn open_position(ticker: &str, entry_price: f64, entry_date: NaiveDate) -> Position {
    Position {
        ticker: ticker.to_string(),
        entry_price,
        entry_date,
        reason: "RSI<50, MACD>Signal, Close<=BB_Upper, ADX>15, Close>SMA200".to_string(),
        shares: 10,
    }
}

pub fn scan_config(starting_cash: f64, max_position_fraction: f64) -> papertrader::domain::scan::ScanConfig {
    papertrader::domain::scan::ScanConfig {
        starting_cash,
        max_position_fraction,
        max_hold_days: 14,
        entry_lookback_days: 260,
        exit_lookback_days: 30,
        scan_delay: Duration::ZERO,
    }
}
