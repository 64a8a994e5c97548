//! Portfolio ledger: sole owner of open positions and the derived balance.
//!
//! The ledger is the durable state carried between runs. It is loaded from
//! the persisted snapshot at run start and rewritten in full at run end; no
//! in-memory state survives between invocations.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::position::{ExitRecord, Position};

/// Opening an already-open ticker or closing a non-open one is a consistency
/// bug, signaled distinctly from data problems and never swallowed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("position already open for {0}")]
    AlreadyOpen(String),

    #[error("no open position for {0}")]
    NotOpen(String),
}

#[derive(Debug, Clone)]
pub struct Ledger {
    starting_cash: f64,
    // BTreeMap keeps position iteration deterministic run-over-run.
    positions: BTreeMap<String, Position>,
}

impl Ledger {
    pub fn new(starting_cash: f64) -> Self {
        Ledger {
            starting_cash,
            positions: BTreeMap::new(),
        }
    }

    pub fn with_positions(starting_cash: f64, positions: Vec<Position>) -> Result<Self, LedgerError> {
        let mut ledger = Ledger::new(starting_cash);
        for position in positions {
            ledger.open(position)?;
        }
        Ok(ledger)
    }

    pub fn starting_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn is_open(&self, ticker: &str) -> bool {
        self.positions.contains_key(ticker)
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    /// Open positions in ticker order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Open tickers in sorted order.
    pub fn tickers(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    /// starting_cash minus the cost basis of every open position.
    pub fn available_balance(&self) -> f64 {
        let committed: f64 = self.positions.values().map(|p| p.cost_basis()).sum();
        self.starting_cash - committed
    }

    pub fn open(&mut self, position: Position) -> Result<(), LedgerError> {
        if self.positions.contains_key(&position.ticker) {
            return Err(LedgerError::AlreadyOpen(position.ticker));
        }
        self.positions.insert(position.ticker.clone(), position);
        Ok(())
    }

    /// Remove the position and produce its exit record.
    pub fn close(
        &mut self,
        ticker: &str,
        exit_price: f64,
        exit_date: NaiveDate,
        reason: &str,
    ) -> Result<ExitRecord, LedgerError> {
        let position = self
            .positions
            .remove(ticker)
            .ok_or_else(|| LedgerError::NotOpen(ticker.to_string()))?;

        Ok(ExitRecord {
            ticker: position.ticker,
            exit_price,
            exit_date,
            reason: reason.to_string(),
        })
    }
}
