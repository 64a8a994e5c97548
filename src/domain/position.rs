//! Open position and exit record types.

use chrono::NaiveDate;

/// An open paper position. Owned exclusively by the ledger; at most one per
/// ticker at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub reason: String,
    pub shares: i64,
}

impl Position {
    /// Capital committed at entry.
    pub fn cost_basis(&self) -> f64 {
        self.entry_price * self.shares as f64
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares as f64 * (price - self.entry_price)
    }

    pub fn holding_days(&self, today: NaiveDate) -> i64 {
        (today - self.entry_date).num_days()
    }
}

/// Append-only historical fact; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitRecord {
    pub ticker: String,
    pub exit_price: f64,
    pub exit_date: NaiveDate,
    pub reason: String,
}
