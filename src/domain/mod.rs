//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod snapshot;
pub mod signal;
pub mod position;
pub mod ledger;
pub mod sizing;
pub mod exit_rules;
pub mod scan;
pub mod error;
