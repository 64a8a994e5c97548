//! Entry signal evaluation: 5-condition indicator confluence.
//!
//! All five conditions must hold on the latest snapshot bar for a signal to
//! be actionable. This is an AND confluence, not a scored threshold: the
//! reasons list is always exactly the five canonical labels, in order.

use chrono::NaiveDate;

use crate::domain::ohlcv::PriceBar;
use crate::domain::snapshot::{build_snapshots, SnapshotRow};

pub const RSI_ENTRY_CEILING: f64 = 50.0;
pub const ADX_ENTRY_FLOOR: f64 = 15.0;

/// Canonical condition labels, in evaluation order.
pub const ENTRY_CONDITIONS: [&str; 5] = [
    "RSI<50",
    "MACD>Signal",
    "Close<=BB_Upper",
    "ADX>15",
    "Close>SMA200",
];

#[derive(Debug, Clone)]
pub struct EntrySignal {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub reasons: Vec<&'static str>,
}

impl EntrySignal {
    /// The reasons joined for ledger rows and report lines.
    pub fn reason_line(&self) -> String {
        self.reasons.join(", ")
    }
}

/// Typed outcome of one ticker's entry evaluation. `DataUnavailable` and
/// `ComputationFault` are per-ticker skip outcomes, never run-fatal.
#[derive(Debug, Clone)]
pub enum SignalEvaluation {
    Signal(EntrySignal),
    NoSignal,
    DataUnavailable,
    ComputationFault(String),
}

/// Which of the five conditions hold on the latest snapshot row, in canonical
/// order. Exposed separately so the single-ticker scan can print verdicts.
pub fn satisfied_conditions(row: &SnapshotRow) -> Vec<&'static str> {
    let snap = &row.snapshot;
    let checks = [
        snap.rsi < RSI_ENTRY_CEILING,
        snap.macd > snap.macd_signal,
        row.close <= snap.bb_upper,
        snap.adx > ADX_ENTRY_FLOOR,
        row.close > snap.sma_200,
    ];

    ENTRY_CONDITIONS
        .iter()
        .zip(checks)
        .filter_map(|(&label, ok)| ok.then_some(label))
        .collect()
}

pub fn evaluate_entry(ticker: &str, bars: &[PriceBar]) -> SignalEvaluation {
    if bars.is_empty() {
        return SignalEvaluation::DataUnavailable;
    }

    let rows = build_snapshots(bars);
    let Some(latest) = rows.last() else {
        return SignalEvaluation::DataUnavailable;
    };

    if !latest.close.is_finite() || !latest.snapshot.is_finite() {
        return SignalEvaluation::ComputationFault(format!(
            "non-finite indicator output for {} on {}",
            ticker, latest.date
        ));
    }

    let reasons = satisfied_conditions(latest);
    if reasons.len() == ENTRY_CONDITIONS.len() {
        SignalEvaluation::Signal(EntrySignal {
            ticker: ticker.to_string(),
            as_of: latest.date,
            price: latest.close,
            reasons,
        })
    } else {
        SignalEvaluation::NoSignal
    }
}
