//! Per-bar indicator snapshot assembly.
//!
//! Computes the fixed indicator set the entry scan relies on and keeps only
//! the bars where every indicator is past warmup, mirroring a dataframe
//! drop-rows-with-missing-values step. The 200-bar SMA dominates, so a series
//! shorter than 200 bars yields no rows.

use chrono::NaiveDate;

use crate::domain::indicator::{
    calculate_adx, calculate_bollinger, calculate_macd_default, calculate_rsi, calculate_sma,
    IndicatorValue,
};
use crate::domain::indicator::adx::DEFAULT_ADX_PERIOD;
use crate::domain::indicator::bollinger::{DEFAULT_BOLLINGER_MULT_X100, DEFAULT_BOLLINGER_PERIOD};
use crate::domain::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::domain::ohlcv::PriceBar;

pub const SMA_PERIOD: usize = 200;

/// The full indicator set for one bar, defined only where every window has
/// enough history.
#[derive(Debug, Clone)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_lower: f64,
    pub bb_upper: f64,
    pub adx: f64,
    pub sma_200: f64,
}

impl IndicatorSnapshot {
    pub fn is_finite(&self) -> bool {
        self.rsi.is_finite()
            && self.macd.is_finite()
            && self.macd_signal.is_finite()
            && self.bb_lower.is_finite()
            && self.bb_upper.is_finite()
            && self.adx.is_finite()
            && self.sma_200.is_finite()
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub date: NaiveDate,
    pub close: f64,
    pub snapshot: IndicatorSnapshot,
}

pub fn build_snapshots(bars: &[PriceBar]) -> Vec<SnapshotRow> {
    if bars.is_empty() {
        return Vec::new();
    }

    let rsi = calculate_rsi(bars, DEFAULT_RSI_PERIOD);
    let macd = calculate_macd_default(bars);
    let bb = calculate_bollinger(bars, DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_MULT_X100);
    let adx = calculate_adx(bars, DEFAULT_ADX_PERIOD);
    let sma = calculate_sma(bars, SMA_PERIOD);

    // ADX can shortcut to an all-invalid series; everything else is 1:1.
    let mut rows = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let rsi_pt = &rsi.values[i];
        let macd_pt = &macd.values[i];
        let bb_pt = &bb.values[i];
        let adx_pt = &adx.values[i];
        let sma_pt = &sma.values[i];

        if !(rsi_pt.valid && macd_pt.valid && bb_pt.valid && adx_pt.valid && sma_pt.valid) {
            continue;
        }

        let rsi_v = match rsi_pt.value {
            IndicatorValue::Simple(v) => v,
            _ => continue,
        };
        let (macd_v, signal_v) = match macd_pt.value {
            IndicatorValue::Macd { line, signal, .. } => (line, signal),
            _ => continue,
        };
        let (upper_v, lower_v) = match bb_pt.value {
            IndicatorValue::Bollinger { upper, lower, .. } => (upper, lower),
            _ => continue,
        };
        let adx_v = match adx_pt.value {
            IndicatorValue::Simple(v) => v,
            _ => continue,
        };
        let sma_v = match sma_pt.value {
            IndicatorValue::Simple(v) => v,
            _ => continue,
        };

        rows.push(SnapshotRow {
            date: bar.date,
            close: bar.close,
            snapshot: IndicatorSnapshot {
                rsi: rsi_v,
                macd: macd_v,
                macd_signal: signal_v,
                bb_lower: lower_v,
                bb_upper: upper_v,
                adx: adx_v,
                sma_200: sma_v,
            },
        });
    }

    rows
}
