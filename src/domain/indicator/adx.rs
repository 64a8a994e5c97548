//! ADX (Average Directional Index) indicator.
//!
//! Wilder's directional movement system:
//! - +DM = high[i] - high[i-1] when it exceeds both the down-move and zero
//! - -DM = low[i-1] - low[i] when it exceeds both the up-move and zero
//! - +DM, -DM and TR are Wilder-smoothed over n periods
//! - DI+ = 100 * smoothed(+DM) / smoothed(TR), likewise DI-
//! - DX = 100 * |DI+ - DI-| / (DI+ + DI-)
//! - ADX = Wilder average of DX over n periods
//!
//! Warmup: first (2n - 1) bars are invalid (n changes to seed the smoothed
//! DM/TR, then n DX values to seed the ADX average).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_ADX_PERIOD: usize = 14;

pub fn calculate_adx(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let invalid = |bars: &[PriceBar]| IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values: bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect(),
    };

    if period == 0 || bars.len() < 2 * period + 1 {
        return invalid(bars);
    }

    // Per-change raw values, index i covers the move from bar i-1 to bar i.
    let n = bars.len();
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    let mut tr = vec![0.0; n];

    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
        tr[i] = bars[i].true_range(bars[i - 1].close);
    }

    // Wilder-smoothed DM/TR: seed with the sum over the first n changes,
    // then smoothed = prev - prev/n + current.
    let mut sm_plus = vec![0.0; n];
    let mut sm_minus = vec![0.0; n];
    let mut sm_tr = vec![0.0; n];

    sm_plus[period] = plus_dm[1..=period].iter().sum();
    sm_minus[period] = minus_dm[1..=period].iter().sum();
    sm_tr[period] = tr[1..=period].iter().sum();

    for i in (period + 1)..n {
        sm_plus[i] = sm_plus[i - 1] - sm_plus[i - 1] / period as f64 + plus_dm[i];
        sm_minus[i] = sm_minus[i - 1] - sm_minus[i - 1] / period as f64 + minus_dm[i];
        sm_tr[i] = sm_tr[i - 1] - sm_tr[i - 1] / period as f64 + tr[i];
    }

    let mut dx = vec![0.0; n];
    for i in period..n {
        if sm_tr[i] == 0.0 {
            continue;
        }
        let di_plus = 100.0 * sm_plus[i] / sm_tr[i];
        let di_minus = 100.0 * sm_minus[i] / sm_tr[i];
        let di_sum = di_plus + di_minus;
        if di_sum > 0.0 {
            dx[i] = 100.0 * (di_plus - di_minus).abs() / di_sum;
        }
    }

    let warmup = 2 * period - 1;
    let mut values = Vec::with_capacity(n);
    let mut adx = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i < warmup {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
        } else {
            if i == warmup {
                adx = dx[period..=warmup].iter().sum::<f64>() / period as f64;
            } else {
                adx = (adx * (period - 1) as f64 + dx[i]) / period as f64;
            }
            values.push(IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(adx),
            });
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    }
}
