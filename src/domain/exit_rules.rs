//! Ranked exit rule evaluation for open positions.
//!
//! Rules are checked in strict priority order; the first match wins and the
//! remaining rules are not evaluated:
//!
//! 1. Take-profit: close >= entry * 1.10
//! 2. Stop-loss:   close <= entry * 0.93
//! 3. Max hold:    held longer than the configured day limit
//! 4. Trend reversal: MACD line below its signal line on the fresh short
//!    series; applies only when the series is long enough for a valid MACD
//!    point, otherwise the rule is silently skipped this run.
//!
//! No match means the position is carried forward unchanged.

use chrono::NaiveDate;

use crate::domain::indicator::{calculate_macd_default, IndicatorValue};
use crate::domain::ohlcv::PriceBar;
use crate::domain::position::Position;

pub const TAKE_PROFIT_MULT: f64 = 1.10;
pub const STOP_LOSS_MULT: f64 = 0.93;

#[derive(Debug, Clone, PartialEq)]
pub struct ExitDecision {
    pub price: f64,
    pub reason: String,
}

pub fn evaluate_exit(
    position: &Position,
    bars: &[PriceBar],
    today: NaiveDate,
    max_hold_days: i64,
) -> Option<ExitDecision> {
    let latest = bars.last()?;
    let close = latest.close;

    if close >= position.entry_price * TAKE_PROFIT_MULT {
        return Some(ExitDecision {
            price: close,
            reason: "Take Profit 10%".to_string(),
        });
    }

    if close <= position.entry_price * STOP_LOSS_MULT {
        return Some(ExitDecision {
            price: close,
            reason: "Stop Loss 7%".to_string(),
        });
    }

    if position.holding_days(today) > max_hold_days {
        return Some(ExitDecision {
            price: close,
            reason: format!("Max Hold {} days", max_hold_days),
        });
    }

    let macd = calculate_macd_default(bars);
    if let Some(point) = macd.values.last() {
        if point.valid {
            if let IndicatorValue::Macd { line, signal, .. } = point.value {
                if line < signal {
                    return Some(ExitDecision {
                        price: close,
                        reason: "MACD cross down".to_string(),
                    });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(entry_price: f64, entry_date: NaiveDate) -> Position {
        Position {
            ticker: "AAPL".into(),
            entry_price,
            entry_date,
            reason: "test".into(),
            shares: 10,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Flat closes: no profit/loss trigger, MACD degenerate at zero.
    fn flat_bars(count: usize, close: f64) -> Vec<PriceBar> {
        (0..count)
            .map(|i| PriceBar {
                ticker: "AAPL".into(),
                date: date(2024, 1, 1)
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    /// Short ramp up then sharp decline, ending at `final_close`. Enough bars
    /// for a valid MACD with the line below its signal at the end.
    fn declining_bars(final_close: f64) -> Vec<PriceBar> {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let peak = *closes.last().unwrap();
        for i in 1..=15 {
            closes.push(peak - i as f64 * ((peak - final_close) / 15.0));
        }
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                ticker: "AAPL".into(),
                date: date(2024, 1, 1)
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn take_profit_scenario() {
        // entry 100, latest close 111 → Take Profit 10%
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 111.0);

        let decision = evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).unwrap();
        assert_eq!(decision.reason, "Take Profit 10%");
        assert!((decision.price - 111.0).abs() < f64::EPSILON);
    }

    #[test]
    fn take_profit_boundary_inclusive() {
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 100.0 * TAKE_PROFIT_MULT);

        let decision = evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).unwrap();
        assert_eq!(decision.reason, "Take Profit 10%");
    }

    #[test]
    fn stop_loss_scenario() {
        // entry 100, latest close 92 → Stop Loss 7%
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 92.0);

        let decision = evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).unwrap();
        assert_eq!(decision.reason, "Stop Loss 7%");
    }

    #[test]
    fn stop_loss_boundary_inclusive() {
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 100.0 * STOP_LOSS_MULT);

        let decision = evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).unwrap();
        assert_eq!(decision.reason, "Stop Loss 7%");
    }

    #[test]
    fn max_hold_scenario() {
        // Held 20 days, limit 14, no profit/loss trigger.
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 100.0);

        let decision = evaluate_exit(&pos, &bars, date(2024, 6, 21), 14).unwrap();
        assert_eq!(decision.reason, "Max Hold 14 days");
    }

    #[test]
    fn max_hold_boundary_exclusive() {
        // Exactly at the limit does not trigger (rule is strictly greater).
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 100.0);

        assert!(evaluate_exit(&pos, &bars, date(2024, 6, 15), 14).is_none());
    }

    #[test]
    fn profit_loss_outrank_max_hold() {
        // Held past the limit but take-profit fires first.
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 111.0);

        let decision = evaluate_exit(&pos, &bars, date(2024, 7, 10), 14).unwrap();
        assert_eq!(decision.reason, "Take Profit 10%");
    }

    #[test]
    fn max_hold_outranks_macd_cross() {
        // Both max-hold and trend-reversal would trigger; max-hold wins.
        let bars = declining_bars(100.0);
        let pos = position(100.0, date(2024, 1, 1));
        let today = bars.last().unwrap().date + chrono::Days::new(30);

        let decision = evaluate_exit(&pos, &bars, today, 14).unwrap();
        assert_eq!(decision.reason, "Max Hold 14 days");
    }

    #[test]
    fn macd_cross_down_fires_last() {
        // Fresh position, no profit/loss, within hold window: only the
        // trend reversal remains.
        let bars = declining_bars(100.0);
        let pos = position(100.0, bars.last().unwrap().date);

        let decision = evaluate_exit(&pos, &bars, bars.last().unwrap().date, 14).unwrap();
        assert_eq!(decision.reason, "MACD cross down");
    }

    #[test]
    fn macd_rule_skipped_on_short_series() {
        // Too few bars for a valid MACD point: the rule does not apply.
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(10, 100.0);

        assert!(evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).is_none());
    }

    #[test]
    fn empty_series_no_decision() {
        let pos = position(100.0, date(2024, 6, 1));
        assert!(evaluate_exit(&pos, &[], date(2024, 6, 5), 14).is_none());
    }

    #[test]
    fn idempotent_on_unchanged_input() {
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 111.0);
        let today = date(2024, 6, 5);

        let first = evaluate_exit(&pos, &bars, today, 14);
        let second = evaluate_exit(&pos, &bars, today, 14);
        assert_eq!(first, second);
    }

    #[test]
    fn no_trigger_carries_forward() {
        let pos = position(100.0, date(2024, 6, 1));
        let bars = flat_bars(5, 102.0);

        assert!(evaluate_exit(&pos, &bars, date(2024, 6, 5), 14).is_none());
    }
}
