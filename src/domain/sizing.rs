//! Position sizing against a fixed cash base.
//!
//! The allocation cap is computed from the *original* starting cash, not the
//! live balance, so a single position's size is independent of how much cash
//! is already deployed. Affordability still checks the live balance.

use chrono::NaiveDate;

use super::position::Position;
use super::signal::EntrySignal;

#[derive(Debug, Clone, PartialEq)]
pub struct SizerConfig {
    pub starting_cash: f64,
    pub max_position_fraction: f64,
}

/// A rejected sizing is a normal "no trade" outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SizingDecision {
    Sized { shares: i64 },
    Rejected,
}

pub fn size_entry(price: f64, available_balance: f64, config: &SizerConfig) -> SizingDecision {
    if price <= 0.0 || !price.is_finite() {
        return SizingDecision::Rejected;
    }

    let allocation = config.starting_cash * config.max_position_fraction;
    let shares = (allocation / price).floor() as i64;

    if shares > 0 && price * shares as f64 <= available_balance {
        SizingDecision::Sized { shares }
    } else {
        SizingDecision::Rejected
    }
}

/// Build the position a validated signal plus sized share count produces.
pub fn position_from_signal(signal: &EntrySignal, shares: i64, entry_date: NaiveDate) -> Position {
    Position {
        ticker: signal.ticker.clone(),
        entry_price: signal.price,
        entry_date,
        reason: signal.reason_line(),
        shares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SizerConfig {
        SizerConfig {
            starting_cash: 10_000.0,
            max_position_fraction: 0.05,
        }
    }

    #[test]
    fn allocation_floors_to_whole_shares() {
        // allocation = 500, price = 25 → 20 shares
        let decision = size_entry(25.0, 10_000.0, &config());
        assert_eq!(decision, SizingDecision::Sized { shares: 20 });
    }

    #[test]
    fn fractional_remainder_dropped() {
        // allocation = 500, price = 33 → floor(15.15) = 15 shares
        let decision = size_entry(33.0, 10_000.0, &config());
        assert_eq!(decision, SizingDecision::Sized { shares: 15 });
    }

    #[test]
    fn rejected_when_price_exceeds_allocation() {
        // allocation = 500, price = 600 → 0 shares
        let decision = size_entry(600.0, 10_000.0, &config());
        assert_eq!(decision, SizingDecision::Rejected);
    }

    #[test]
    fn rejected_when_balance_insufficient() {
        // 20 * 25 = 500 > 400 available
        let decision = size_entry(25.0, 400.0, &config());
        assert_eq!(decision, SizingDecision::Rejected);
    }

    #[test]
    fn cost_exactly_equal_balance_accepted() {
        let decision = size_entry(25.0, 500.0, &config());
        assert_eq!(decision, SizingDecision::Sized { shares: 20 });
    }

    #[test]
    fn allocation_uses_starting_cash_not_balance() {
        // Balance has grown past starting cash; the cap still binds at
        // starting_cash * fraction = 500.
        let decision = size_entry(25.0, 50_000.0, &config());
        assert_eq!(decision, SizingDecision::Sized { shares: 20 });
    }

    #[test]
    fn rejected_on_degenerate_price() {
        assert_eq!(size_entry(0.0, 10_000.0, &config()), SizingDecision::Rejected);
        assert_eq!(size_entry(-5.0, 10_000.0, &config()), SizingDecision::Rejected);
        assert_eq!(
            size_entry(f64::NAN, 10_000.0, &config()),
            SizingDecision::Rejected
        );
    }

    #[test]
    fn position_from_signal_carries_fields() {
        use crate::domain::signal::ENTRY_CONDITIONS;

        let signal = EntrySignal {
            ticker: "AAPL".into(),
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            price: 25.0,
            reasons: ENTRY_CONDITIONS.to_vec(),
        };
        let entry_date = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        let position = position_from_signal(&signal, 20, entry_date);

        assert_eq!(position.ticker, "AAPL");
        assert_eq!(position.shares, 20);
        assert_eq!(position.entry_date, entry_date);
        assert!((position.entry_price - 25.0).abs() < f64::EPSILON);
        assert_eq!(position.reason, signal.reason_line());
    }
}
