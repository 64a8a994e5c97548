//! Market data access port trait.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::PriceBar;

pub trait MarketDataPort {
    /// Chronological daily bars covering at most the trailing `lookback_days`
    /// trading days. An empty vec means the series is unavailable; callers
    /// treat that as skip-this-ticker, never as fatal.
    fn fetch_daily(&self, ticker: &str, lookback_days: usize)
        -> Result<Vec<PriceBar>, TraderError>;
}
