//! CSV-backed market data adapter.
//!
//! Reads daily bars from `{TICKER}.csv` files in a data directory, columns
//! `date,open,high,low,close,volume` with `YYYY-MM-DD` dates. A missing file
//! is an unavailable series (empty result), not an error.

use crate::domain::error::TraderError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, TraderError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| TraderError::Storage {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TraderError::Storage {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        lookback_days: usize,
    ) -> Result<Vec<PriceBar>, TraderError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| TraderError::Storage {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TraderError::Storage {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TraderError::Storage {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TraderError::Storage {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            bars.push(PriceBar {
                ticker: ticker.to_string(),
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);

        if bars.len() > lookback_days {
            bars.drain(..bars.len() - lookback_days);
        }

        Ok(bars)
    }
}
