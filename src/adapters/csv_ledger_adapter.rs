//! CSV ledger persistence adapter.
//!
//! Open positions live in a buys file (`ticker,price,entry,reason,shares`)
//! that is read in full at run start and rewritten in full at run end, with
//! per-buy appends in between. Exit history goes to an append-only exits file
//! (`ticker,price,exit,reason`). Dates are `YYYY-MM-DD`.

use crate::domain::error::TraderError;
use crate::domain::position::{ExitRecord, Position};
use crate::ports::ledger_store_port::LedgerStorePort;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::PathBuf;

const BUYS_HEADER: [&str; 5] = ["ticker", "price", "entry", "reason", "shares"];
const EXITS_HEADER: [&str; 4] = ["ticker", "price", "exit", "reason"];
const DATE_FMT: &str = "%Y-%m-%d";

pub struct CsvLedgerAdapter {
    buys_path: PathBuf,
    exits_path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(buys_path: PathBuf, exits_path: PathBuf) -> Self {
        Self {
            buys_path,
            exits_path,
        }
    }

    fn storage_err(context: &str, e: impl std::fmt::Display) -> TraderError {
        TraderError::Storage {
            reason: format!("{}: {}", context, e),
        }
    }

    fn append_row(path: &PathBuf, header: &[&str], row: &[String]) -> Result<(), TraderError> {
        let new_file = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Self::storage_err(&format!("failed to open {}", path.display()), e))?;

        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if new_file {
            wtr.write_record(header)
                .map_err(|e| Self::storage_err("failed to write header", e))?;
        }
        wtr.write_record(row)
            .map_err(|e| Self::storage_err("failed to write row", e))?;
        wtr.flush()
            .map_err(|e| Self::storage_err("failed to flush", e))?;
        Ok(())
    }
}

impl LedgerStorePort for CsvLedgerAdapter {
    fn load_positions(&self) -> Result<Vec<Position>, TraderError> {
        if !self.buys_path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&self.buys_path).map_err(|e| {
            Self::storage_err(&format!("failed to read {}", self.buys_path.display()), e)
        })?;

        let mut positions = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| Self::storage_err("ledger parse error", e))?;

            let field = |i: usize, name: &str| -> Result<String, TraderError> {
                record
                    .get(i)
                    .map(str::to_string)
                    .ok_or_else(|| TraderError::Storage {
                        reason: format!("missing {} column in ledger", name),
                    })
            };

            let ticker = field(0, "ticker")?;
            let price: f64 = field(1, "price")?
                .parse()
                .map_err(|e| Self::storage_err("invalid price in ledger", e))?;
            let entry = NaiveDate::parse_from_str(&field(2, "entry")?, DATE_FMT)
                .map_err(|e| Self::storage_err("invalid entry date in ledger", e))?;
            let reason = field(3, "reason")?;
            let shares: i64 = field(4, "shares")?
                .parse()
                .map_err(|e| Self::storage_err("invalid shares in ledger", e))?;

            positions.push(Position {
                ticker,
                entry_price: price,
                entry_date: entry,
                reason,
                shares,
            });
        }

        Ok(positions)
    }

    fn append_position(&self, position: &Position) -> Result<(), TraderError> {
        let row = vec![
            position.ticker.clone(),
            format!("{}", position.entry_price),
            position.entry_date.format(DATE_FMT).to_string(),
            position.reason.clone(),
            position.shares.to_string(),
        ];
        Self::append_row(&self.buys_path, &BUYS_HEADER, &row)
    }

    fn save_positions(&self, positions: &[Position]) -> Result<(), TraderError> {
        let mut wtr = csv::Writer::from_path(&self.buys_path).map_err(|e| {
            Self::storage_err(&format!("failed to write {}", self.buys_path.display()), e)
        })?;

        wtr.write_record(BUYS_HEADER)
            .map_err(|e| Self::storage_err("failed to write header", e))?;

        for position in positions {
            let row = [
                position.ticker.clone(),
                format!("{}", position.entry_price),
                position.entry_date.format(DATE_FMT).to_string(),
                position.reason.clone(),
                position.shares.to_string(),
            ];
            wtr.write_record(&row)
                .map_err(|e| Self::storage_err("failed to write row", e))?;
        }

        wtr.flush()
            .map_err(|e| Self::storage_err("failed to flush", e))?;
        Ok(())
    }

    fn append_exit(&self, record: &ExitRecord) -> Result<(), TraderError> {
        let row = vec![
            record.ticker.clone(),
            format!("{}", record.exit_price),
            record.exit_date.format(DATE_FMT).to_string(),
            record.reason.clone(),
        ];
        Self::append_row(&self.exits_path, &EXITS_HEADER, &row)
    }
}
