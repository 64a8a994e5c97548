//! Plain-text report adapter for the notification sink.
//!
//! Writes the run summary to a file (or stdout when no path is configured).
//! Whatever relays the report onward (cron mail, a shell pipeline) is outside
//! the bot's concern; the scan only requires that delivery problems cannot
//! touch already-persisted ledger state.

use crate::domain::error::TraderError;
use crate::ports::notify_port::NotifyPort;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct TextReportAdapter {
    output_path: Option<PathBuf>,
}

impl TextReportAdapter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    fn render(subject: &str, body: &str) -> String {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("{} - {}\n\n{}", subject, stamp, body)
    }
}

impl NotifyPort for TextReportAdapter {
    fn send(&self, subject: &str, body: &str) -> Result<(), TraderError> {
        let report = Self::render(subject, body);

        match &self.output_path {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| TraderError::Notify {
                        reason: format!("failed to open {}: {}", path.display(), e),
                    })?;
                writeln!(file, "{}", report).map_err(|e| TraderError::Notify {
                    reason: format!("failed to write {}: {}", path.display(), e),
                })?;
            }
            None => println!("{}", report),
        }

        Ok(())
    }
}
