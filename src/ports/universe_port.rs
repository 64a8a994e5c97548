//! Ticker universe port trait.

use crate::domain::error::TraderError;

pub trait UniversePort {
    /// De-duplicated, normalized (uppercase, `.` replaced with `-`), sorted
    /// ticker symbols.
    fn fetch_symbols(&self) -> Result<Vec<String>, TraderError>;
}
