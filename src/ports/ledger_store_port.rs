//! Ledger persistence port trait.
//!
//! Open positions are read in full at run start and rewritten in full at run
//! end; buys are additionally appended as they happen. Exit history is
//! append-only and never rewritten.

use crate::domain::error::TraderError;
use crate::domain::position::{ExitRecord, Position};

pub trait LedgerStorePort {
    fn load_positions(&self) -> Result<Vec<Position>, TraderError>;

    fn append_position(&self, position: &Position) -> Result<(), TraderError>;

    /// Replace the whole persisted snapshot.
    fn save_positions(&self, positions: &[Position]) -> Result<(), TraderError>;

    fn append_exit(&self, record: &ExitRecord) -> Result<(), TraderError>;
}
