//! Notification sink port trait.
//!
//! Delivery transport is an external collaborator; the core only hands over a
//! subject and a rendered summary. A failed delivery must never corrupt
//! already-persisted ledger state, so callers send strictly after persistence
//! and downgrade errors to warnings.

use crate::domain::error::TraderError;

pub trait NotifyPort {
    fn send(&self, subject: &str, body: &str) -> Result<(), TraderError>;
}
