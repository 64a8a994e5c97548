//! Port traits decoupling the domain from external collaborators.

pub mod config_port;
pub mod data_port;
pub mod ledger_store_port;
pub mod notify_port;
pub mod universe_port;
