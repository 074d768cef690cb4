//! Tokenbook Ledger Engine
//!
//! In-memory fungible token ledger with balance and allowance accounting,
//! atomic transfer operations, and an append-only event journal.

pub mod config;
pub mod events;
pub mod ledger;

pub use config::TokenConfig;
pub use events::{EventId, EventJournal, EventRecord, TokenEvent};
pub use ledger::{TokenLedger, TransferReceipt};
