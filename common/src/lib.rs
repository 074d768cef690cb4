//! Tokenbook Common Types
//!
//! This crate contains shared types used across the Tokenbook ledger,
//! including account addresses, fixed-point amounts, and error definitions.

pub mod address;
pub mod amount;
pub mod error;

pub use address::*;
pub use amount::*;
pub use error::*;
