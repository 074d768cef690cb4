//! Error types for token ledger operations.

use crate::{Address, Amount};
use thiserror::Error;

/// Main error type for token ledger operations.
///
/// Every operation checks its preconditions before touching state, so a
/// returned error guarantees the ledger is exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Sender balance too low for the requested transfer.
    #[error("Insufficient balance: sender {sender} has {balance}, needs {needed}")]
    InsufficientBalance {
        sender: Address,
        balance: Amount,
        needed: Amount,
    },

    /// Transfer from the null address.
    #[error("Invalid sender: {sender}")]
    InvalidSender { sender: Address },

    /// Transfer to the null address.
    #[error("Invalid receiver: {receiver}")]
    InvalidReceiver { receiver: Address },

    /// Spender allowance too low for the requested delegated transfer.
    #[error("Insufficient allowance: spender {spender} has {allowance}, needs {needed}")]
    InsufficientAllowance {
        spender: Address,
        allowance: Amount,
        needed: Amount,
    },

    /// Approval granted by the null address.
    #[error("Invalid approver: {approver}")]
    InvalidApprover { approver: Address },

    /// Approval granted to the null address.
    #[error("Invalid spender: {spender}")]
    InvalidSpender { spender: Address },

    /// Crediting an account would overflow its balance.
    #[error("Balance overflow crediting {account}")]
    BalanceOverflow { account: Address },

    /// Configuration error at ledger construction.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl TokenError {
    /// Get the stable error code for this error.
    ///
    /// Operation errors carry the ERC-6093 selector names so external
    /// tooling can match on them.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InsufficientBalance { .. } => "ERC20InsufficientBalance",
            TokenError::InvalidSender { .. } => "ERC20InvalidSender",
            TokenError::InvalidReceiver { .. } => "ERC20InvalidReceiver",
            TokenError::InsufficientAllowance { .. } => "ERC20InsufficientAllowance",
            TokenError::InvalidApprover { .. } => "ERC20InvalidApprover",
            TokenError::InvalidSpender { .. } => "ERC20InvalidSpender",
            TokenError::BalanceOverflow { .. } => "BALANCE_OVERFLOW",
            TokenError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type alias for token ledger operations.
pub type Result<T> = std::result::Result<T, TokenError>;
