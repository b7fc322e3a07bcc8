//! Error types for the ledger service

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::AccountId;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Which half of a transfer failed to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLeg {
    /// The sender-side debit
    Debit,
    /// The receiver-side credit
    Credit,
}

impl std::fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferLeg::Debit => write!(f, "debit"),
            TransferLeg::Credit => write!(f, "credit"),
        }
    }
}

/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Account not found
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Transfer sender not found
    #[error("Sender not found: {0}")]
    SenderNotFound(AccountId),

    /// Transfer receiver not found
    #[error("Receiver not found: {0}")]
    ReceiverNotFound(AccountId),

    /// Account id already taken
    #[error("Account already exists: {0}")]
    AlreadyExists(AccountId),

    /// Credential mismatch
    #[error("Credential verification failed")]
    Unauthorized,

    /// Account id contains a snapshot delimiter character
    #[error("Invalid account id: {0}")]
    InvalidAccountId(AccountId),

    /// Amount fails non-negativity or two-decimal quantization
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Initial balance fails non-negativity or two-decimal quantization
    #[error("Invalid balance: {0}")]
    InvalidBalance(String),

    /// Credential hashing collaborator failure
    #[error("Credential hashing failed: {0}")]
    InvalidCredential(String),

    /// Sender balance does not cover the transfer amount
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount the transfer needs
        required: Decimal,
        /// Sender balance at the time of the check
        available: Decimal,
    },

    /// Balance adjustment left the representable decimal range
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Store adjustment failed after validation passed
    #[error("Transfer failed: {leg} adjustment did not apply")]
    TransferFailed {
        /// The half of the transfer that failed
        leg: TransferLeg,
    },

    /// Snapshot line failed to parse
    #[error("Malformed snapshot record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the snapshot file
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// Load or snapshot I/O failure
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Machine-readable error category, stable across message changes
    pub fn category(&self) -> &'static str {
        match self {
            LedgerError::NotFound(_)
            | LedgerError::SenderNotFound(_)
            | LedgerError::ReceiverNotFound(_) => "not_found",
            LedgerError::AlreadyExists(_) => "already_exists",
            LedgerError::Unauthorized => "unauthorized",
            LedgerError::InvalidAccountId(_) => "invalid_account_id",
            LedgerError::InvalidAmount(_) => "invalid_amount",
            LedgerError::InvalidBalance(_) => "invalid_balance",
            LedgerError::InvalidCredential(_) => "invalid_credential",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::BalanceOverflow => "balance_overflow",
            LedgerError::TransferFailed { .. } => "transfer_failed",
            LedgerError::MalformedRecord { .. } => "malformed_record",
            LedgerError::StorageUnavailable(_) => "storage_unavailable",
            LedgerError::Config(_) => "configuration",
        }
    }
}
