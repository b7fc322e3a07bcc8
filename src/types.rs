//! Core types for the ledger service
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money, never floats)
//! - Two-decimal quantization (currency minor units)
//! - Memory safety (no unsafe code)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier, assigned by the creator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ledger participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier within the store
    pub id: AccountId,

    /// Opaque credential hash; the ledger only hands it to the verifier
    pub credential_hash: String,

    /// Current balance, non-negative and quantized to two decimals
    pub balance: Decimal,
}

impl Account {
    /// Create a new account record
    pub fn new(id: AccountId, credential_hash: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id,
            credential_hash: credential_hash.into(),
            balance,
        }
    }
}

/// True if the value, rounded to two fractional digits, equals itself
pub fn is_quantized(value: Decimal) -> bool {
    value.round_dp(2) == value
}

/// True if the value is usable as an amount or balance: non-negative
/// and quantized to two decimals
pub fn is_valid_amount(value: Decimal) -> bool {
    value >= Decimal::ZERO && is_quantized(value)
}

/// Format a balance or amount with exactly two decimal places
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}
