//! In-memory account store
//!
//! A thread-safe mapping from account id to account record. One map-wide
//! read/write lock serializes all mutations: readers share the lock,
//! writers hold it exclusively, so no read-modify-write on a balance can
//! interleave with another mutation. Absence of a key is the only
//! representation of "account does not exist".

use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{LedgerError, Result};
use crate::types::{Account, AccountId};

/// Thread-safe id-to-account mapping
#[derive(Debug)]
pub struct AccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an account by id
    pub fn get(&self, id: &AccountId) -> Result<Account> {
        self.accounts
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(id.clone()))
    }

    /// Insert a new account; fails if the id is already present
    pub fn create(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write();
        match accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists(account.id)),
            Entry::Vacant(vacant) => {
                vacant.insert(account);
                Ok(())
            }
        }
    }

    /// Remove an account; fails if absent
    pub fn delete(&self, id: &AccountId) -> Result<()> {
        match self.accounts.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(LedgerError::NotFound(id.clone())),
        }
    }

    /// Add `delta` (which may be negative) to an account's balance as one
    /// atomic step, returning the new balance
    ///
    /// The store does not enforce that the result stays non-negative;
    /// that check belongs to the caller and runs before this. An
    /// adjustment that would leave the decimal range fails with
    /// `BalanceOverflow` and leaves the balance unchanged.
    pub fn adjust_balance(&self, id: &AccountId, delta: Decimal) -> Result<Decimal> {
        let mut accounts = self.accounts.write();
        match accounts.get_mut(id) {
            Some(account) => {
                account.balance = account
                    .balance
                    .checked_add(delta)
                    .ok_or(LedgerError::BalanceOverflow)?;
                Ok(account.balance)
            }
            None => Err(LedgerError::NotFound(id.clone())),
        }
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// True if the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Point-in-time copy of every account, taken under the shared lock
    ///
    /// Iteration order is the map's and is not stable across calls.
    pub fn snapshot_accounts(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
