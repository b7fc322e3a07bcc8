//! Ledger service orchestration
//!
//! Owns the account store and the snapshot file, and drives the process
//! lifecycle: restore on startup, periodic snapshots while serving, one
//! final snapshot at shutdown. Every public operation validates its
//! inputs before touching the store and returns a typed error.

use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::crypto;
use crate::error::{LedgerError, Result, TransferLeg};
use crate::snapshot::{self, SnapshotFile};
use crate::store::AccountStore;
use crate::types::{self, Account, AccountId};

/// The ledger service
#[derive(Debug)]
pub struct Ledger {
    store: AccountStore,
    snapshot_file: SnapshotFile,
    config: Config,
}

impl Ledger {
    /// Open the ledger: restore the snapshot file into memory, then
    /// truncate it
    ///
    /// Restore goes through one `create` per record, so a duplicate id
    /// inside the file fails startup the same way a malformed record or
    /// an out-of-domain balance does: the service never begins serving
    /// from a partially-loaded or corrupted store. After a successful
    /// restore the file is truncated; on disk it holds either the last
    /// written snapshot or nothing, never a stale copy that a later
    /// restart could apply twice. A zero snapshot interval is a
    /// configuration error, rejected before the file is touched.
    pub fn open(config: Config) -> Result<Self> {
        if config.snapshot.interval_secs == 0 {
            return Err(LedgerError::Config(
                "snapshot interval must be at least 1 second".to_string(),
            ));
        }

        let snapshot_file = SnapshotFile::new(config.snapshot.path.clone());
        let store = AccountStore::new();

        let restored = snapshot_file.load()?;
        let count = restored.len();
        for account in restored {
            store.create(account)?;
        }
        snapshot_file.truncate()?;

        info!(
            path = %config.snapshot.path.display(),
            accounts = count,
            "Ledger restored from snapshot"
        );

        Ok(Self {
            store,
            snapshot_file,
            config,
        })
    }

    /// Look up an account's balance after verifying the credential
    ///
    /// The lookup runs first: an absent id is `NotFound` even when the
    /// credential would not have matched anything.
    pub fn query_balance(&self, id: &AccountId, credential: &str) -> Result<Decimal> {
        let account = self.store.get(id)?;
        if !crypto::verify_credential(credential, &account.credential_hash) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(account.balance)
    }

    /// Create a new account with a hashed credential
    ///
    /// The id must survive the snapshot format unescaped, so one
    /// containing the field separator or a newline is rejected before
    /// anything is stored.
    pub fn create_account(
        &self,
        id: AccountId,
        credential: &str,
        initial_balance: Decimal,
    ) -> Result<()> {
        if !snapshot::is_encodable_id(id.as_str()) {
            return Err(LedgerError::InvalidAccountId(id));
        }
        if !types::is_valid_amount(initial_balance) {
            return Err(LedgerError::InvalidBalance(initial_balance.to_string()));
        }

        let credential_hash = crypto::hash_credential(credential)?;
        self.store
            .create(Account::new(id.clone(), credential_hash, initial_balance))?;

        info!(account = %id, balance = %initial_balance, "Account created");
        Ok(())
    }

    /// Move `amount` from sender to receiver
    ///
    /// Validation order: amount shape, sender exists, receiver exists,
    /// credential matches the sender, sender balance covers the amount.
    /// The funds check is check-then-act: it reads the sender balance
    /// before the debit rather than atomically with it, so two racing
    /// transfers can both pass it.
    pub fn transfer(
        &self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: Decimal,
        credential: &str,
    ) -> Result<()> {
        if !types::is_valid_amount(amount) {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }

        let sender = self
            .store
            .get(sender_id)
            .map_err(|_| LedgerError::SenderNotFound(sender_id.clone()))?;
        self.store
            .get(receiver_id)
            .map_err(|_| LedgerError::ReceiverNotFound(receiver_id.clone()))?;

        if !crypto::verify_credential(credential, &sender.credential_hash) {
            return Err(LedgerError::Unauthorized);
        }

        if sender.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: sender.balance,
            });
        }

        match self.apply_transfer(sender_id, receiver_id, amount) {
            Ok(()) => {
                info!(
                    sender = %sender_id,
                    receiver = %receiver_id,
                    amount = %amount,
                    "Transfer applied"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    sender = %sender_id,
                    receiver = %receiver_id,
                    amount = %amount,
                    "Transfer did not fully apply: {err}"
                );
                Err(err)
            }
        }
    }

    /// Apply the two halves of a transfer as independent store mutations
    ///
    /// Debit first, then credit. The two adjustments are not one atomic
    /// transaction: when the credit fails (the receiver vanished between
    /// validation and here), the debit has already happened and is not
    /// rolled back. The returned error names the leg that failed.
    fn apply_transfer(
        &self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: Decimal,
    ) -> Result<()> {
        self.store
            .adjust_balance(sender_id, -amount)
            .map_err(|_| LedgerError::TransferFailed {
                leg: TransferLeg::Debit,
            })?;
        self.store
            .adjust_balance(receiver_id, amount)
            .map_err(|_| LedgerError::TransferFailed {
                leg: TransferLeg::Credit,
            })?;
        Ok(())
    }

    /// Write one full snapshot of the store to the file
    ///
    /// The account copy is taken under the store's shared lock; encoding
    /// and file I/O run after the lock is released, so every written
    /// snapshot is internally consistent and writers are blocked only
    /// while the in-memory copy is made. Returns the record count.
    pub fn snapshot_now(&self) -> Result<usize> {
        let accounts = self.store.snapshot_accounts();
        self.snapshot_file.write(&accounts)?;
        Ok(accounts.len())
    }

    /// Number of accounts currently in the store
    pub fn account_count(&self) -> usize {
        self.store.len()
    }

    /// Interval between periodic snapshots
    pub fn snapshot_interval(&self) -> Duration {
        self.config.snapshot_interval()
    }
}

/// Periodic snapshot task
///
/// Ticks every snapshot interval, starting one full interval after
/// spawn, and exits when the shutdown flag flips. A failed snapshot is
/// logged and the next tick retries from scratch; only shutdown stops
/// the loop. The spawner joins the task handle before writing the final
/// snapshot, so an in-progress snapshot always completes first.
pub async fn run_snapshot_loop(ledger: Arc<Ledger>, mut shutdown: watch::Receiver<bool>) {
    let period = ledger.snapshot_interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match ledger.snapshot_now() {
                    Ok(count) => info!(accounts = count, "Periodic snapshot written"),
                    Err(err) => error!("Periodic snapshot failed: {err}"),
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
