//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Snapshot round-trip: decode(encode(S)) == S as a set of accounts
//! - Minimal-digit balance encoding (no trailing zeros, no exponent)
//! - Two-decimal quantization of every accepted amount
//! - Money conservation under paired debit+credit application

use ledger_service::snapshot::{decode, encode};
use ledger_service::types::is_valid_amount;
use ledger_service::{Account, AccountId, AccountStore};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating account ids
fn account_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

/// Strategy for credential-hash-shaped opaque strings (never contain the
/// record delimiter)
fn credential_hash_strategy() -> impl Strategy<Value = String> {
    "\\$argon2id\\$v=19\\$[A-Za-z0-9+/]{16,32}"
}

/// Strategy for two-decimal balances as cents
fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..1_000_000_00u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Strategy for whole stores: unique ids mapped to hash and balance
fn accounts_strategy() -> impl Strategy<Value = Vec<Account>> {
    prop::collection::hash_map(
        account_id_strategy(),
        (credential_hash_strategy(), balance_strategy()),
        0..40,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, (hash, balance))| Account::new(AccountId::new(id), hash, balance))
            .collect()
    })
}

fn sorted_by_id(mut accounts: Vec<Account>) -> Vec<Account> {
    accounts.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    accounts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: creating an account and reading it back returns the
    /// exact record
    #[test]
    fn prop_create_then_get_returns_exact_record(
        id in account_id_strategy(),
        hash in credential_hash_strategy(),
        balance in balance_strategy(),
    ) {
        let store = AccountStore::new();
        store
            .create(Account::new(AccountId::new(id.clone()), hash.clone(), balance))
            .unwrap();

        let account = store.get(&AccountId::new(id)).unwrap();
        prop_assert_eq!(account.balance, balance);
        prop_assert_eq!(account.credential_hash, hash);
    }

    /// Property: any store built through create calls round-trips
    /// through the snapshot format as a set
    #[test]
    fn prop_snapshot_roundtrip_preserves_account_set(accounts in accounts_strategy()) {
        let store = AccountStore::new();
        for account in &accounts {
            store.create(account.clone()).unwrap();
        }

        let mut buf = Vec::new();
        encode(&mut buf, &store.snapshot_accounts()).unwrap();
        let decoded = decode(buf.as_slice()).unwrap();

        prop_assert_eq!(sorted_by_id(decoded), sorted_by_id(accounts));
    }

    /// Property: encoded balances carry no trailing zeros and no
    /// exponent, and still decode to the same value
    #[test]
    fn prop_encoded_balance_is_minimal(cents in 0u64..100_000_000u64) {
        let balance = Decimal::new(cents as i64, 2);
        let account = Account::new(AccountId::new("sample"), "h", balance);

        let mut buf = Vec::new();
        encode(&mut buf, std::slice::from_ref(&account)).unwrap();
        let line = String::from_utf8(buf).unwrap();
        let field = line.trim_end().rsplit(';').next().unwrap().to_string();

        prop_assert!(!field.contains('e') && !field.contains('E'));
        if field.contains('.') {
            prop_assert!(!field.ends_with('0'));
            prop_assert!(!field.ends_with('.'));
        }

        let decoded = decode(line.as_bytes()).unwrap();
        prop_assert_eq!(decoded[0].balance, balance);
    }

    /// Property: any value with a nonzero sub-cent digit is rejected
    #[test]
    fn prop_sub_cent_amounts_rejected(units in 0i64..1_000, millis in 1i64..10) {
        let value = Decimal::new(units * 1000 + millis, 3);
        prop_assert!(!is_valid_amount(value));
    }

    /// Property: two-decimal non-negative values are always accepted
    #[test]
    fn prop_cent_amounts_accepted(cents in 0i64..1_000_000_00) {
        prop_assert!(is_valid_amount(Decimal::new(cents, 2)));
    }

    /// Property: paired debit+credit application conserves the total
    /// balance across the store
    #[test]
    fn prop_paired_adjustments_conserve_total(
        transfers in prop::collection::vec((0usize..4, 0usize..4, 1u64..100_00u64), 1..50)
    ) {
        let store = AccountStore::new();
        for i in 0..4 {
            store
                .create(Account::new(
                    AccountId::new(format!("acct{i}")),
                    "h",
                    Decimal::new(1_000_00, 2),
                ))
                .unwrap();
        }
        let initial: Decimal = store.snapshot_accounts().iter().map(|a| a.balance).sum();

        for (from, to, cents) in transfers {
            if from == to {
                continue;
            }
            let amount = Decimal::new(cents as i64, 2);
            store
                .adjust_balance(&AccountId::new(format!("acct{from}")), -amount)
                .unwrap();
            store
                .adjust_balance(&AccountId::new(format!("acct{to}")), amount)
                .unwrap();
        }

        let total: Decimal = store.snapshot_accounts().iter().map(|a| a.balance).sum();
        prop_assert_eq!(total, initial);
    }
}
