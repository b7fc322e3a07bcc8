//! Ledger Service
//!
//! A minimal concurrent account ledger: balances live in memory behind a
//! single read/write lock, operations arrive over a JSON HTTP API, and a
//! flat-file snapshot keeps balances across restarts.
//!
//! # Architecture
//!
//! - **Account Store**: one map-wide RwLock, no lost updates on
//!   concurrent balance mutation
//! - **Snapshot Codec**: `;`-delimited flat file, restored on startup and
//!   truncated after a successful load, rewritten every interval and once
//!   more at shutdown
//! - **Ledger Service**: validation, credential checks, and the
//!   two-phase transfer application
//! - **HTTP Adapter**: thin axum layer, JSON in and out
//!
//! # Invariants
//!
//! - At most one account per id; absence of the key is the only
//!   "does not exist"
//! - Balances are non-negative and quantized to two decimals through
//!   every public operation
//! - Mutations of one account never interleave their read-modify-write

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod http;
pub mod ledger;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-exports
pub use config::{Config, SnapshotConfig};
pub use error::{LedgerError, Result, TransferLeg};
pub use ledger::{run_snapshot_loop, Ledger};
pub use store::AccountStore;
pub use types::{Account, AccountId};
