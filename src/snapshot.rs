//! Flat-file snapshot format
//!
//! The durable representation of the store: UTF-8 text, one record per
//! line, fields `id;credentialHash;balance` separated by `;`. Balances
//! are written with the minimal digits that represent the value exactly
//! (no trailing zeros, no exponent). Decoding is all-or-nothing: any
//! malformed line fails the whole load.

use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::types::{is_valid_amount, Account, AccountId};

/// Field separator within a snapshot record
pub const FIELD_SEPARATOR: char = ';';

const FIELDS_PER_RECORD: usize = 3;

/// True if an id survives a snapshot round trip unchanged
///
/// The format has no escaping, so an id carrying the field separator
/// or a newline would corrupt its record.
pub fn is_encodable_id(id: &str) -> bool {
    !id.contains(FIELD_SEPARATOR) && !id.contains('\n')
}

/// Encode accounts into the snapshot format, one record per line
///
/// Records are emitted in the order given, which follows the store's
/// iteration order and is not stable across snapshots.
pub fn encode<W: Write>(writer: &mut W, accounts: &[Account]) -> Result<()> {
    for account in accounts {
        writeln!(
            writer,
            "{id}{sep}{hash}{sep}{balance}",
            id = account.id,
            hash = account.credential_hash,
            balance = account.balance.normalize(),
            sep = FIELD_SEPARATOR,
        )?;
    }
    Ok(())
}

/// Decode a full snapshot
///
/// Blank lines are skipped. A line with the wrong field count, an
/// unparseable balance, or a balance that is negative or finer than
/// cents fails the whole decode; no partial result is ever returned.
pub fn decode<R: BufRead>(reader: R) -> Result<Vec<Account>> {
    let mut accounts = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELDS_PER_RECORD {
            return Err(LedgerError::MalformedRecord {
                line: index + 1,
                reason: format!("expected {} fields, got {}", FIELDS_PER_RECORD, fields.len()),
            });
        }

        let balance: Decimal = fields[2].parse().map_err(|_| LedgerError::MalformedRecord {
            line: index + 1,
            reason: format!("balance {:?} is not a decimal number", fields[2]),
        })?;
        if !is_valid_amount(balance) {
            return Err(LedgerError::MalformedRecord {
                line: index + 1,
                reason: format!("balance {balance} is negative or finer than cents"),
            });
        }

        accounts.push(Account::new(AccountId::new(fields[0]), fields[1], balance));
    }
    Ok(accounts)
}

/// The snapshot file on disk
///
/// At most one writer touches the file at a time (the periodic snapshot
/// task and the final shutdown snapshot never overlap); nothing locks the
/// file against external readers.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Wrap a snapshot file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the whole file
    ///
    /// A missing file is the fresh-start state and decodes to no
    /// accounts; every other I/O failure propagates.
    pub fn load(&self) -> Result<Vec<Account>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        decode(BufReader::new(file))
    }

    /// Truncate the file to empty, creating it if missing
    pub fn truncate(&self) -> Result<()> {
        self.ensure_parent()?;
        File::create(&self.path)?;
        Ok(())
    }

    /// Replace the file contents with the given accounts and sync to disk
    ///
    /// The file is the sole durability mechanism, so the write is not
    /// complete until `sync_all` returns.
    pub fn write(&self, accounts: &[Account]) -> Result<()> {
        self.ensure_parent()?;
        let mut file = File::create(&self.path)?;
        {
            let mut writer = BufWriter::new(&mut file);
            encode(&mut writer, accounts)?;
            writer.flush()?;
        }
        file.sync_all()?;
        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
