//! Credential hashing and verification
//!
//! The ledger treats credentials as opaque: accounts store only the PHC
//! string produced here, and verification is the only operation that ever
//! looks inside it. PHC strings contain no `;` or newline, so stored
//! hashes are always safe inside snapshot records.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::{LedgerError, Result};

/// Hash a credential with a fresh random salt
pub fn hash_credential(credential: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(credential.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerError::InvalidCredential(e.to_string()))
}

/// Verify a credential against a stored hash
///
/// An unparseable hash counts as a mismatch, not an error: the caller
/// only ever needs "does this credential open this account".
pub fn verify_credential(credential: &str, credential_hash: &str) -> bool {
    match PasswordHash::new(credential_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(credential.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_credential("hunter2").unwrap();
        assert!(verify_credential("hunter2", &hash));
        assert!(!verify_credential("hunter3", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_credential("same-secret").unwrap();
        let second = hash_credential("same-secret").unwrap();
        assert_ne!(first, second);
        assert!(verify_credential("same-secret", &first));
        assert!(verify_credential("same-secret", &second));
    }

    #[test]
    fn test_garbage_hash_is_mismatch() {
        assert!(!verify_credential("anything", "not-a-phc-string"));
        assert!(!verify_credential("anything", ""));
    }

    #[test]
    fn test_hash_has_no_record_delimiters() {
        let hash = hash_credential("secret").unwrap();
        assert!(!hash.contains(';'));
        assert!(!hash.contains('\n'));
    }
}
