//! Password hashing with bcrypt.

use crate::error::LedgerResult;

/// Hashes a password with the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> LedgerResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks a password against a stored bcrypt hash.
///
/// A malformed stored hash is an error rather than a mismatch.
pub fn verify_password(password: &str, hash: &str) -> LedgerResult<bool> {
    Ok(bcrypt::verify(password, hash)?)
}
