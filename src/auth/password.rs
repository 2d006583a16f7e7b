use crate::error::AppError;
use bcrypt::{hash, verify};
use lazy_static::lazy_static;

/// bcrypt work factor for stored password hashes.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

lazy_static! {
    // Hash of a throwaway secret, same cost as stored hashes.
    static ref UNKNOWN_ACCOUNT_HASH: String =
        hash("no-such-account", HASH_COST).unwrap_or_default();
}

/// Runs a full bcrypt verification for a login whose account does not exist.
///
/// Keeps the unknown-email path as slow as the wrong-password path. Always false.
pub fn verify_unknown_account(password: &str) -> bool {
    let _ = verify(password, UNKNOWN_ACCOUNT_HASH.as_str());
    false
}
