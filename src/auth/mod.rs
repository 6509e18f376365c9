//! Authentication: credential checks, password hashing and session state.

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{
    FLASH_KEY, USER_ID_KEY, push_flash, sign_in, sign_out, signed_in_user_id, take_flashes,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, normalize_email};
use crate::store::Database;

/// Verifies an email/password pair and returns the matching user.
///
/// Unknown emails and wrong passwords both yield
/// [`LedgerError::InvalidCredentials`], so callers cannot tell them apart.
pub async fn authenticate(db: &Database, email: &str, password: &str) -> LedgerResult<User> {
    let email = normalize_email(email);
    let Some(user) = db.find_user_by_email(&email).await? else {
        tracing::info!(email = %email, "Login failed: unknown email");
        return Err(LedgerError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(LedgerError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");
    Ok(user)
}
