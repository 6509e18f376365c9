//! Session-backed login state and flash messages.
//!
//! Only the user id is kept in the session; role and rates are re-read from
//! the database on every request so admin changes apply immediately.

use tower_sessions::Session;

use crate::error::LedgerResult;
use crate::models::User;

/// Session key holding the logged-in user's id.
pub const USER_ID_KEY: &str = "user_id";

/// Session key holding pending flash messages.
pub const FLASH_KEY: &str = "flash";

/// Marks the session as logged in as `user`.
///
/// The session id is rotated first so a pre-login id cannot be reused.
pub async fn sign_in(session: &Session, user: &User) -> LedgerResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    Ok(())
}

/// Clears all session state.
pub async fn sign_out(session: &Session) -> LedgerResult<()> {
    session.flush().await?;
    Ok(())
}

/// Returns the logged-in user id, if any.
pub async fn signed_in_user_id(session: &Session) -> LedgerResult<Option<i64>> {
    Ok(session.get::<i64>(USER_ID_KEY).await?)
}

/// Queues a message to show on the next rendered page.
pub async fn push_flash(session: &Session, message: impl Into<String>) -> LedgerResult<()> {
    let mut messages: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(message.into());
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// Removes and returns all queued flash messages.
pub async fn take_flashes(session: &Session) -> LedgerResult<Vec<String>> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
