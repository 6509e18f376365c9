//! Request-scoped identity.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::auth::{sign_out, signed_in_user_id};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Identity, User};

use super::state::AppState;

/// The logged-in user, loaded fresh from the database for this request.
///
/// Extraction fails with [`LedgerError::Unauthenticated`] when the session
/// has no user id, or names a user that no longer exists. That error
/// renders as a redirect to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user record.
    pub user: User,
    /// The session the user was read from.
    pub session: Session,
}

impl CurrentUser {
    /// The identity to pass to access checks.
    pub fn identity(&self) -> Identity {
        self.user.identity()
    }
}

/// Loads the user named by `session`.
pub async fn load_current_user(state: &AppState, session: &Session) -> LedgerResult<User> {
    let Some(user_id) = signed_in_user_id(session).await? else {
        return Err(LedgerError::Unauthenticated);
    };

    match state.db().find_user(user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(user_id, "Session refers to a missing user; clearing it");
            sign_out(session).await?;
            Err(LedgerError::Unauthenticated)
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = LedgerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| LedgerError::Session {
                message: message.to_string(),
            })?;

        let user = load_current_user(state, &session).await?;
        Ok(Self { user, session })
    }
}
