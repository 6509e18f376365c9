use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::api::request::LoginForm;
use crate::api::state::AppState;
use crate::auth::{authenticate, sign_in, sign_out, signed_in_user_id, take_flashes};
use crate::error::{LedgerError, LedgerResult};
use crate::render::html::{self, PageContext};

/// GET /login
pub(super) async fn login_page(session: Session) -> LedgerResult<Response> {
    if signed_in_user_id(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let flashes = take_flashes(&session).await?;
    let ctx = PageContext {
        viewer: None,
        flashes: &flashes,
    };
    Ok(Html(html::login_page(&ctx, None)).into_response())
}

/// POST /login
///
/// Bad credentials re-render the form with 401 and leave the session
/// anonymous.
pub(super) async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> LedgerResult<Response> {
    match authenticate(state.db(), &form.email, &form.password).await {
        Ok(user) => {
            sign_in(&session, &user).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(LedgerError::InvalidCredentials) => {
            let ctx = PageContext {
                viewer: None,
                flashes: &[],
            };
            let message = LedgerError::InvalidCredentials.to_string();
            let page = html::login_page(&ctx, Some(message.as_str()));
            Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response())
        }
        Err(err) => Err(err),
    }
}

/// GET /logout
pub(super) async fn logout(session: Session) -> LedgerResult<Redirect> {
    if let Some(user_id) = signed_in_user_id(&session).await? {
        tracing::info!(user_id, "Logged out");
    }
    sign_out(&session).await?;
    Ok(Redirect::to("/login"))
}
