use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};

use crate::access::{Resource, require};
use crate::api::extract::CurrentUser;
use crate::api::request::{CreateUserForm, UpdateUserForm};
use crate::api::state::AppState;
use crate::auth::{push_flash, take_flashes};
use crate::error::{LedgerError, LedgerResult};
use crate::models::UserRates;
use crate::render::html::{self, PageContext};

/// Sends a bad form back to the users page with the reason as a flash.
/// Other errors propagate.
async fn rejected(current: &CurrentUser, action: &str, err: LedgerError) -> LedgerResult<Redirect> {
    match err {
        LedgerError::DuplicateEmail { .. } | LedgerError::Validation { .. } => {
            tracing::warn!(admin_id = current.user.id, error = %err, "{}", action);
            push_flash(&current.session, err.to_string()).await?;
            Ok(Redirect::to("/admin/users"))
        }
        other => Err(other),
    }
}

/// GET /admin/users
pub(super) async fn users_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> LedgerResult<Html<String>> {
    require(&current.identity(), Resource::UserDirectory)?;

    let users = state.db().list_users().await?;
    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };
    Ok(Html(html::admin_users_page(&ctx, &users)))
}

/// POST /admin/users
pub(super) async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<CreateUserForm>,
) -> LedgerResult<Redirect> {
    require(&current.identity(), Resource::UserDirectory)?;

    let created = match form.into_new_user(state.config().security.bcrypt_cost) {
        Ok(new_user) => state.db().create_user(&new_user).await,
        Err(err) => Err(err),
    };
    let user = match created {
        Ok(user) => user,
        Err(err) => return rejected(&current, "User not created", err).await,
    };

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = current.user.id,
        "User created"
    );
    push_flash(&current.session, format!("Created user {}.", user.name)).await?;
    Ok(Redirect::to("/admin/users"))
}

/// POST /admin/users/:id
pub(super) async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<UpdateUserForm>,
) -> LedgerResult<Redirect> {
    require(&current.identity(), Resource::UserDirectory)?;

    let updated = match UserRates::try_from(form) {
        Ok(rates) => state.db().update_user_rates(id, &rates).await,
        Err(err) => Err(err),
    };
    let user = match updated {
        Ok(user) => user,
        Err(err) => return rejected(&current, "User not updated", err).await,
    };

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        price_per_pkg = %user.price_per_pkg,
        super_rate = %user.super_rate,
        updated_by = current.user.id,
        "User rates updated"
    );
    push_flash(&current.session, format!("Updated {}.", user.name)).await?;
    Ok(Redirect::to("/admin/users"))
}
