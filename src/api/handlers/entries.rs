use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};
use chrono::Local;

use crate::access::{Resource, require};
use crate::api::extract::CurrentUser;
use crate::api::request::{CommentForm, EntryForm};
use crate::api::state::AppState;
use crate::auth::{push_flash, take_flashes};
use crate::error::LedgerResult;
use crate::render::html::{self, PageContext};

/// GET /entry/new
pub(super) async fn new_entry_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> LedgerResult<Html<String>> {
    let workers = if current.user.is_admin() {
        Some(state.db().list_users().await?)
    } else {
        None
    };

    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };
    let today = Local::now().date_naive();
    Ok(Html(html::entry_form(&ctx, None, today, workers.as_deref())))
}

/// POST /entry/new
///
/// The entry belongs to the caller unless an admin picks another worker.
pub(super) async fn create_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<EntryForm>,
) -> LedgerResult<Redirect> {
    let identity = current.identity();
    let owner_id = form.target_user()?.unwrap_or(identity.user_id);
    require(&identity, Resource::Entry { owner_id })?;
    if owner_id != identity.user_id {
        state.db().get_user(owner_id).await?;
    }

    let fields = form.fields(Local::now().date_naive())?;
    let entry = state.db().create_entry(owner_id, &fields).await?;

    tracing::info!(
        entry_id = entry.id,
        owner_id,
        created_by = identity.user_id,
        work_date = %entry.work_date,
        packages = entry.packages,
        "Entry created"
    );
    push_flash(&current.session, "Entry saved.").await?;
    Ok(Redirect::to("/"))
}

/// GET /entry/:id/edit
pub(super) async fn edit_entry_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> LedgerResult<Html<String>> {
    let entry = state.db().get_entry(id).await?;
    require(
        &current.identity(),
        Resource::Entry {
            owner_id: entry.user_id,
        },
    )?;

    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };
    Ok(Html(html::entry_form(&ctx, Some(&entry), entry.work_date, None)))
}

/// POST /entry/:id/edit
///
/// Overwrites date, packages and notes. Concurrent edits are last-write-wins.
pub(super) async fn update_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<EntryForm>,
) -> LedgerResult<Redirect> {
    let existing = state.db().get_entry(id).await?;
    let identity = current.identity();
    require(
        &identity,
        Resource::Entry {
            owner_id: existing.user_id,
        },
    )?;

    let fields = form.fields(existing.work_date)?;
    let entry = state.db().update_entry(id, &fields).await?;

    tracing::info!(
        entry_id = entry.id,
        edited_by = identity.user_id,
        packages = entry.packages,
        "Entry updated"
    );
    push_flash(&current.session, "Entry updated.").await?;
    Ok(Redirect::to("/"))
}

/// POST /admin/entry/:id/comment
pub(super) async fn comment_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> LedgerResult<Redirect> {
    require(&current.identity(), Resource::EntryComment)?;

    let entry = state
        .db()
        .set_admin_comment(id, form.admin_comment.trim())
        .await?;

    tracing::info!(entry_id = entry.id, admin_id = current.user.id, "Admin comment saved");
    push_flash(&current.session, "Comment saved.").await?;
    Ok(Redirect::to("/"))
}
