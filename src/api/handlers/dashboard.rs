use axum::{extract::State, response::Html};

use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::auth::take_flashes;
use crate::error::LedgerResult;
use crate::render::html::{self, PageContext};

/// GET /
///
/// Workers see their own entries; admins see the most recent entries
/// across all workers plus the user list.
pub(super) async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> LedgerResult<Html<String>> {
    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };

    let page = if current.user.is_admin() {
        let limit = state.config().invoice.recent_entries_limit;
        let entries = state.db().recent_entries(limit).await?;
        let users = state.db().list_users().await?;
        html::admin_dashboard(&ctx, &entries, &users)
    } else {
        let entries = state.db().entries_for_user(current.user.id).await?;
        html::worker_dashboard(&ctx, &entries)
    };

    Ok(Html(page))
}
