use std::time::Instant;

use axum::{
    Json,
    extract::{Form, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::{Resource, require};
use crate::api::extract::{CurrentUser, load_current_user};
use crate::api::request::{InvoiceForm, InvoiceParams, InvoiceRequest};
use crate::api::response::{ApiError, ApiErrorResponse};
use crate::api::state::AppState;
use crate::auth::take_flashes;
use crate::calculation::{compute_invoice, duplicate_day_warnings};
use crate::error::LedgerResult;
use crate::models::{Identity, Invoice, InvoiceInput, User};
use crate::render::html::{self, InvoiceFormValues, PageContext};
use crate::render::{invoice_filename, render_invoice_pdf};

/// Builds the invoice for `params` on behalf of `identity`.
///
/// A missing `user_id` invoices the caller. Workers may only invoice
/// themselves. Duplicate entries on one date are summed and reported as
/// warnings.
pub async fn build_invoice(
    state: &AppState,
    identity: &Identity,
    params: &InvoiceParams,
) -> LedgerResult<Invoice> {
    let correlation_id = Uuid::new_v4();
    let worker_id = params.user_id.unwrap_or(identity.user_id);
    info!(
        correlation_id = %correlation_id,
        requested_by = identity.user_id,
        worker_id,
        start = %params.period.start,
        end = %params.period.end,
        "Processing invoice request"
    );

    require(identity, Resource::Invoice { worker_id })?;
    let worker = state.db().get_user(worker_id).await?;

    let start_time = Instant::now();
    let packages_sum = state.db().package_sum(worker.id, &params.period).await?;
    let work_dates = state.db().work_dates(worker.id, &params.period).await?;
    let warnings = duplicate_day_warnings(&work_dates);
    if !warnings.is_empty() {
        warn!(
            correlation_id = %correlation_id,
            worker_id,
            duplicate_days = warnings.len(),
            "Invoice period has several entries on one day"
        );
    }

    let input = InvoiceInput::new(packages_sum, worker.price_per_pkg, worker.super_rate)
        .with_gst_rate(state.config().invoice.gst_rate)
        .with_van_rent(params.van_rent);
    let breakdown = compute_invoice(&input);

    info!(
        correlation_id = %correlation_id,
        worker_id,
        packages = packages_sum,
        total = %breakdown.total,
        duration_us = start_time.elapsed().as_micros(),
        "Invoice computed"
    );

    Ok(Invoice {
        invoice_id: correlation_id,
        generated_at: Utc::now(),
        worker_id: worker.id,
        worker_name: worker.name,
        worker_email: worker.email,
        period: params.period,
        breakdown,
        warnings,
    })
}

/// Workers selectable on the invoice form: everyone for admins, otherwise
/// only the caller.
async fn selectable_workers(state: &AppState, user: &User) -> LedgerResult<Vec<User>> {
    if user.is_admin() {
        state.db().list_users().await
    } else {
        Ok(vec![user.clone()])
    }
}

/// GET /invoice
pub(super) async fn invoice_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> LedgerResult<Html<String>> {
    let workers = selectable_workers(&state, &current.user).await?;
    let form = InvoiceFormValues {
        user_id: Some(current.user.id),
        van_rent: state.config().invoice.van_rent.to_string(),
        ..Default::default()
    };

    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };
    Ok(Html(html::invoice_page(&ctx, &workers, &form, None)))
}

/// POST /invoice
pub(super) async fn invoice_preview(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<InvoiceForm>,
) -> LedgerResult<Html<String>> {
    let params = form.params(state.config().invoice.van_rent)?;
    let invoice = build_invoice(&state, &current.identity(), &params).await?;

    let workers = selectable_workers(&state, &current.user).await?;
    let values = InvoiceFormValues {
        user_id: Some(invoice.worker_id),
        start: form.start.trim().to_string(),
        end: form.end.trim().to_string(),
        van_rent: params.van_rent.to_string(),
    };

    let flashes = take_flashes(&current.session).await?;
    let ctx = PageContext {
        viewer: Some(&current.user),
        flashes: &flashes,
    };
    Ok(Html(html::invoice_page(&ctx, &workers, &values, Some(&invoice))))
}

/// GET /invoice/pdf?user_id&start&end&van_rent
pub(super) async fn invoice_pdf(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<InvoiceForm>,
) -> LedgerResult<Response> {
    let params = query.params(state.config().invoice.van_rent)?;
    let invoice = build_invoice(&state, &current.identity(), &params).await?;

    let bytes = render_invoice_pdf(&invoice)?;
    let filename = invoice_filename(&invoice.worker_name, &invoice.period);
    info!(
        invoice_id = %invoice.invoice_id,
        filename = %filename,
        size = bytes.len(),
        "Invoice PDF rendered"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/invoice
///
/// JSON twin of the invoice page. Errors use the [`ApiError`] body, and a
/// missing session is 401 rather than a redirect.
pub(super) async fn invoice_json(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<InvoiceRequest>, JsonRejection>,
) -> Result<Json<Invoice>, ApiErrorResponse> {
    let user = load_current_user(&state, &session).await?;

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(user_id = user.id, error = %body_text, "Rejected invoice JSON");
            let error = match rejection {
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                JsonRejection::JsonDataError(_) if body_text.contains("missing field") => {
                    ApiError::new("VALIDATION_ERROR", body_text)
                }
                _ => ApiError::malformed_json(body_text),
            };
            return Err(ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error,
            });
        }
    };

    let params = request.params(state.config().invoice.van_rent)?;
    let invoice = build_invoice(&state, &user.identity(), &params).await?;
    Ok(Json(invoice))
}
