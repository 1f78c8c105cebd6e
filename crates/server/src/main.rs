// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use swimops_api::{
    ApiError, AuthenticatedActor, authenticate, bulk_approve_time_entries, cancel_block,
    cancel_booking, cancel_conflict_session, complete_purchase_order, create_billing_period,
    create_funding_source, create_profile, create_purchase_order, create_swimmer,
    delete_funding_source, delete_profile, delete_selected_sessions, export_billing_xml,
    generate_billing, generate_sessions, get_billing_period_summary, get_time_off_conflicts,
    list_billing_periods, list_draft_batches, list_funding_sources, list_instructors,
    list_line_items, list_purchase_orders, list_time_entries, list_time_off_requests,
    open_selected_sessions, preview_roster_csv, replace_conflict_instructor, review_line_item,
    review_purchase_order, review_time_off, sign_waiver, transfer_client,
    update_billing_period_status, update_draft_session, update_funding_source,
    update_purchase_order_billing, update_purchase_order_usage, update_swimmer_enrollment,
    update_time_entry,
};
use swimops_api::{
    BulkApproveTimeEntriesRequest, CancelBlockRequest, CancelBookingRequest,
    CancelSessionRequest, CompletePurchaseOrderRequest, CreateBillingPeriodRequest,
    CreateProfileRequest, CreatePurchaseOrderRequest, CreateSwimmerRequest,
    DeleteProfileRequest, DeleteSessionsRequest, ExportBillingXmlRequest, FundingSourceForm,
    GenerateBillingRequest, GenerateSessionsRequest, ListPurchaseOrdersRequest,
    ListTimeEntriesRequest, OpenSessionsRequest, ReplaceInstructorRequest,
    ReviewLineItemRequest, ReviewPurchaseOrderRequest, ReviewTimeOffRequest, SignWaiverRequest,
    TransferClientRequest, UpdateBillingPeriodStatusRequest, UpdateEnrollmentRequest,
    UpdatePoBillingRequest, UpdatePoUsageRequest, UpdateSessionRequest,
    UpdateTimeEntryRequest,
};
use swimops_persistence::Persistence;

/// swimops server - HTTP backend for the swim school platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer wrapped in a Mutex for safe concurrent
    /// access.
    persistence: Arc<Mutex<Persistence>>,
}

/// A request body carrying the caller's identity alongside the
/// operation payload.
///
/// The external identity provider has verified credentials upstream;
/// the server resolves the profile's roles into a request-scoped actor
/// passed to every API handler.
#[derive(Debug, Deserialize)]
struct Authed<T> {
    /// The caller's profile id.
    actor_id: i64,
    #[serde(flatten)]
    request: T,
}

/// Query parameters carrying the caller's identity on read endpoints.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    actor_id: i64,
}

/// Query parameters for the purchase order listing.
#[derive(Debug, Deserialize)]
struct ListPosQuery {
    actor_id: i64,
    search: Option<String>,
    status: Option<String>,
    billing_status: Option<String>,
    po_type: Option<String>,
    funding_source_id: Option<i64>,
}

/// Query parameters for the time entry listing.
#[derive(Debug, Deserialize)]
struct ListTimeEntriesQuery {
    actor_id: i64,
    instructor_id: Option<i64>,
    from_date: String,
    to_date: String,
}

/// Request body for the roster CSV preview.
#[derive(Debug, Deserialize)]
struct PreviewRosterRequest {
    csv: String,
}

/// Late-cancellation details attached to the error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LateCancellationInfo {
    hours_before_session: f64,
    contact_phone: String,
    contact_type: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Present only for late-cancellation rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    late_cancellation: Option<LateCancellationInfo>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Late-cancellation payload, when applicable.
    late_cancellation: Option<LateCancellationInfo>,
}

impl HttpError {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            late_cancellation: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            late_cancellation: self.late_cancellation,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => {
                Self::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            ApiError::Unauthorized { .. } => Self::new(StatusCode::FORBIDDEN, err.to_string()),
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::ResourceNotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::LateCancellation {
                hours_before_session,
                ref message,
                ref contact_phone,
            } => Self {
                status: StatusCode::BAD_REQUEST,
                message: message.clone(),
                late_cancellation: Some(LateCancellationInfo {
                    hours_before_session,
                    contact_phone: contact_phone.clone(),
                    contact_type: String::from("text"),
                }),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Resolves the caller into an authenticated actor.
async fn resolve_actor(
    state: &AppState,
    actor_id: i64,
) -> Result<AuthenticatedActor, HttpError> {
    let mut persistence = state.persistence.lock().await;
    authenticate(&mut persistence, actor_id)
        .map_err(|e| HttpError::new(StatusCode::UNAUTHORIZED, e.to_string()))
}

macro_rules! authed_post {
    ($name:ident, $request:ty, $response:ty, $handler:ident, with_now) => {
        async fn $name(
            AxumState(state): AxumState<AppState>,
            Json(body): Json<Authed<$request>>,
        ) -> Result<Json<$response>, HttpError> {
            let actor = resolve_actor(&state, body.actor_id).await?;
            let mut persistence = state.persistence.lock().await;
            let response = $handler(&mut persistence, &body.request, &actor, Utc::now())?;
            Ok(Json(response))
        }
    };
    ($name:ident, $request:ty, $response:ty, $handler:ident) => {
        async fn $name(
            AxumState(state): AxumState<AppState>,
            Json(body): Json<Authed<$request>>,
        ) -> Result<Json<$response>, HttpError> {
            let actor = resolve_actor(&state, body.actor_id).await?;
            let mut persistence = state.persistence.lock().await;
            let response = $handler(&mut persistence, &body.request, &actor)?;
            Ok(Json(response))
        }
    };
}

// Draft sessions
authed_post!(
    handle_open_sessions,
    OpenSessionsRequest,
    swimops_api::BulkSessionsResponse,
    open_selected_sessions,
    with_now
);
authed_post!(
    handle_delete_sessions,
    DeleteSessionsRequest,
    swimops_api::BulkSessionsResponse,
    delete_selected_sessions
);
authed_post!(
    handle_update_session,
    UpdateSessionRequest,
    swimops_api::UpdateSessionResponse,
    update_draft_session
);
authed_post!(
    handle_generate_sessions,
    GenerateSessionsRequest,
    swimops_api::GenerateSessionsResponse,
    generate_sessions,
    with_now
);

// Purchase orders
authed_post!(
    handle_create_po,
    CreatePurchaseOrderRequest,
    swimops_api::CreatePurchaseOrderResponse,
    create_purchase_order,
    with_now
);
authed_post!(
    handle_review_po,
    ReviewPurchaseOrderRequest,
    swimops_api::ReviewPurchaseOrderResponse,
    review_purchase_order,
    with_now
);
authed_post!(
    handle_complete_po,
    CompletePurchaseOrderRequest,
    swimops_api::PurchaseOrderActionResponse,
    complete_purchase_order,
    with_now
);
authed_post!(
    handle_po_billing,
    UpdatePoBillingRequest,
    swimops_api::PurchaseOrderActionResponse,
    update_purchase_order_billing,
    with_now
);
authed_post!(
    handle_po_usage,
    UpdatePoUsageRequest,
    swimops_api::PurchaseOrderActionResponse,
    update_purchase_order_usage,
    with_now
);

// Billing
authed_post!(
    handle_create_billing_period,
    CreateBillingPeriodRequest,
    swimops_api::BillingPeriodInfo,
    create_billing_period
);
authed_post!(
    handle_generate_billing,
    GenerateBillingRequest,
    swimops_api::GenerateBillingResponse,
    generate_billing,
    with_now
);
authed_post!(
    handle_period_status,
    UpdateBillingPeriodStatusRequest,
    swimops_api::BillingPeriodInfo,
    update_billing_period_status
);
authed_post!(
    handle_review_line_item,
    ReviewLineItemRequest,
    swimops_api::LineItemActionResponse,
    review_line_item
);
authed_post!(
    handle_export_billing,
    ExportBillingXmlRequest,
    swimops_api::ExportBillingXmlResponse,
    export_billing_xml,
    with_now
);

// Time off
authed_post!(
    handle_review_time_off,
    ReviewTimeOffRequest,
    swimops_api::ReviewTimeOffResponse,
    review_time_off,
    with_now
);
authed_post!(
    handle_replace_instructor,
    ReplaceInstructorRequest,
    swimops_api::ConflictResolutionResponse,
    replace_conflict_instructor
);
authed_post!(
    handle_cancel_session,
    CancelSessionRequest,
    swimops_api::ConflictResolutionResponse,
    cancel_conflict_session,
    with_now
);

// Bookings
authed_post!(
    handle_cancel_booking,
    CancelBookingRequest,
    swimops_api::CancelBookingResponse,
    cancel_booking,
    with_now
);
authed_post!(
    handle_cancel_block,
    CancelBlockRequest,
    swimops_api::CancelBlockResponse,
    cancel_block,
    with_now
);

// People
authed_post!(
    handle_create_profile,
    CreateProfileRequest,
    swimops_api::CreateProfileResponse,
    create_profile,
    with_now
);
authed_post!(
    handle_delete_profile,
    DeleteProfileRequest,
    swimops_api::DeleteProfileResponse,
    delete_profile
);
authed_post!(
    handle_create_swimmer,
    CreateSwimmerRequest,
    swimops_api::CreateSwimmerResponse,
    create_swimmer
);
authed_post!(
    handle_update_enrollment,
    UpdateEnrollmentRequest,
    swimops_api::UpdateEnrollmentResponse,
    update_swimmer_enrollment
);
authed_post!(
    handle_transfer_client,
    TransferClientRequest,
    swimops_api::TransferClientResponse,
    transfer_client,
    with_now
);
authed_post!(
    handle_sign_waiver,
    SignWaiverRequest,
    swimops_api::SignWaiverResponse,
    sign_waiver,
    with_now
);

// Timecards
authed_post!(
    handle_update_time_entry,
    UpdateTimeEntryRequest,
    swimops_api::TimeEntryActionResponse,
    update_time_entry,
    with_now
);
authed_post!(
    handle_bulk_approve,
    BulkApproveTimeEntriesRequest,
    swimops_api::TimeEntryActionResponse,
    bulk_approve_time_entries,
    with_now
);

/// Handler for GET `/sessions/drafts`.
async fn handle_list_drafts(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListDraftBatchesResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_draft_batches(&mut persistence, &actor)?))
}

/// Handler for GET `/pos`.
async fn handle_list_pos(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ListPosQuery>,
) -> Result<Json<swimops_api::ListPurchaseOrdersResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let request = ListPurchaseOrdersRequest {
        search: query.search,
        status: query.status,
        billing_status: query.billing_status,
        po_type: query.po_type,
        funding_source_id: query.funding_source_id,
    };
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_purchase_orders(
        &mut persistence,
        &request,
        &actor,
        Utc::now().date_naive(),
    )?))
}

/// Handler for GET `/billing/periods`.
async fn handle_list_periods(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListBillingPeriodsResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_billing_periods(&mut persistence, &actor)?))
}

/// Handler for GET `/billing/periods/{id}/line_items`.
async fn handle_list_line_items(
    AxumState(state): AxumState<AppState>,
    Path(billing_period_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListLineItemsResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_line_items(
        &mut persistence,
        billing_period_id,
        &actor,
    )?))
}

/// Handler for GET `/billing/periods/{id}/summary`.
async fn handle_period_summary(
    AxumState(state): AxumState<AppState>,
    Path(billing_period_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::BillingPeriodSummary>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(get_billing_period_summary(
        &mut persistence,
        billing_period_id,
        &actor,
    )?))
}

/// Handler for GET `/time-off`.
async fn handle_list_time_off(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListTimeOffRequestsResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_time_off_requests(&mut persistence, &actor)?))
}

/// Handler for GET `/time-off/{id}/conflicts`.
async fn handle_time_off_conflicts(
    AxumState(state): AxumState<AppState>,
    Path(time_off_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::TimeOffConflictsResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(get_time_off_conflicts(
        &mut persistence,
        time_off_id,
        &actor,
    )?))
}

/// Handler for GET `/instructors`.
async fn handle_list_instructors(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListInstructorsResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_instructors(&mut persistence, &actor)?))
}

/// Handler for GET `/funding-sources`.
async fn handle_list_funding_sources(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<swimops_api::ListFundingSourcesResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_funding_sources(&mut persistence, &actor)?))
}

/// Handler for POST `/funding-sources`.
async fn handle_create_funding_source(
    AxumState(state): AxumState<AppState>,
    Json(body): Json<Authed<FundingSourceForm>>,
) -> Result<Json<swimops_api::FundingSourceActionResponse>, HttpError> {
    let actor = resolve_actor(&state, body.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(create_funding_source(
        &mut persistence,
        &body.request,
        &actor,
    )?))
}

/// Handler for POST `/funding-sources/{id}/update`.
async fn handle_update_funding_source(
    AxumState(state): AxumState<AppState>,
    Path(funding_source_id): Path<i64>,
    Json(body): Json<Authed<FundingSourceForm>>,
) -> Result<Json<swimops_api::FundingSourceActionResponse>, HttpError> {
    let actor = resolve_actor(&state, body.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(update_funding_source(
        &mut persistence,
        funding_source_id,
        &body.request,
        &actor,
    )?))
}

/// Handler for POST `/funding-sources/{id}/delete`.
async fn handle_delete_funding_source(
    AxumState(state): AxumState<AppState>,
    Path(funding_source_id): Path<i64>,
    Json(body): Json<ActorQuery>,
) -> Result<Json<swimops_api::FundingSourceActionResponse>, HttpError> {
    let actor = resolve_actor(&state, body.actor_id).await?;
    let mut persistence = state.persistence.lock().await;
    Ok(Json(delete_funding_source(
        &mut persistence,
        funding_source_id,
        &actor,
    )?))
}

/// Handler for GET `/timecards`.
async fn handle_list_time_entries(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ListTimeEntriesQuery>,
) -> Result<Json<swimops_api::ListTimeEntriesResponse>, HttpError> {
    let actor = resolve_actor(&state, query.actor_id).await?;
    let request = ListTimeEntriesRequest {
        instructor_id: query.instructor_id,
        from_date: query.from_date,
        to_date: query.to_date,
    };
    let mut persistence = state.persistence.lock().await;
    Ok(Json(list_time_entries(&mut persistence, &request, &actor)?))
}

/// Handler for POST `/roster/preview`.
async fn handle_preview_roster(
    AxumState(state): AxumState<AppState>,
    Json(body): Json<Authed<PreviewRosterRequest>>,
) -> Result<Json<swimops_api::CsvPreviewResult>, HttpError> {
    let actor = resolve_actor(&state, body.actor_id).await?;
    Ok(Json(preview_roster_csv(&body.request.csv, &actor)?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions/drafts", get(handle_list_drafts))
        .route("/sessions/open", post(handle_open_sessions))
        .route("/sessions/delete", post(handle_delete_sessions))
        .route("/sessions/update", post(handle_update_session))
        .route("/sessions/generate", post(handle_generate_sessions))
        .route("/sessions/replace-instructor", post(handle_replace_instructor))
        .route("/sessions/cancel", post(handle_cancel_session))
        .route("/pos", get(handle_list_pos))
        .route("/pos", post(handle_create_po))
        .route("/pos/review", post(handle_review_po))
        .route("/pos/complete", post(handle_complete_po))
        .route("/pos/billing", post(handle_po_billing))
        .route("/pos/usage", post(handle_po_usage))
        .route("/billing/periods", get(handle_list_periods))
        .route("/billing/periods", post(handle_create_billing_period))
        .route("/billing/generate", post(handle_generate_billing))
        .route("/billing/periods/status", post(handle_period_status))
        .route(
            "/billing/periods/{billing_period_id}/line_items",
            get(handle_list_line_items),
        )
        .route(
            "/billing/periods/{billing_period_id}/summary",
            get(handle_period_summary),
        )
        .route("/billing/line_items/review", post(handle_review_line_item))
        .route("/billing/export", post(handle_export_billing))
        .route("/time-off", get(handle_list_time_off))
        .route(
            "/time-off/{time_off_id}/conflicts",
            get(handle_time_off_conflicts),
        )
        .route("/time-off/review", post(handle_review_time_off))
        .route("/bookings/cancel", post(handle_cancel_booking))
        .route("/bookings/cancel-block", post(handle_cancel_block))
        .route("/profiles", post(handle_create_profile))
        .route("/profiles/delete", post(handle_delete_profile))
        .route("/instructors", get(handle_list_instructors))
        .route("/swimmers", post(handle_create_swimmer))
        .route("/swimmers/enrollment", post(handle_update_enrollment))
        .route("/swimmers/transfer", post(handle_transfer_client))
        .route("/swimmers/waiver", post(handle_sign_waiver))
        .route("/funding-sources", get(handle_list_funding_sources))
        .route("/funding-sources", post(handle_create_funding_source))
        .route(
            "/funding-sources/{funding_source_id}/update",
            post(handle_update_funding_source),
        )
        .route(
            "/funding-sources/{funding_source_id}/delete",
            post(handle_delete_funding_source),
        )
        .route("/timecards", get(handle_list_time_entries))
        .route("/timecards/update", post(handle_update_time_entry))
        .route("/timecards/bulk-approve", post(handle_bulk_approve))
        .route("/roster/preview", post(handle_preview_roster))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing swimops server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{}", args.port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode as HttpStatusCode};
    use serde_json::{Value, json};
    use swimops_persistence::{
        NewBooking, NewFundingSource, NewProfile, NewPurchaseOrder, NewSession, NewSwimmer,
        encode_domains,
    };
    use tower::ServiceExt;

    fn create_test_app_state() -> AppState {
        AppState {
            persistence: Arc::new(Mutex::new(Persistence::new_in_memory().unwrap())),
        }
    }

    async fn seed_profile(state: &AppState, email: &str, name: &str, roles: &[&str]) -> i64 {
        let mut persistence = state.persistence.lock().await;
        let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
        persistence
            .create_profile(
                &NewProfile {
                    email: email.to_string(),
                    full_name: name.to_string(),
                    phone: None,
                    created_at: String::from("2026-03-01T00:00:00Z"),
                },
                &roles,
            )
            .unwrap()
    }

    async fn seed_funding_source(state: &AppState) -> i64 {
        let mut persistence = state.persistence.lock().await;
        persistence
            .create_funding_source(&NewFundingSource {
                name: String::from("Valley Regional Center"),
                short_name: String::from("VMRC"),
                allowed_email_domains: encode_domains(&[String::from("@regional-center.net")])
                    .unwrap(),
                assessment_sessions: 2,
                lessons_per_po: 12,
                authorization_months: 6,
                renewal_alert_threshold: 11,
                lesson_rate_cents: 9500,
                billing_contact_name: None,
                billing_contact_email: None,
                billing_contact_phone: None,
                is_active: 1,
            })
            .unwrap()
    }

    async fn seed_swimmer(state: &AppState, parent_id: i64, funding: Option<i64>) -> i64 {
        let mut persistence = state.persistence.lock().await;
        persistence
            .create_swimmer(&NewSwimmer {
                first_name: String::from("Mia"),
                last_name: String::from("Lopez"),
                date_of_birth: String::from("2019-04-05"),
                enrollment_status: String::from("enrolled"),
                payment_type: String::from("private_pay"),
                funding_source_id: funding,
                parent_id,
                coordinator_id: None,
                waiver_signed: 1,
                waiver_signed_at: None,
            })
            .unwrap()
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (HttpStatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get_json(app: Router, uri: &str) -> (HttpStatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_unknown_actor_is_unauthorized() {
        let state = create_test_app_state();
        let app = build_router(state);

        let (status, body) = get_json(app, "/sessions/drafts?actor_id=999").await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], json!(true));
    }

    #[tokio::test]
    async fn test_parent_is_forbidden_on_admin_routes() {
        let state = create_test_app_state();
        let parent = seed_profile(&state, "p@home.test", "Sam Ortiz", &[]).await;
        let app = build_router(state);

        let (status, _) = get_json(app, &format!("/sessions/drafts?actor_id={parent}")).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_funding_source_form_validation_maps_to_400() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let app = build_router(state);

        let (status, body) = post_json(
            app,
            "/funding-sources",
            json!({
                "actor_id": admin,
                "name": "Valley Regional Center",
                "short_name": "VMRC",
                "allowed_email_domains": "@ok.org, missing-at.org",
                "assessment_sessions": 2,
                "lessons_per_po": 12,
                "authorization_months": 6,
                "renewal_alert_threshold": 11,
                "lesson_rate_cents": 9500,
            }),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("must start with @")
        );
    }

    #[tokio::test]
    async fn test_funding_source_threshold_round_trip() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let app = build_router(state.clone());

        let form = json!({
            "actor_id": admin,
            "name": "Valley Regional Center",
            "short_name": "VMRC",
            "allowed_email_domains": "@regional-center.net",
            "assessment_sessions": 2,
            "lessons_per_po": 12,
            "authorization_months": 6,
            "renewal_alert_threshold": 11,
            "lesson_rate_cents": 9500,
        });
        let (status, created) = post_json(app.clone(), "/funding-sources", form.clone()).await;
        assert_eq!(status, HttpStatusCode::OK);
        let id = created["funding_source_id"].as_i64().unwrap();

        // Raising the threshold past lessons_per_po is rejected inline.
        let mut bad = form;
        bad["renewal_alert_threshold"] = json!(13);
        let (status, _) = post_json(
            app.clone(),
            &format!("/funding-sources/{id}/update"),
            bad,
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);

        let (status, listing) =
            get_json(app, &format!("/funding-sources?actor_id={admin}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(listing["sources"][0]["renewal_alert_threshold"], json!(11));
    }

    #[tokio::test]
    async fn test_po_approval_flow_end_to_end() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let parent = seed_profile(&state, "p@home.test", "Sam Ortiz", &[]).await;
        let source = seed_funding_source(&state).await;
        let swimmer = seed_swimmer(&state, parent, Some(source)).await;

        let po = {
            let mut persistence = state.persistence.lock().await;
            persistence
                .create_purchase_order(&NewPurchaseOrder {
                    swimmer_id: swimmer,
                    funding_source_id: source,
                    coordinator_id: None,
                    po_type: String::from("lessons"),
                    status: String::from("approved_pending_auth"),
                    authorization_number: None,
                    sessions_authorized: 12,
                    sessions_booked: 0,
                    sessions_used: 0,
                    start_date: String::from("2026-01-01"),
                    end_date: String::from("2026-06-30"),
                    notes: None,
                    billing_status: String::from("unbilled"),
                    due_date: None,
                    created_at: String::from("2026-03-01T00:00:00Z"),
                    updated_at: String::from("2026-03-01T00:00:00Z"),
                })
                .unwrap()
        };
        let app = build_router(state);

        let (status, body) = post_json(
            app.clone(),
            "/pos/review",
            json!({
                "actor_id": admin,
                "po_id": po,
                "decision": "approve",
                "authorization_number": "AUTH-123",
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], json!("active"));
        assert_eq!(body["authorization_number"], json!("AUTH-123"));

        let (status, listing) = get_json(app, &format!("/pos?actor_id={admin}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(listing["orders"][0]["status"], json!("active"));
        assert_eq!(listing["stats"]["active"], json!(1));
    }

    #[tokio::test]
    async fn test_decline_requires_reason_over_http() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let parent = seed_profile(&state, "p@home.test", "Sam Ortiz", &[]).await;
        let source = seed_funding_source(&state).await;
        let swimmer = seed_swimmer(&state, parent, Some(source)).await;

        let po = {
            let mut persistence = state.persistence.lock().await;
            persistence
                .create_purchase_order(&NewPurchaseOrder {
                    swimmer_id: swimmer,
                    funding_source_id: source,
                    coordinator_id: None,
                    po_type: String::from("lessons"),
                    status: String::from("pending"),
                    authorization_number: None,
                    sessions_authorized: 12,
                    sessions_booked: 0,
                    sessions_used: 0,
                    start_date: String::from("2026-01-01"),
                    end_date: String::from("2026-06-30"),
                    notes: None,
                    billing_status: String::from("unbilled"),
                    due_date: None,
                    created_at: String::from("2026-03-01T00:00:00Z"),
                    updated_at: String::from("2026-03-01T00:00:00Z"),
                })
                .unwrap()
        };
        let app = build_router(state);

        let (status, _) = post_json(
            app.clone(),
            "/pos/review",
            json!({
                "actor_id": admin,
                "po_id": po,
                "decision": "decline",
                "reason": "  ",
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);

        let (status, body) = post_json(
            app,
            "/pos/review",
            json!({
                "actor_id": admin,
                "po_id": po,
                "decision": "decline",
                "reason": "duplicate request",
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], json!("cancelled"));
    }

    #[tokio::test]
    async fn test_late_cancellation_payload() {
        let state = create_test_app_state();
        let instructor =
            seed_profile(&state, "i@pool.test", "Jordan Avila", &["instructor"]).await;
        let parent = seed_profile(&state, "p@home.test", "Sam Ortiz", &[]).await;
        let swimmer = seed_swimmer(&state, parent, None).await;

        // A session two hours from now.
        let start = Utc::now() + chrono::Duration::hours(2);
        let end = start + chrono::Duration::minutes(30);
        let booking = {
            let mut persistence = state.persistence.lock().await;
            let session = persistence
                .create_session(&NewSession {
                    instructor_id: instructor,
                    start_time: swimops_domain::format_timestamp(start),
                    end_time: swimops_domain::format_timestamp(end),
                    location: String::from("Main Pool"),
                    status: String::from("open"),
                    batch_id: None,
                    max_capacity: 1,
                    booking_count: 0,
                    price_cents: 9500,
                    session_type: String::from("lesson"),
                    is_recurring: 0,
                    open_at: None,
                    created_at: String::from("2026-03-01T00:00:00Z"),
                })
                .unwrap();
            persistence
                .create_booking(&NewBooking {
                    session_id: session,
                    swimmer_id: swimmer,
                    parent_id: parent,
                    status: String::from("confirmed"),
                    booking_type: String::from("lesson"),
                    created_at: String::from("2026-03-01T00:00:00Z"),
                })
                .unwrap()
        };
        let app = build_router(state);

        let (status, body) = post_json(
            app,
            "/bookings/cancel",
            json!({ "actor_id": parent, "booking_id": booking }),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        let late = &body["late_cancellation"];
        assert_eq!(late["contact_type"], json!("text"));
        assert!(late["hours_before_session"].as_f64().unwrap() < 24.0);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("please text us")
        );
    }

    #[tokio::test]
    async fn test_generate_then_open_drafts_flow() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let instructor =
            seed_profile(&state, "i@pool.test", "Jordan Avila", &["instructor"]).await;
        let app = build_router(state);

        let (status, generated) = post_json(
            app.clone(),
            "/sessions/generate",
            json!({
                "actor_id": admin,
                "mode": "custom_range",
                "start_date": "2026-03-02",
                "end_date": "2026-03-09",
                "days_of_week": [1],
                "start_time": "09:00",
                "end_time": "10:00",
                "session_duration": 30,
                "instructor_ids": [instructor],
                "session_type": "lesson",
                "location": "Main Pool",
                "price_cents": 9500,
                "timezone": "America/Los_Angeles",
            }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(generated["created"], json!(4));

        let (status, drafts) =
            get_json(app.clone(), &format!("/sessions/drafts?actor_id={admin}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(drafts["total_sessions"], json!(4));
        assert_eq!(
            drafts["batches"][0]["title"],
            json!("March - Mondays - Jordan")
        );

        let session_ids: Vec<i64> = drafts["batches"][0]["sessions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["session_id"].as_i64().unwrap())
            .collect();

        let (status, opened) = post_json(
            app.clone(),
            "/sessions/open",
            json!({ "actor_id": admin, "session_ids": session_ids }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(opened["count"], json!(4));

        let (_, drafts) = get_json(app, &format!("/sessions/drafts?actor_id={admin}")).await;
        assert_eq!(drafts["total_sessions"], json!(0));
    }

    #[tokio::test]
    async fn test_bulk_open_partial_failure_maps_to_422() {
        let state = create_test_app_state();
        let admin = seed_profile(&state, "a@pool.test", "Alex Admin", &["admin"]).await;
        let instructor =
            seed_profile(&state, "i@pool.test", "Jordan Avila", &["instructor"]).await;

        let (draft, open) = {
            let mut persistence = state.persistence.lock().await;
            let make = |status: &str, start: &str| NewSession {
                instructor_id: instructor,
                start_time: start.to_string(),
                end_time: start.replace("17:00", "17:30"),
                location: String::from("Main Pool"),
                status: status.to_string(),
                batch_id: Some(String::from("b1")),
                max_capacity: 1,
                booking_count: 0,
                price_cents: 9500,
                session_type: String::from("lesson"),
                is_recurring: 1,
                open_at: None,
                created_at: String::from("2026-03-01T00:00:00Z"),
            };
            let draft = persistence
                .create_session(&make("draft", "2026-03-02T17:00:00Z"))
                .unwrap();
            let open = persistence
                .create_session(&make("open", "2026-03-09T17:00:00Z"))
                .unwrap();
            (draft, open)
        };
        let app = build_router(state);

        let (status, body) = post_json(
            app,
            "/sessions/open",
            json!({ "actor_id": admin, "session_ids": [draft, open] }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("rolled back") || body["message"].as_str().unwrap().contains("not open-able"));
    }
}
