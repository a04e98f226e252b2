// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handlers.
//!
//! Each handler locks storage, calls one API operation and maps the result
//! to JSON. No workflow logic lives here.

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gudang_api::{
    ApiError, ApproveRequest, BulkApproveRequest, BulkOutcome, BulkRejectRequest,
    CreateBatchRequest, CreateItemRequest, CreateRequestRequest, DocNumberParts,
    FormatDocNumberRequest, HandOverOutcome, HandOverRequest, ItemView, ListRequestsQuery,
    NotificationView, ReceiveStockRequest, RejectRequest, RequestCounts, RequestView,
    UpdateItemRequest,
};
use gudang_domain::{PickupBatch, Request, Scope};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;
use crate::live::live_events_handler;
use crate::session::SessionActor;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidStateTransition { .. } | ApiError::InvalidMembership { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::EmptyItems
            | ApiError::EmptyReason
            | ApiError::InvalidMonth { .. }
            | ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::TransientFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Query parameters for listing batches.
#[derive(Debug, Default, Deserialize)]
pub struct ListBatchesQuery {
    pub status: Option<String>,
}

/// Query parameters for listing notifications.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// Query parameters for parsing a document number.
#[derive(Debug, Deserialize)]
pub struct ParseDocNumberQuery {
    pub text: String,
}

/// Response for a formatted document number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocNumberResponse {
    pub doc_number: String,
}

/// Response for the unread notification badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// Response for bulk read-marking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedReadResponse {
    pub updated: usize,
}

// ============================================================================
// Requests
// ============================================================================

async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<Request>), HttpError> {
    info!(actor = %actor.id, dept_code = %req.dept_code, "Handling create_request");
    let mut persistence = app_state.persistence.lock().await;
    let created: Request =
        gudang_api::create_request(&mut persistence, &app_state.ctx, &actor, req)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<RequestView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let views: Vec<RequestView> =
        gudang_api::list_requests(&mut persistence, &app_state.ctx, &actor, &query)?;
    Ok(Json(views))
}

async fn handle_request_counts(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<RequestCounts>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let counts: RequestCounts =
        gudang_api::request_counts(&mut persistence, &app_state.ctx, &actor)?;
    Ok(Json(counts))
}

async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
) -> Result<Json<RequestView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let view: RequestView =
        gudang_api::get_request(&mut persistence, &app_state.ctx, &actor, request_id)?;
    Ok(Json(view))
}

async fn handle_approve_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<Request>, HttpError> {
    info!(actor = %actor.id, request_id, "Handling approve_request");
    let mut persistence = app_state.persistence.lock().await;
    let approved: Request =
        gudang_api::approve_request(&mut persistence, &app_state.ctx, &actor, request_id, req)?;
    Ok(Json(approved))
}

async fn handle_reject_request(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(request_id): Path<i64>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<Request>, HttpError> {
    info!(actor = %actor.id, request_id, "Handling reject_request");
    let mut persistence = app_state.persistence.lock().await;
    let rejected: Request =
        gudang_api::reject_request(&mut persistence, &app_state.ctx, &actor, request_id, req)?;
    Ok(Json(rejected))
}

async fn handle_approve_bulk(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<BulkApproveRequest>,
) -> Result<Json<BulkOutcome>, HttpError> {
    info!(actor = %actor.id, count = req.request_ids.len(), "Handling bulk approve");
    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkOutcome =
        gudang_api::approve_requests_bulk(&mut persistence, &app_state.ctx, &actor, req)?;
    Ok(Json(outcome))
}

async fn handle_reject_bulk(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<BulkRejectRequest>,
) -> Result<Json<BulkOutcome>, HttpError> {
    info!(actor = %actor.id, count = req.request_ids.len(), "Handling bulk reject");
    let mut persistence = app_state.persistence.lock().await;
    let outcome: BulkOutcome =
        gudang_api::reject_requests_bulk(&mut persistence, &app_state.ctx, &actor, req)?;
    Ok(Json(outcome))
}

// ============================================================================
// Batches and hand-over
// ============================================================================

async fn handle_create_batch(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<PickupBatch>), HttpError> {
    info!(actor = %actor.id, count = req.request_ids.len(), "Handling create_batch");
    let mut persistence = app_state.persistence.lock().await;
    let batch: PickupBatch =
        gudang_api::create_batch(&mut persistence, &app_state.ctx, &actor, req)?;
    Ok((StatusCode::CREATED, Json(batch)))
}

async fn handle_list_batches(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<ListBatchesQuery>,
) -> Result<Json<Vec<PickupBatch>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let batches: Vec<PickupBatch> =
        gudang_api::list_batches(&mut persistence, &actor, query.status.as_deref())?;
    Ok(Json(batches))
}

async fn handle_get_batch(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(batch_id): Path<i64>,
) -> Result<Json<PickupBatch>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let batch: PickupBatch = gudang_api::get_batch(&mut persistence, &actor, batch_id)?;
    Ok(Json(batch))
}

async fn handle_hand_over(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<HandOverRequest>,
) -> Result<Json<HandOverOutcome>, HttpError> {
    info!(actor = %actor.id, count = req.request_ids.len(), "Handling hand_over");
    let mut persistence = app_state.persistence.lock().await;
    let outcome: HandOverOutcome =
        gudang_api::hand_over(&mut persistence, &app_state.ctx, &actor, req)?;
    Ok(Json(outcome))
}

// ============================================================================
// Items
// ============================================================================

async fn handle_list_items(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
) -> Result<Json<Vec<ItemView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::list_items(&mut persistence)?))
}

async fn handle_low_stock_items(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(_actor): SessionActor,
) -> Result<Json<Vec<ItemView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::low_stock_items(&mut persistence)?))
}

async fn handle_create_item(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemView>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let item: ItemView = gudang_api::create_item(&mut persistence, &actor, req)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn handle_update_item(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(item_id): Path<i64>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::update_item(
        &mut persistence,
        &actor,
        item_id,
        req,
    )?))
}

async fn handle_receive_stock(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(item_id): Path<i64>,
    Json(req): Json<ReceiveStockRequest>,
) -> Result<Json<ItemView>, HttpError> {
    info!(actor = %actor.id, item_id, quantity = req.quantity, "Handling receive_stock");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::receive_stock(
        &mut persistence,
        &actor,
        item_id,
        req,
    )?))
}

// ============================================================================
// Notifications
// ============================================================================

async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<NotificationView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::list_notifications(
        &mut persistence,
        &actor,
        query.unread_only,
    )?))
}

async fn handle_unread_count(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<UnreadCountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let unread: u64 = gudang_api::count_unread_notifications(&mut persistence, &actor)?;
    Ok(Json(UnreadCountResponse { unread }))
}

async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(notification_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    gudang_api::mark_notification_read(&mut persistence, &actor, notification_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_mark_all_notifications_read(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<MarkedReadResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let updated: usize = gudang_api::mark_all_notifications_read(&mut persistence, &actor)?;
    Ok(Json(MarkedReadResponse { updated }))
}

// ============================================================================
// Scope and document numbers
// ============================================================================

async fn handle_scope(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Scope>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(gudang_api::resolve_scope(
        &mut persistence,
        &app_state.ctx,
        &actor,
    )?))
}

async fn handle_format_doc_number(
    Json(req): Json<FormatDocNumberRequest>,
) -> Result<Json<DocNumberResponse>, HttpError> {
    let doc_number: String = gudang_api::format_doc_number(&req)?;
    Ok(Json(DocNumberResponse { doc_number }))
}

async fn handle_parse_doc_number(
    Query(query): Query<ParseDocNumberQuery>,
) -> Result<Json<DocNumberParts>, HttpError> {
    gudang_api::parse_doc_number(&query.text)
        .map(Json)
        .ok_or_else(|| HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("'{}' is not a document number", query.text),
        })
}

/// Builds the application router with all endpoints.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/requests",
            post(handle_create_request).get(handle_list_requests),
        )
        .route("/requests/counts", get(handle_request_counts))
        .route("/requests/approve", post(handle_approve_bulk))
        .route("/requests/reject", post(handle_reject_bulk))
        .route("/requests/{request_id}", get(handle_get_request))
        .route(
            "/requests/{request_id}/approve",
            post(handle_approve_request),
        )
        .route("/requests/{request_id}/reject", post(handle_reject_request))
        .route(
            "/batches",
            post(handle_create_batch).get(handle_list_batches),
        )
        .route("/batches/{batch_id}", get(handle_get_batch))
        .route("/hand_over", post(handle_hand_over))
        .route("/items", get(handle_list_items).post(handle_create_item))
        .route("/items/low_stock", get(handle_low_stock_items))
        .route("/items/{item_id}", axum::routing::put(handle_update_item))
        .route("/items/{item_id}/receive", post(handle_receive_stock))
        .route("/notifications", get(handle_list_notifications))
        .route("/notifications/unread_count", get(handle_unread_count))
        .route(
            "/notifications/read_all",
            post(handle_mark_all_notifications_read),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(handle_mark_notification_read),
        )
        .route("/scope", get(handle_scope))
        .route("/doc_numbers/format", post(handle_format_doc_number))
        .route("/doc_numbers/parse", get(handle_parse_doc_number))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}
