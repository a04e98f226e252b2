// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the request workflow.
//!
//! Handlers are transport-agnostic: they take storage, an [`ApiContext`],
//! the authenticated [`Actor`](gudang_domain::Actor) and a request DTO,
//! and return domain values or an [`ApiError`]. Authorization always runs
//! before any state is read for mutation.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod context;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::AuthorizationService;
pub use context::{ApiContext, Clock, FixedClock, SystemClock};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    approve_request, approve_requests_bulk, authenticate, count_unread_notifications,
    create_batch, create_item, create_request, format_doc_number, get_batch, get_request, hand_over, list_batches,
    list_items, list_notifications, list_requests, low_stock_items, mark_all_notifications_read,
    mark_notification_read, parse_doc_number, receive_stock, register_actor, register_department,
    reject_request, reject_requests_bulk, request_counts, resolve_scope, update_item,
};
pub use request_response::{
    ApproveRequest, BulkApproveRequest, BulkFailure, BulkOutcome, BulkRejectRequest,
    CreateBatchRequest, CreateItemRequest, CreateRequestRequest, DocNumberParts,
    FormatDocNumberRequest, HandOverOutcome, HandOverRequest, HandedOver, ItemView, LineItemInput,
    LineItemView, ListRequestsQuery, NotificationView, ReceiveStockRequest, RegisterActorRequest,
    RegisterDepartmentRequest, RejectRequest, RequestCounts, RequestView, StatusCount,
    UpdateItemRequest,
};
