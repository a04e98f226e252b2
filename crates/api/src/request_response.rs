// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response data transfer objects.
//!
//! Every read model has its own fully typed shape; nothing is passed
//! around as loosely joined rows.

use gudang_domain::{BatchId, Item, Request, RequestStatus, StockShortage};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;

// ============================================================================
// Requests
// ============================================================================

/// One requested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub item_id: i64,
    pub quantity: u32,
}

/// API request to submit a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequestRequest {
    /// The department the request is for.
    pub dept_code: String,
    /// At least one line.
    pub items: Vec<LineItemInput>,
    /// Optional signature artifact of the submitting admin.
    #[serde(default)]
    pub admin_signature: Option<String>,
}

/// API request to approve one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub supervisor_signature: Option<String>,
}

/// API request to approve several requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkApproveRequest {
    pub request_ids: Vec<i64>,
    #[serde(default)]
    pub supervisor_signature: Option<String>,
}

/// API request to reject one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// API request to reject several requests with one reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRejectRequest {
    pub request_ids: Vec<i64>,
    pub reason: String,
}

/// Filters for listing requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequestsQuery {
    /// Only requests in this status (`pending`, `approved_spv`, ...).
    #[serde(default)]
    pub status: Option<String>,
}

/// A line of a request, joined with its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemView {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub quantity: u32,
}

/// A request joined with its department, requester and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestView {
    pub id: i64,
    pub doc_number: String,
    pub dept_code: String,
    pub department_name: String,
    pub requester_id: String,
    pub requester_name: String,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>,
    pub admin_signature: Option<String>,
    pub supervisor_signature: Option<String>,
    pub batch_id: Option<i64>,
    pub items: Vec<LineItemView>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One request that a bulk operation could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub request_id: i64,
    pub error: ApiError,
}

/// Per-item result of a bulk approve or reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub succeeded: Vec<Request>,
    pub failed: Vec<BulkFailure>,
}

/// A request that was handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandedOver {
    pub request: Request,
    /// Lines that asked for more than was on the shelf; stock was floored
    /// at zero for them.
    pub shortages: Vec<StockShortage>,
}

/// Per-item result of a hand-over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandOverOutcome {
    pub succeeded: Vec<HandedOver>,
    pub failed: Vec<BulkFailure>,
    /// Batches whose last outstanding member was handed over in this call.
    pub fulfilled_batches: Vec<BatchId>,
}

/// Number of requests in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: RequestStatus,
    pub count: u64,
}

/// Dashboard counts within the actor's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestCounts {
    pub counts: Vec<StatusCount>,
    pub total: u64,
}

// ============================================================================
// Batches
// ============================================================================

/// API request to create a pickup batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub request_ids: Vec<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub schedule_datetime: OffsetDateTime,
}

/// API request to hand over one or more requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOverRequest {
    pub request_ids: Vec<i64>,
}

// ============================================================================
// Document numbers
// ============================================================================

/// API request to format a document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDocNumberRequest {
    pub sequence: u32,
    pub dept_code: String,
    pub month: u8,
    pub year: i32,
}

/// The parts of a parsed document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocNumberParts {
    pub sequence: u32,
    pub dept_code: String,
    pub month: u8,
    pub year: u16,
}

// ============================================================================
// Items
// ============================================================================

/// API request to create an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub min_stock: u64,
    #[serde(default)]
    pub initial_stock: u64,
}

/// API request to edit an item. Stock is changed only by receipts and
/// hand-over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub unit: String,
    pub min_stock: u64,
}

/// API request to record an incoming-stock receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveStockRequest {
    pub quantity: u64,
}

/// An item with its low-stock flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub current_stock: u64,
    pub min_stock: u64,
    pub low_stock: bool,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let low_stock: bool = item.is_low_stock();
        Self {
            id: item.id.value(),
            sku: item.sku,
            name: item.name,
            unit: item.unit,
            current_stock: item.current_stock,
            min_stock: item.min_stock,
            low_stock,
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

/// API request to register a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDepartmentRequest {
    pub code: String,
    pub name: String,
    /// `production`, `indirect` or `other`.
    pub category: String,
}

/// API request to register an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterActorRequest {
    pub actor_id: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub primary_department: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
}

// ============================================================================
// Notifications
// ============================================================================

/// A notification in the caller's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub id: i64,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
