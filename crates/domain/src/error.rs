// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{BatchId, ItemId, RequestId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Calendar month outside `1..=12`.
    #[error("Invalid month: {month}. Must be between 1 and 12")]
    InvalidMonth {
        /// The rejected month value.
        month: u8,
    },
    /// Year that cannot be printed as four digits.
    #[error("Invalid year: {year}. Must be between 1000 and 9999")]
    InvalidYear {
        /// The rejected year value.
        year: i32,
    },
    /// Document sequence numbers start at 1.
    #[error("Invalid document sequence: {sequence}. Must be positive")]
    InvalidSequence {
        /// The rejected sequence value.
        sequence: u32,
    },
    /// Text is not a canonical document number.
    #[error("Invalid document number: '{0}'")]
    InvalidDocNumber(String),
    /// Department code is empty or contains forbidden characters.
    #[error("Invalid department code: {0}")]
    InvalidDeptCode(String),
    /// Department category string is not recognized.
    #[error("Invalid department category: {0}")]
    InvalidCategory(String),
    /// Role string is not recognized.
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    /// Actor identifier is empty.
    #[error("Invalid actor id: {0}")]
    InvalidActorId(String),
    /// Request status string is not recognized.
    #[error("Invalid request status: {0}")]
    InvalidRequestStatus(String),
    /// Batch status string is not recognized.
    #[error("Invalid batch status: {0}")]
    InvalidBatchStatus(String),
    /// A request needs at least one line item.
    #[error("A request must contain at least one line item")]
    EmptyItems,
    /// A line item quantity must be positive.
    #[error("Invalid quantity {quantity} for item {item_id}. Must be positive")]
    InvalidQuantity {
        /// The item on the offending line.
        item_id: ItemId,
        /// The rejected quantity.
        quantity: u32,
    },
    /// The same item appears on more than one line.
    #[error("Item {item_id} appears on more than one line")]
    DuplicateLineItem {
        /// The repeated item.
        item_id: ItemId,
    },
    /// A rejection requires a non-blank reason.
    #[error("A rejection reason is required")]
    EmptyReason,
    /// Item master data is invalid.
    #[error("Invalid item {field}: {message}")]
    InvalidItem {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// The requested status change is not permitted by the lifecycle.
    #[error("Invalid status transition from '{from}' to '{to}': {reason}")]
    InvalidStateTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// A batch needs at least one member request.
    #[error("A pickup batch must contain at least one request")]
    EmptyBatch,
    /// A request cannot join a batch.
    #[error("Request {request_id} cannot join a batch: {reason}")]
    InvalidMembership {
        /// The offending request.
        request_id: RequestId,
        /// Why the request was refused.
        reason: String,
    },
    /// A stored record violates an aggregate invariant.
    #[error("Inconsistent request {request_id}: {reason}")]
    InconsistentRequest {
        /// The offending request.
        request_id: RequestId,
        /// The violated invariant.
        reason: String,
    },
    /// A stored batch violates an aggregate invariant.
    #[error("Inconsistent batch {batch_id}: {reason}")]
    InconsistentBatch {
        /// The offending batch.
        batch_id: BatchId,
        /// The violated invariant.
        reason: String,
    },
}
