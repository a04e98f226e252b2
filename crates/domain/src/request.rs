// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The request aggregate.
//!
//! A request owns its line items and moves through the lifecycle defined by
//! [`RequestStatus`]. Every transition method is pure: it validates against
//! the current value and returns the next value, leaving `self` untouched.

use crate::doc_number::DocNumber;
use crate::error::DomainError;
use crate::request_status::RequestStatus;
use crate::types::{ActorId, BatchId, DeptCode, LineItem, RequestId};
use crate::validation::{validate_line_items, validate_rejection_reason};
use serde::Serialize;
use time::OffsetDateTime;

/// A validated request that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub doc_number: DocNumber,
    pub requester_id: ActorId,
    pub dept_code: DeptCode,
    pub admin_signature: Option<String>,
    pub items: Vec<LineItem>,
    pub created_at: OffsetDateTime,
}

impl NewRequest {
    /// Creates a new request.
    ///
    /// # Errors
    ///
    /// Returns an error if the line items are invalid.
    pub fn new(
        doc_number: DocNumber,
        requester_id: ActorId,
        admin_signature: Option<String>,
        items: Vec<LineItem>,
        created_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_line_items(&items)?;
        let dept_code: DeptCode = doc_number.dept_code().clone();
        Ok(Self {
            doc_number,
            requester_id,
            dept_code,
            admin_signature,
            items,
            created_at,
        })
    }
}

/// Raw parts of a stored request, used to rebuild the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub id: RequestId,
    pub doc_number: DocNumber,
    pub requester_id: ActorId,
    pub dept_code: DeptCode,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>,
    pub admin_signature: Option<String>,
    pub supervisor_signature: Option<String>,
    pub batch_id: Option<BatchId>,
    pub items: Vec<LineItem>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A procurement request.
///
/// Invariants:
/// - at least one line item, all with positive quantity
/// - `rejection_reason` is present and non-blank iff the status is `rejected`
/// - a `scheduled` request always references a batch, and only `scheduled`
///   or `completed` requests may reference one
/// - the document number's department equals `dept_code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    id: RequestId,
    doc_number: DocNumber,
    requester_id: ActorId,
    dept_code: DeptCode,
    status: RequestStatus,
    rejection_reason: Option<String>,
    admin_signature: Option<String>,
    supervisor_signature: Option<String>,
    batch_id: Option<BatchId>,
    items: Vec<LineItem>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Request {
    /// Builds the stored form of a freshly inserted request.
    #[must_use]
    pub fn created(id: RequestId, new: NewRequest) -> Self {
        Self {
            id,
            doc_number: new.doc_number,
            requester_id: new.requester_id,
            dept_code: new.dept_code,
            status: RequestStatus::Pending,
            rejection_reason: None,
            admin_signature: new.admin_signature,
            supervisor_signature: None,
            batch_id: None,
            items: new.items,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Rebuilds a request from stored parts, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InconsistentRequest` if the parts violate an
    /// aggregate invariant.
    pub fn restore(parts: RequestParts) -> Result<Self, DomainError> {
        let id: RequestId = parts.id;
        let inconsistent = |reason: &str| DomainError::InconsistentRequest {
            request_id: id,
            reason: reason.to_string(),
        };

        validate_line_items(&parts.items).map_err(|e| inconsistent(&e.to_string()))?;

        let rejected: bool = parts.status == RequestStatus::Rejected;
        let has_reason: bool = parts
            .rejection_reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        if rejected != has_reason {
            return Err(inconsistent(
                "rejection reason must be present exactly when rejected",
            ));
        }
        if parts.status.requires_batch() && parts.batch_id.is_none() {
            return Err(inconsistent("scheduled request has no batch"));
        }
        if parts.batch_id.is_some() && !parts.status.permits_batch() {
            return Err(inconsistent("only scheduled or completed requests have a batch"));
        }
        if parts.doc_number.dept_code() != &parts.dept_code {
            return Err(inconsistent("document number department mismatch"));
        }

        Ok(Self {
            id,
            doc_number: parts.doc_number,
            requester_id: parts.requester_id,
            dept_code: parts.dept_code,
            status: parts.status,
            rejection_reason: parts.rejection_reason,
            admin_signature: parts.admin_signature,
            supervisor_signature: parts.supervisor_signature,
            batch_id: parts.batch_id,
            items: parts.items,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub const fn doc_number(&self) -> &DocNumber {
        &self.doc_number
    }

    #[must_use]
    pub const fn requester_id(&self) -> &ActorId {
        &self.requester_id
    }

    #[must_use]
    pub const fn dept_code(&self) -> &DeptCode {
        &self.dept_code
    }

    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    #[must_use]
    pub fn admin_signature(&self) -> Option<&str> {
        self.admin_signature.as_deref()
    }

    #[must_use]
    pub fn supervisor_signature(&self) -> Option<&str> {
        self.supervisor_signature.as_deref()
    }

    #[must_use]
    pub const fn batch_id(&self) -> Option<BatchId> {
        self.batch_id
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// Supervisor approval: `pending → approved_spv`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the request is pending.
    pub fn approve(
        &self,
        supervisor_signature: Option<String>,
        at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        self.status.validate_transition(RequestStatus::ApprovedSpv)?;
        Ok(Self {
            status: RequestStatus::ApprovedSpv,
            supervisor_signature: supervisor_signature
                .or_else(|| self.supervisor_signature.clone()),
            updated_at: at,
            ..self.clone()
        })
    }

    /// Supervisor rejection: `pending → rejected`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyReason` for a blank reason, and
    /// `DomainError::InvalidStateTransition` unless the request is pending.
    pub fn reject(&self, reason: &str, at: OffsetDateTime) -> Result<Self, DomainError> {
        let reason: String = validate_rejection_reason(reason)?;
        self.status.validate_transition(RequestStatus::Rejected)?;
        Ok(Self {
            status: RequestStatus::Rejected,
            rejection_reason: Some(reason),
            updated_at: at,
            ..self.clone()
        })
    }

    /// Batch membership: `approved_spv → scheduled`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMembership` if the request is already in a
    /// batch, and `DomainError::InvalidStateTransition` unless it is approved.
    pub fn schedule(&self, batch_id: BatchId, at: OffsetDateTime) -> Result<Self, DomainError> {
        if let Some(existing) = self.batch_id {
            return Err(DomainError::InvalidMembership {
                request_id: self.id,
                reason: format!("already in batch {existing}"),
            });
        }
        self.status.validate_transition(RequestStatus::Scheduled)?;
        Ok(Self {
            status: RequestStatus::Scheduled,
            batch_id: Some(batch_id),
            updated_at: at,
            ..self.clone()
        })
    }

    /// Hand-over: `scheduled | approved_spv → completed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the request is
    /// scheduled or approved.
    pub fn complete(&self, at: OffsetDateTime) -> Result<Self, DomainError> {
        self.status.validate_transition(RequestStatus::Completed)?;
        Ok(Self {
            status: RequestStatus::Completed,
            updated_at: at,
            ..self.clone()
        })
    }
}
