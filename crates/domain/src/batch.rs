// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pickup batches.
//!
//! A batch groups approved requests under one pickup date and time. Batch
//! creation is all-or-nothing: a batch with partial membership is
//! meaningless, so every candidate must be eligible.

use crate::error::DomainError;
use crate::request::Request;
use crate::request_status::RequestStatus;
use crate::types::{ActorId, BatchId, RequestId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;

/// Batch-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Scheduled, hand-over outstanding
    Pending,
    /// Every member handed over
    Approved,
    /// Cancelled
    Rejected,
}

impl BatchStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Validates a batch status change. Only `pending` may move, and only
    /// to `approved` or `rejected`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` otherwise.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if matches!(
            (self, new_status),
            (Self::Pending, Self::Approved | Self::Rejected)
        ) {
            return Ok(());
        }
        Err(DomainError::InvalidStateTransition {
            from: self.as_str().to_string(),
            to: new_status.as_str().to_string(),
            reason: "transition not permitted by batch lifecycle rules".to_string(),
        })
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidBatchStatus(s.to_string())),
        }
    }
}

/// A scheduled pickup grouping of approved requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickupBatch {
    pub id: BatchId,
    #[serde(with = "time::serde::rfc3339")]
    pub schedule_datetime: OffsetDateTime,
    pub status: BatchStatus,
    pub created_by: ActorId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub request_ids: Vec<RequestId>,
}

impl PickupBatch {
    /// Returns the batch with status `approved` once every member has been
    /// handed over.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is no longer pending.
    pub fn mark_fulfilled(&self) -> Result<Self, DomainError> {
        self.status.validate_transition(BatchStatus::Approved)?;
        Ok(Self {
            status: BatchStatus::Approved,
            ..self.clone()
        })
    }
}

/// Checks that every candidate may join a new batch.
///
/// Each request must be `approved_spv`, not already batched, and appear once.
///
/// # Errors
///
/// Returns `DomainError::EmptyBatch` for no candidates, and
/// `DomainError::InvalidMembership` naming the first ineligible request.
pub fn validate_batch_members(members: &[Request]) -> Result<(), DomainError> {
    if members.is_empty() {
        return Err(DomainError::EmptyBatch);
    }

    let mut seen: BTreeSet<RequestId> = BTreeSet::new();
    for request in members {
        if !seen.insert(request.id()) {
            return Err(DomainError::InvalidMembership {
                request_id: request.id(),
                reason: String::from("listed more than once"),
            });
        }
        if let Some(batch_id) = request.batch_id() {
            return Err(DomainError::InvalidMembership {
                request_id: request.id(),
                reason: format!("already in batch {batch_id}"),
            });
        }
        if request.status() != RequestStatus::ApprovedSpv {
            return Err(DomainError::InvalidMembership {
                request_id: request.id(),
                reason: format!("status is '{}', expected 'approved_spv'", request.status()),
            });
        }
    }
    Ok(())
}
