// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    actor_id, approved_request, created_at, later, pending_request, scheduled_request,
};
use crate::{
    BatchId, BatchStatus, DomainError, PickupBatch, Request, RequestId, validate_batch_members,
};

fn pending_batch() -> PickupBatch {
    PickupBatch {
        id: BatchId::new(1),
        schedule_datetime: later(),
        status: BatchStatus::Pending,
        created_by: actor_id("hrga"),
        created_at: created_at(),
        request_ids: vec![RequestId::new(1), RequestId::new(2)],
    }
}

#[test]
fn test_batch_members_must_all_be_approved() {
    let members: Vec<Request> = vec![approved_request(1, "MLD"), approved_request(2, "QC")];
    assert!(validate_batch_members(&members).is_ok());
}

#[test]
fn test_empty_batch_is_refused() {
    assert_eq!(validate_batch_members(&[]), Err(DomainError::EmptyBatch));
}

#[test]
fn test_pending_member_is_invalid_membership() {
    let members: Vec<Request> = vec![approved_request(1, "MLD"), pending_request(2, "MLD")];
    match validate_batch_members(&members) {
        Err(DomainError::InvalidMembership { request_id, .. }) => {
            assert_eq!(request_id, RequestId::new(2));
        }
        other => panic!("expected InvalidMembership, got {other:?}"),
    }
}

#[test]
fn test_already_batched_member_is_invalid_membership() {
    let members: Vec<Request> = vec![scheduled_request(1, "MLD", 3)];
    assert!(matches!(
        validate_batch_members(&members),
        Err(DomainError::InvalidMembership { .. })
    ));
}

#[test]
fn test_duplicate_member_is_invalid_membership() {
    let members: Vec<Request> = vec![approved_request(1, "MLD"), approved_request(1, "MLD")];
    assert!(matches!(
        validate_batch_members(&members),
        Err(DomainError::InvalidMembership { .. })
    ));
}

#[test]
fn test_batch_status_only_moves_from_pending() {
    assert!(
        BatchStatus::Pending
            .validate_transition(BatchStatus::Approved)
            .is_ok()
    );
    assert!(
        BatchStatus::Pending
            .validate_transition(BatchStatus::Rejected)
            .is_ok()
    );
    assert!(
        BatchStatus::Approved
            .validate_transition(BatchStatus::Rejected)
            .is_err()
    );
    assert!(
        BatchStatus::Rejected
            .validate_transition(BatchStatus::Approved)
            .is_err()
    );
}

#[test]
fn test_mark_fulfilled() {
    let batch: PickupBatch = pending_batch().mark_fulfilled().unwrap();
    assert_eq!(batch.status, BatchStatus::Approved);
    assert!(batch.mark_fulfilled().is_err());
}

#[test]
fn test_batch_status_strings() {
    for status in [
        BatchStatus::Pending,
        BatchStatus::Approved,
        BatchStatus::Rejected,
    ] {
        assert_eq!(status.as_str().parse::<BatchStatus>().unwrap(), status);
    }
    assert!("done".parse::<BatchStatus>().is_err());
}
