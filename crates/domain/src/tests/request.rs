// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    actor_id, approved_request, created_at, dept, later, pending_request, scheduled_request,
};
use crate::{
    BatchId, DocNumber, DomainError, ItemId, LineItem, NewRequest, Request, RequestParts,
    RequestStatus,
};
use time::Month;

fn parts_of(request: &Request) -> RequestParts {
    RequestParts {
        id: request.id(),
        doc_number: request.doc_number().clone(),
        requester_id: request.requester_id().clone(),
        dept_code: request.dept_code().clone(),
        status: request.status(),
        rejection_reason: request.rejection_reason().map(String::from),
        admin_signature: request.admin_signature().map(String::from),
        supervisor_signature: request.supervisor_signature().map(String::from),
        batch_id: request.batch_id(),
        items: request.items().to_vec(),
        created_at: request.created_at(),
        updated_at: request.updated_at(),
    }
}

#[test]
fn test_new_request_takes_department_from_doc_number() {
    let doc: DocNumber = DocNumber::new(1, dept("MLD"), Month::March, 2026).unwrap();
    let new: NewRequest = NewRequest::new(
        doc,
        actor_id("admin.mld"),
        None,
        vec![LineItem::new(ItemId::new(1), 3)],
        created_at(),
    )
    .unwrap();
    assert_eq!(new.dept_code, dept("MLD"));
}

#[test]
fn test_new_request_requires_items() {
    let doc: DocNumber = DocNumber::new(1, dept("MLD"), Month::March, 2026).unwrap();
    let result = NewRequest::new(doc, actor_id("admin.mld"), None, vec![], created_at());
    assert_eq!(result, Err(DomainError::EmptyItems));
}

#[test]
fn test_created_request_is_pending() {
    let request: Request = pending_request(1, "MLD");
    assert_eq!(request.status(), RequestStatus::Pending);
    assert_eq!(request.batch_id(), None);
    assert_eq!(request.rejection_reason(), None);
    assert_eq!(request.supervisor_signature(), None);
    assert_eq!(request.admin_signature(), Some("sig-admin"));
    assert_eq!(request.created_at(), request.updated_at());
}

#[test]
fn test_approve_moves_to_approved_spv() {
    let request: Request = pending_request(1, "MLD");
    let approved: Request = request
        .approve(Some(String::from("sig-spv")), later())
        .unwrap();
    assert_eq!(approved.status(), RequestStatus::ApprovedSpv);
    assert_eq!(approved.supervisor_signature(), Some("sig-spv"));
    assert_eq!(approved.updated_at(), later());
    // The original value is untouched.
    assert_eq!(request.status(), RequestStatus::Pending);
}

#[test]
fn test_approve_twice_is_an_invalid_transition() {
    let approved: Request = approved_request(1, "MLD");
    assert!(matches!(
        approved.approve(None, later()),
        Err(DomainError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_reject_records_trimmed_reason() {
    let rejected: Request = pending_request(1, "MLD")
        .reject("  out of budget  ", later())
        .unwrap();
    assert_eq!(rejected.status(), RequestStatus::Rejected);
    assert_eq!(rejected.rejection_reason(), Some("out of budget"));
}

#[test]
fn test_reject_requires_reason() {
    for reason in ["", "   ", "\n\t"] {
        assert_eq!(
            pending_request(1, "MLD").reject(reason, later()),
            Err(DomainError::EmptyReason)
        );
    }
}

#[test]
fn test_reject_after_approval_is_refused() {
    assert!(matches!(
        approved_request(1, "MLD").reject("too late", later()),
        Err(DomainError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_schedule_attaches_batch() {
    let scheduled: Request = approved_request(1, "MLD")
        .schedule(BatchId::new(9), later())
        .unwrap();
    assert_eq!(scheduled.status(), RequestStatus::Scheduled);
    assert_eq!(scheduled.batch_id(), Some(BatchId::new(9)));
}

#[test]
fn test_schedule_pending_request_is_refused() {
    assert!(matches!(
        pending_request(1, "MLD").schedule(BatchId::new(9), later()),
        Err(DomainError::InvalidStateTransition { .. })
    ));
}

#[test]
fn test_schedule_already_batched_request_is_invalid_membership() {
    let scheduled: Request = scheduled_request(1, "MLD", 9);
    assert!(matches!(
        scheduled.schedule(BatchId::new(10), later()),
        Err(DomainError::InvalidMembership { .. })
    ));
}

#[test]
fn test_complete_from_scheduled_keeps_batch() {
    let completed: Request = scheduled_request(1, "MLD", 9).complete(later()).unwrap();
    assert_eq!(completed.status(), RequestStatus::Completed);
    assert_eq!(completed.batch_id(), Some(BatchId::new(9)));
}

#[test]
fn test_complete_from_approved_without_batch() {
    let completed: Request = approved_request(1, "MLD").complete(later()).unwrap();
    assert_eq!(completed.status(), RequestStatus::Completed);
    assert_eq!(completed.batch_id(), None);
}

#[test]
fn test_complete_twice_is_refused() {
    let completed: Request = approved_request(1, "MLD").complete(later()).unwrap();
    assert!(completed.complete(later()).is_err());
}

#[test]
fn test_restore_round_trips_every_reachable_state() {
    let states: Vec<Request> = vec![
        pending_request(1, "MLD"),
        approved_request(2, "MLD"),
        pending_request(3, "MLD").reject("no", later()).unwrap(),
        scheduled_request(4, "MLD", 1),
        scheduled_request(5, "MLD", 1).complete(later()).unwrap(),
    ];
    for request in states {
        let restored: Request = Request::restore(parts_of(&request)).unwrap();
        assert_eq!(restored, request);
    }
}

#[test]
fn test_restore_rejects_rejected_without_reason() {
    let mut parts: RequestParts = parts_of(&pending_request(1, "MLD"));
    parts.status = RequestStatus::Rejected;
    assert!(matches!(
        Request::restore(parts),
        Err(DomainError::InconsistentRequest { .. })
    ));
}

#[test]
fn test_restore_rejects_reason_on_non_rejected() {
    let mut parts: RequestParts = parts_of(&pending_request(1, "MLD"));
    parts.rejection_reason = Some(String::from("stray"));
    assert!(Request::restore(parts).is_err());
}

#[test]
fn test_restore_rejects_scheduled_without_batch() {
    let mut parts: RequestParts = parts_of(&approved_request(1, "MLD"));
    parts.status = RequestStatus::Scheduled;
    assert!(Request::restore(parts).is_err());
}

#[test]
fn test_restore_rejects_batch_on_pending() {
    let mut parts: RequestParts = parts_of(&pending_request(1, "MLD"));
    parts.batch_id = Some(BatchId::new(1));
    assert!(Request::restore(parts).is_err());
}

#[test]
fn test_restore_rejects_department_mismatch() {
    let mut parts: RequestParts = parts_of(&pending_request(1, "MLD"));
    parts.dept_code = dept("QC");
    assert!(Request::restore(parts).is_err());
}

#[test]
fn test_restore_rejects_empty_items() {
    let mut parts: RequestParts = parts_of(&pending_request(1, "MLD"));
    parts.items.clear();
    assert!(Request::restore(parts).is_err());
}

#[test]
fn test_request_serializes_rfc3339_timestamps() {
    let json: serde_json::Value = serde_json::to_value(pending_request(1, "MLD")).unwrap();
    assert_eq!(json["doc_number"], "REQ/0001/MLD/III/2026");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["created_at"], "2026-03-14T09:30:00Z");
}
