// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang::BatchPlan;
use gudang_domain::{BatchStatus, PickupBatch, Request, RequestStatus};

use super::helpers::{batch_plan, create_approved_request, create_request, later, seed};
use crate::{Persistence, PersistenceError, RequestFilter};

#[test]
fn test_batch_schedules_every_member() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let first: Request = create_approved_request(&mut persistence, &seeded);
    let second: Request = create_approved_request(&mut persistence, &seeded);

    let batch: PickupBatch = persistence
        .insert_batch(&batch_plan(&[first.clone(), second.clone()]))
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Pending);
    assert_eq!(batch.request_ids, vec![first.id(), second.id()]);

    for id in [first.id(), second.id()] {
        let loaded: Request = persistence.get_request(id).unwrap().unwrap();
        assert_eq!(loaded.status(), RequestStatus::Scheduled);
        assert_eq!(loaded.batch_id(), Some(batch.id));
        assert_eq!(loaded.updated_at(), later());
    }

    let stored: PickupBatch = persistence.get_batch(batch.id).unwrap().unwrap();
    assert_eq!(stored, batch);

    let members: Vec<Request> = persistence
        .list_requests(&RequestFilter {
            batch_id: Some(batch.id),
            ..RequestFilter::default()
        })
        .unwrap();
    assert_eq!(members.len(), 2);
}

#[test]
fn test_batch_with_a_stale_member_is_rolled_back() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let eligible: Request = create_approved_request(&mut persistence, &seeded);
    let other: Request = create_approved_request(&mut persistence, &seeded);

    // Plan while both are approved, then let another batch take one of them.
    let plan: BatchPlan = batch_plan(&[eligible.clone(), other.clone()]);
    let first_batch: PickupBatch = persistence.insert_batch(&batch_plan(&[other.clone()])).unwrap();

    let result: Result<PickupBatch, PersistenceError> = persistence.insert_batch(&plan);
    assert!(matches!(
        result,
        Err(PersistenceError::StaleState { id, .. }) if id == other.id().value()
    ));

    let untouched: Request = persistence.get_request(eligible.id()).unwrap().unwrap();
    assert_eq!(untouched.status(), RequestStatus::ApprovedSpv);
    assert_eq!(untouched.batch_id(), None);
    let kept: Request = persistence.get_request(other.id()).unwrap().unwrap();
    assert_eq!(kept.batch_id(), Some(first_batch.id));
    assert_eq!(persistence.list_batches(None).unwrap().len(), 1);
}

#[test]
fn test_batch_rejects_pending_member_without_writing() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let approved: Request = create_approved_request(&mut persistence, &seeded);
    let pending: Request = create_request(&mut persistence, &seeded);

    // Approved in memory but still pending in storage: only the storage
    // guard can catch it.
    let mut plan: BatchPlan = batch_plan(&[approved.clone()]);
    plan.members.push(pending.approve(None, later()).unwrap());

    assert!(matches!(
        persistence.insert_batch(&plan),
        Err(PersistenceError::StaleState { id, .. }) if id == pending.id().value()
    ));
    assert_eq!(
        persistence.get_request(approved.id()).unwrap().unwrap().status(),
        RequestStatus::ApprovedSpv
    );
    assert_eq!(
        persistence.get_request(pending.id()).unwrap().unwrap().status(),
        RequestStatus::Pending
    );
    assert!(persistence.list_batches(None).unwrap().is_empty());
}

#[test]
fn test_mark_batch_fulfilled_only_once() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let approved: Request = create_approved_request(&mut persistence, &seeded);
    let batch: PickupBatch = persistence.insert_batch(&batch_plan(&[approved])).unwrap();

    assert!(persistence.mark_batch_fulfilled(batch.id).unwrap());
    assert!(!persistence.mark_batch_fulfilled(batch.id).unwrap());

    let stored: PickupBatch = persistence.get_batch(batch.id).unwrap().unwrap();
    assert_eq!(stored.status, BatchStatus::Approved);
    assert_eq!(
        persistence
            .list_batches(Some(BatchStatus::Pending))
            .unwrap()
            .len(),
        0
    );
    assert_eq!(
        persistence
            .list_batches(Some(BatchStatus::Approved))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_completed_members_keep_their_batch() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let approved: Request = create_approved_request(&mut persistence, &seeded);
    let batch: PickupBatch = persistence
        .insert_batch(&batch_plan(&[approved.clone()]))
        .unwrap();

    let scheduled: Request = persistence.get_request(approved.id()).unwrap().unwrap();
    let completed: Request = scheduled.complete(later()).unwrap();
    persistence
        .complete_request(RequestStatus::Scheduled, &completed, &[])
        .unwrap();

    let stored: PickupBatch = persistence.get_batch(batch.id).unwrap().unwrap();
    assert_eq!(stored.request_ids, vec![approved.id()]);
    let loaded: Request = persistence.get_request(approved.id()).unwrap().unwrap();
    assert_eq!(loaded.status(), RequestStatus::Completed);
    assert_eq!(loaded.batch_id(), Some(batch.id));
}
