// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang::{CreatePlan, plan_create};
use gudang_domain::{Department, DepartmentCategory, LineItem, Request};
use time::macros::datetime;

use super::helpers::{actor_id, create_plan, dept, seed};
use crate::{Persistence, PersistenceError};

fn doc_number(request: &Request) -> String {
    request.doc_number().to_string()
}

#[test]
fn test_first_request_of_the_year_is_numbered_one() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);

    let plan: CreatePlan =
        create_plan("admin.mld", "MLD", vec![LineItem::new(seeded.gloves.id, 2)]);
    let request: Request = persistence.insert_request(&plan).unwrap();

    assert_eq!(doc_number(&request), "REQ/0001/MLD/III/2026");
}

#[test]
fn test_counters_are_per_department_and_year() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    persistence
        .insert_department(&Department::new(
            dept("PLA"),
            "Plating".to_string(),
            DepartmentCategory::Production,
        ))
        .unwrap();
    let lines = vec![LineItem::new(seeded.gloves.id, 1)];

    let first: Request = persistence
        .insert_request(&create_plan("admin.mld", "MLD", lines.clone()))
        .unwrap();
    let second: Request = persistence
        .insert_request(&create_plan("admin.mld", "MLD", lines.clone()))
        .unwrap();
    let plating: Request = persistence
        .insert_request(&create_plan("admin.mld", "PLA", lines.clone()))
        .unwrap();

    assert_eq!(doc_number(&first), "REQ/0001/MLD/III/2026");
    assert_eq!(doc_number(&second), "REQ/0002/MLD/III/2026");
    assert_eq!(doc_number(&plating), "REQ/0001/PLA/III/2026");

    let next_year: CreatePlan = plan_create(
        actor_id("admin.mld"),
        dept("MLD"),
        lines,
        None,
        datetime!(2027-01-05 08:00 UTC),
    )
    .unwrap();
    let reset: Request = persistence.insert_request(&next_year).unwrap();
    assert_eq!(doc_number(&reset), "REQ/0001/MLD/I/2027");
}

#[test]
fn test_month_does_not_reset_the_counter() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);
    let lines = vec![LineItem::new(seeded.tape.id, 1)];

    persistence
        .insert_request(&create_plan("admin.mld", "MLD", lines.clone()))
        .unwrap();
    let april: CreatePlan = plan_create(
        actor_id("admin.mld"),
        dept("MLD"),
        lines,
        None,
        datetime!(2026-04-02 10:00 UTC),
    )
    .unwrap();
    let request: Request = persistence.insert_request(&april).unwrap();

    assert_eq!(doc_number(&request), "REQ/0002/MLD/IV/2026");
}

#[test]
fn test_failed_insert_does_not_consume_a_number() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed(&mut persistence);

    // Unknown item: the line insert fails and the transaction rolls back.
    let bad: CreatePlan = create_plan(
        "admin.mld",
        "MLD",
        vec![LineItem::new(gudang_domain::ItemId::new(4242), 1)],
    );
    let result: Result<Request, PersistenceError> = persistence.insert_request(&bad);
    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));

    let good: Request = persistence
        .insert_request(&create_plan(
            "admin.mld",
            "MLD",
            vec![LineItem::new(seeded.gloves.id, 1)],
        ))
        .unwrap();
    assert_eq!(doc_number(&good), "REQ/0001/MLD/III/2026");
    assert_eq!(
        persistence
            .list_requests(&crate::RequestFilter::default())
            .unwrap()
            .len(),
        1
    );
}
