// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang_domain::{Actor, Request, RequestStatus, Scope};

use super::helpers::{harness, new_request, submit, submit_approved};
use crate::{
    ApiError, ListRequestsQuery, RequestCounts, RequestView, create_request, get_request,
    list_requests, request_counts, resolve_scope,
};

fn status(value: &str) -> ListRequestsQuery {
    ListRequestsQuery {
        status: Some(value.to_string()),
    }
}

#[test]
fn test_listing_is_limited_to_scope() {
    let mut h = harness();
    let production: Actor = h.actor("admin.prod");
    let moulding: Request = submit(&mut h);
    let assembly: Request = create_request(
        &mut h.persistence,
        &h.ctx,
        &production,
        new_request("ASM", &[(h.gloves, 2)]),
    )
    .unwrap();

    let requester: Actor = h.actor("admin.mld");
    let own: Vec<RequestView> = list_requests(
        &mut h.persistence,
        &h.ctx,
        &requester,
        &ListRequestsQuery::default(),
    )
    .unwrap();
    assert_eq!(
        own.iter().map(|v| v.id).collect::<Vec<i64>>(),
        vec![moulding.id().value()]
    );

    let hrga: Actor = h.actor("hrga.1");
    let everything: Vec<RequestView> = list_requests(
        &mut h.persistence,
        &h.ctx,
        &hrga,
        &ListRequestsQuery::default(),
    )
    .unwrap();
    assert_eq!(
        everything.iter().map(|v| v.id).collect::<Vec<i64>>(),
        vec![assembly.id().value(), moulding.id().value()]
    );

    let qc_supervisor: Actor = h.actor("spv.qc");
    let none: Vec<RequestView> = list_requests(
        &mut h.persistence,
        &h.ctx,
        &qc_supervisor,
        &ListRequestsQuery::default(),
    )
    .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_listing_by_status() {
    let mut h = harness();
    let approved: Request = submit_approved(&mut h);
    let _pending: Request = submit(&mut h);
    let hrga: Actor = h.actor("hrga.1");

    let views: Vec<RequestView> =
        list_requests(&mut h.persistence, &h.ctx, &hrga, &status("approved_spv")).unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].id, approved.id().value());
    assert_eq!(views[0].status, RequestStatus::ApprovedSpv);
}

#[test]
fn test_unknown_status_filter_is_invalid_input() {
    let mut h = harness();
    let hrga: Actor = h.actor("hrga.1");

    let result: Result<Vec<RequestView>, ApiError> =
        list_requests(&mut h.persistence, &h.ctx, &hrga, &status("approved"));

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_request_view_carries_display_names_and_items() {
    let mut h = harness();
    let created: Request = submit(&mut h);
    let supervisor: Actor = h.actor("spv.mld");

    let view: RequestView = get_request(
        &mut h.persistence,
        &h.ctx,
        &supervisor,
        created.id().value(),
    )
    .unwrap();

    assert_eq!(view.doc_number, "REQ/0001/MLD/III/2026");
    assert_eq!(view.department_name, "Moulding");
    assert_eq!(view.requester_name, "Admin Moulding");
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.items[0].sku, "GLV-01");
    assert_eq!(view.items[0].quantity, 8);
    assert_eq!(view.items[1].sku, "TAPE-02");
    assert_eq!(view.batch_id, None);
}

#[test]
fn test_request_outside_scope_is_unauthorized() {
    let mut h = harness();
    let created: Request = submit(&mut h);
    let indirect: Actor = h.actor("admin.ind");

    let result: Result<RequestView, ApiError> =
        get_request(&mut h.persistence, &h.ctx, &indirect, created.id().value());

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_counts_cover_every_status() {
    let mut h = harness();
    let _approved: Request = submit_approved(&mut h);
    let _first: Request = submit(&mut h);
    let _second: Request = submit(&mut h);
    let requester: Actor = h.actor("admin.mld");

    let counts: RequestCounts = request_counts(&mut h.persistence, &h.ctx, &requester).unwrap();

    assert_eq!(counts.total, 3);
    assert_eq!(counts.counts.len(), RequestStatus::ALL.len());
    let count_of = |wanted: RequestStatus| -> u64 {
        counts
            .counts
            .iter()
            .find(|c| c.status == wanted)
            .map_or(0, |c| c.count)
    };
    assert_eq!(count_of(RequestStatus::Pending), 2);
    assert_eq!(count_of(RequestStatus::ApprovedSpv), 1);
    assert_eq!(count_of(RequestStatus::Completed), 0);
}

#[test]
fn test_counts_outside_scope_are_zero() {
    let mut h = harness();
    let _created: Request = submit(&mut h);
    let indirect: Actor = h.actor("admin.ind");

    let counts: RequestCounts = request_counts(&mut h.persistence, &h.ctx, &indirect).unwrap();

    assert_eq!(counts.total, 0);
}

#[test]
fn test_scope_resolution_uses_the_department_catalogue() {
    let mut h = harness();
    let production: Actor = h.actor("admin.prod");
    let qc_supervisor: Actor = h.actor("spv.qc");
    let hrga: Actor = h.actor("hrga.1");

    let production_scope: Scope = resolve_scope(&mut h.persistence, &h.ctx, &production).unwrap();
    let qc_scope: Scope = resolve_scope(&mut h.persistence, &h.ctx, &qc_supervisor).unwrap();
    let hrga_scope: Scope = resolve_scope(&mut h.persistence, &h.ctx, &hrga).unwrap();

    let codes = |scope: &Scope| -> Vec<String> {
        scope
            .departments()
            .map(|set| set.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    };
    assert_eq!(codes(&production_scope), vec!["ASM", "MLD"]);
    assert_eq!(codes(&qc_scope), vec!["PP", "QA", "QC"]);
    assert_eq!(hrga_scope, Scope::Unrestricted);
}
