// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use gudang_domain::{Actor, Item, ItemId, Request, RequestId, ScopeWidenings};
use gudang_notify::RecordingSink;
use gudang_persistence::Persistence;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    ApiContext, ApproveRequest, CreateItemRequest, CreateRequestRequest, FixedClock,
    LineItemInput, RegisterActorRequest, RegisterDepartmentRequest, approve_request,
    authenticate, create_item, create_request, register_actor, register_department,
};

pub struct Harness {
    pub persistence: Persistence,
    pub ctx: ApiContext,
    pub sink: RecordingSink,
    /// GLV-01, 20 in stock, minimum 5.
    pub gloves: i64,
    /// TAPE-02, 3 in stock, minimum 2.
    pub tape: i64,
}

impl Harness {
    pub fn actor(&mut self, id: &str) -> Actor {
        authenticate(&mut self.persistence, id).unwrap()
    }

    pub fn request(&mut self, id: RequestId) -> Request {
        self.persistence.get_request(id).unwrap().unwrap()
    }

    pub fn stock(&mut self, item_id: i64) -> u64 {
        let item: Item = self.persistence.get_item(ItemId::new(item_id)).unwrap().unwrap();
        item.current_stock
    }
}

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-14 09:30 UTC)
}

pub fn pickup_time() -> OffsetDateTime {
    datetime!(2026-03-18 08:00 UTC)
}

fn department(persistence: &mut Persistence, code: &str, name: &str, category: &str) {
    register_department(
        persistence,
        RegisterDepartmentRequest {
            code: code.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        },
    )
    .unwrap();
}

fn actor(
    persistence: &mut Persistence,
    id: &str,
    name: &str,
    role: &str,
    primary: Option<&str>,
    departments: &[&str],
) {
    register_actor(
        persistence,
        RegisterActorRequest {
            actor_id: id.to_string(),
            display_name: name.to_string(),
            role: role.to_string(),
            primary_department: primary.map(str::to_string),
            departments: departments.iter().map(|d| (*d).to_string()).collect(),
        },
    )
    .unwrap();
}

/// Departments MLD, ASM (production), QC, QA (indirect); requesters,
/// supervisors for MLD and QC, two HRGA users and two items.
pub fn harness() -> Harness {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    department(&mut persistence, "MLD", "Moulding", "production");
    department(&mut persistence, "ASM", "Assembly", "production");
    department(&mut persistence, "QC", "Quality Control", "indirect");
    department(&mut persistence, "QA", "Quality Assurance", "indirect");

    actor(
        &mut persistence,
        "admin.mld",
        "Admin Moulding",
        "admin_dept",
        Some("MLD"),
        &[],
    );
    actor(
        &mut persistence,
        "admin.prod",
        "Admin Produksi",
        "admin_produksi",
        None,
        &[],
    );
    actor(
        &mut persistence,
        "admin.ind",
        "Admin Indirect",
        "admin_indirect",
        None,
        &[],
    );
    actor(
        &mut persistence,
        "spv.mld",
        "Supervisor Moulding",
        "supervisor",
        None,
        &["MLD"],
    );
    actor(
        &mut persistence,
        "spv.qc",
        "Supervisor QC",
        "supervisor",
        None,
        &["QC"],
    );
    actor(&mut persistence, "hrga.1", "HRGA One", "hrga", None, &[]);
    actor(&mut persistence, "hrga.2", "HRGA Two", "hrga", None, &[]);

    let sink: RecordingSink = RecordingSink::new();
    let ctx: ApiContext = ApiContext::new(Arc::new(sink.clone()), ScopeWidenings::plant_defaults())
        .with_clock(Arc::new(FixedClock(now())));

    let hrga: Actor = authenticate(&mut persistence, "hrga.1").unwrap();
    let gloves: i64 = create_item(
        &mut persistence,
        &hrga,
        item("GLV-01", "Cotton gloves", 20, 5),
    )
    .unwrap()
    .id;
    let tape: i64 = create_item(&mut persistence, &hrga, item("TAPE-02", "Duct tape", 3, 2))
        .unwrap()
        .id;

    Harness {
        persistence,
        ctx,
        sink,
        gloves,
        tape,
    }
}

pub fn item(sku: &str, name: &str, initial_stock: u64, min_stock: u64) -> CreateItemRequest {
    CreateItemRequest {
        sku: sku.to_string(),
        name: name.to_string(),
        unit: String::from("pcs"),
        min_stock,
        initial_stock,
    }
}

pub fn lines(items: &[(i64, u32)]) -> Vec<LineItemInput> {
    items
        .iter()
        .map(|(item_id, quantity)| LineItemInput {
            item_id: *item_id,
            quantity: *quantity,
        })
        .collect()
}

pub fn new_request(dept_code: &str, items: &[(i64, u32)]) -> CreateRequestRequest {
    CreateRequestRequest {
        dept_code: dept_code.to_string(),
        items: lines(items),
        admin_signature: Some(String::from("sig-admin")),
    }
}

/// Submits gloves×8 and tape×1 for MLD as `admin.mld`.
pub fn submit(h: &mut Harness) -> Request {
    let requester: Actor = h.actor("admin.mld");
    let request: CreateRequestRequest = new_request("MLD", &[(h.gloves, 8), (h.tape, 1)]);
    create_request(&mut h.persistence, &h.ctx, &requester, request).unwrap()
}

/// Submits a request and approves it as `spv.mld`, clearing the sink.
pub fn submit_approved(h: &mut Harness) -> Request {
    let created: Request = submit(h);
    let supervisor: Actor = h.actor("spv.mld");
    let approved: Request = approve_request(
        &mut h.persistence,
        &h.ctx,
        &supervisor,
        created.id().value(),
        ApproveRequest::default(),
    )
    .unwrap();
    let _ = h.sink.take();
    approved
}
