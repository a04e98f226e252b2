// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang::{BatchPlan, CreatePlan, TransitionContext, plan_batch, plan_create};
use gudang_domain::{
    Actor, ActorId, Department, DepartmentCategory, DeptCode, Item, LineItem, Request, Role,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct Seeded {
    pub gloves: Item,
    pub tape: Item,
}

pub fn dept(code: &str) -> DeptCode {
    DeptCode::new(code).unwrap()
}

pub fn actor_id(id: &str) -> ActorId {
    ActorId::new(id).unwrap()
}

pub fn created_at() -> OffsetDateTime {
    datetime!(2026-03-14 09:30 UTC)
}

pub fn later() -> OffsetDateTime {
    datetime!(2026-03-16 13:00 UTC)
}

/// Departments MLD, ASM (production) and QC (indirect); one requester and
/// one supervisor for MLD, one for ASM, and one HRGA user; two items.
pub fn seed(persistence: &mut Persistence) -> Seeded {
    for (code, name, category) in [
        ("MLD", "Moulding", DepartmentCategory::Production),
        ("ASM", "Assembly", DepartmentCategory::Production),
        ("QC", "Quality Control", DepartmentCategory::Indirect),
    ] {
        persistence
            .insert_department(&Department::new(dept(code), name.to_string(), category))
            .unwrap();
    }

    let actors: [(Actor, &str); 5] = [
        (
            Actor::new(actor_id("admin.mld"), Role::AdminDept).with_primary_department(dept("MLD")),
            "Admin Moulding",
        ),
        (
            Actor::new(actor_id("admin.asm"), Role::AdminDept).with_primary_department(dept("ASM")),
            "Admin Assembly",
        ),
        (
            Actor::new(actor_id("spv.mld"), Role::Supervisor).with_primary_department(dept("MLD")),
            "Supervisor Moulding",
        ),
        (Actor::new(actor_id("hrga.1"), Role::Hrga), "HRGA One"),
        (Actor::new(actor_id("hrga.2"), Role::Hrga), "HRGA Two"),
    ];
    for (actor, name) in &actors {
        persistence.insert_actor(actor, name).unwrap();
    }

    let gloves: Item = persistence
        .insert_item("GLV-01", "Cotton gloves", "pair", 5, 20)
        .unwrap();
    let tape: Item = persistence
        .insert_item("TAPE-02", "Masking tape", "roll", 2, 3)
        .unwrap();
    Seeded { gloves, tape }
}

pub fn create_plan(requester: &str, dept_code: &str, items: Vec<LineItem>) -> CreatePlan {
    plan_create(
        actor_id(requester),
        dept(dept_code),
        items,
        None,
        created_at(),
    )
    .unwrap()
}

pub fn create_request(persistence: &mut Persistence, seeded: &Seeded) -> Request {
    let plan: CreatePlan = create_plan(
        "admin.mld",
        "MLD",
        vec![
            LineItem::new(seeded.gloves.id, 8),
            LineItem::new(seeded.tape.id, 1),
        ],
    );
    persistence.insert_request(&plan).unwrap()
}

pub fn create_approved_request(persistence: &mut Persistence, seeded: &Seeded) -> Request {
    let request: Request = create_request(persistence, seeded);
    let approved: Request = request.approve(Some("spv-sig".to_string()), later()).unwrap();
    persistence
        .save_transition(request.status(), &approved)
        .unwrap();
    approved
}

pub fn hrga_context() -> TransitionContext {
    TransitionContext::new(
        actor_id("hrga.1"),
        vec![actor_id("hrga.1"), actor_id("hrga.2")],
        later(),
    )
}

pub fn batch_plan(members: &[Request]) -> BatchPlan {
    plan_batch(members, datetime!(2026-03-18 08:00 UTC), &hrga_context()).unwrap()
}

/// A fresh database file path under the system temp directory.
pub fn temp_db_path() -> PathBuf {
    let n: u64 = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("gudang_test_{}_{n}.db", std::process::id()))
}

pub fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(name));
    }
}
