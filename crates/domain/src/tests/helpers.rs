// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ActorId, BatchId, Department, DepartmentCategory, DeptCode, DocNumber, ItemId, LineItem,
    NewRequest, Request, RequestId,
};
use time::{Month, OffsetDateTime, macros::datetime};

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
    datetime!(2026-03-15 13:00 UTC)
}

/// The plant catalogue used across scope tests.
pub fn catalogue() -> Vec<Department> {
    [
        ("MLD", DepartmentCategory::Production),
        ("ASM", DepartmentCategory::Production),
        ("PNT", DepartmentCategory::Production),
        ("QC", DepartmentCategory::Indirect),
        ("QA", DepartmentCategory::Indirect),
        ("PP", DepartmentCategory::Indirect),
        ("FIN", DepartmentCategory::Indirect),
        ("EXT", DepartmentCategory::Other),
    ]
    .into_iter()
    .map(|(code, category)| Department::new(dept(code), code.to_lowercase(), category))
    .collect()
}

pub fn pending_request(id: i64, dept_code: &str) -> Request {
    let doc: DocNumber = DocNumber::new(
        u32::try_from(id).unwrap(),
        dept(dept_code),
        Month::March,
        2026,
    )
    .unwrap();
    let new: NewRequest = NewRequest::new(
        doc,
        actor_id("admin.mld"),
        Some(String::from("sig-admin")),
        vec![
            LineItem::new(ItemId::new(1), 5),
            LineItem::new(ItemId::new(2), 2),
        ],
        created_at(),
    )
    .unwrap();
    Request::created(RequestId::new(id), new)
}

pub fn approved_request(id: i64, dept_code: &str) -> Request {
    pending_request(id, dept_code)
        .approve(Some(String::from("sig-spv")), later())
        .unwrap()
}

pub fn scheduled_request(id: i64, dept_code: &str, batch: i64) -> Request {
    approved_request(id, dept_code)
        .schedule(BatchId::new(batch), later())
        .unwrap()
}
