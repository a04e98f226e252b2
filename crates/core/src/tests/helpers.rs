// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::TransitionContext;
use gudang_domain::{
    ActorId, DeptCode, DocNumber, ItemId, LineItem, NewRequest, Request, RequestId,
};
use time::{Month, OffsetDateTime, macros::datetime};

pub fn actor(id: &str) -> ActorId {
    ActorId::new(id).unwrap()
}

pub fn dept(code: &str) -> DeptCode {
    DeptCode::new(code).unwrap()
}

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-20 10:15 UTC)
}

pub fn create_test_context(actor_id: &str) -> TransitionContext {
    TransitionContext::new(
        actor(actor_id),
        vec![actor("hrga.1"), actor("hrga.2")],
        now(),
    )
}

pub fn create_pending_request(id: i64) -> Request {
    let doc: DocNumber =
        DocNumber::new(u32::try_from(id).unwrap(), dept("MLD"), Month::March, 2026).unwrap();
    let new: NewRequest = NewRequest::new(
        doc,
        actor("admin.mld"),
        None,
        vec![
            LineItem::new(ItemId::new(10), 8),
            LineItem::new(ItemId::new(11), 1),
        ],
        datetime!(2026-03-02 08:00 UTC),
    )
    .unwrap();
    Request::created(RequestId::new(id), new)
}
