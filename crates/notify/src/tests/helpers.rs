// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Notification;
use gudang_domain::{
    ActorId, DeptCode, DocNumber, ItemId, LineItem, NewRequest, Request, RequestId,
};
use time::{Month, macros::datetime};

pub fn user(id: &str) -> ActorId {
    ActorId::new(id).unwrap()
}

pub fn notification(to: &str, message: &str) -> Notification {
    Notification::new(user(to), String::from(message), String::from("/requests/1"))
}

pub fn pending_request() -> Request {
    let doc: DocNumber =
        DocNumber::new(7, DeptCode::new("MLD").unwrap(), Month::March, 2026).unwrap();
    let new: NewRequest = NewRequest::new(
        doc,
        user("admin.mld"),
        None,
        vec![LineItem::new(ItemId::new(1), 2)],
        datetime!(2026-03-02 08:00 UTC),
    )
    .unwrap();
    Request::created(RequestId::new(12), new)
}
