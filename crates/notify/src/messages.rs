// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Message builders, one per lifecycle event.

use crate::Notification;
use gudang_domain::{ActorId, BatchId, Request, RequestId};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const SCHEDULE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Application path of a request.
#[must_use]
pub fn request_link(id: RequestId) -> String {
    format!("/requests/{id}")
}

/// Application path of a pickup batch.
#[must_use]
pub fn batch_link(id: BatchId) -> String {
    format!("/batches/{id}")
}

/// Tells the requester their request was approved.
#[must_use]
pub fn approved_for_requester(request: &Request) -> Notification {
    Notification::new(
        request.requester_id().clone(),
        format!(
            "Request {} has been approved by the supervisor",
            request.doc_number()
        ),
        request_link(request.id()),
    )
}

/// Tells every HRGA user an approved request is waiting to be scheduled.
#[must_use]
pub fn approved_for_hrga(request: &Request, hrga: &[ActorId]) -> Vec<Notification> {
    hrga.iter()
        .map(|user_id| {
            Notification::new(
                user_id.clone(),
                format!(
                    "Request {} from {} is approved and ready for pickup scheduling",
                    request.doc_number(),
                    request.dept_code()
                ),
                request_link(request.id()),
            )
        })
        .collect()
}

/// Tells the requester their request was rejected, with the reason.
#[must_use]
pub fn rejected_for_requester(request: &Request) -> Notification {
    let reason: &str = request.rejection_reason().unwrap_or_default();
    Notification::new(
        request.requester_id().clone(),
        format!("Request {} was rejected: {reason}", request.doc_number()),
        request_link(request.id()),
    )
}

/// One summary per HRGA user for a newly scheduled batch, never one per
/// member request.
#[must_use]
pub fn batch_scheduled_for_hrga(
    batch_id: BatchId,
    schedule: OffsetDateTime,
    member_count: usize,
    hrga: &[ActorId],
) -> Vec<Notification> {
    let when: String = schedule
        .format(SCHEDULE_FORMAT)
        .unwrap_or_else(|_| schedule.to_string());
    let noun: &str = if member_count == 1 {
        "request"
    } else {
        "requests"
    };
    hrga.iter()
        .map(|user_id| {
            Notification::new(
                user_id.clone(),
                format!("Pickup batch {batch_id} scheduled for {when} with {member_count} {noun}"),
                batch_link(batch_id),
            )
        })
        .collect()
}

/// Tells the requester their items were handed over.
#[must_use]
pub fn handed_over_for_requester(request: &Request) -> Notification {
    Notification::new(
        request.requester_id().clone(),
        format!(
            "Items for request {} have been handed over",
            request.doc_number()
        ),
        request_link(request.id()),
    )
}
