// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::apply;
use crate::command::Command;
use crate::error::CoreError;
use gudang_domain::{
    ActorId, BatchId, DeptCode, DocNumber, LineItem, NewRequest, Request, RequestId,
    StockAdjustment,
};
use gudang_notify::{Notification, messages};
use time::{Month, OffsetDateTime};

/// Who is acting, who else must hear about it, and when.
///
/// Built fresh for every call; never cached between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionContext {
    /// The actor performing the transition.
    pub actor: ActorId,
    /// Every HRGA user, for fan-out notifications.
    pub hrga_recipients: Vec<ActorId>,
    /// The transition timestamp.
    pub now: OffsetDateTime,
}

impl TransitionContext {
    #[must_use]
    pub const fn new(actor: ActorId, hrga_recipients: Vec<ActorId>, now: OffsetDateTime) -> Self {
        Self {
            actor,
            hrga_recipients,
            now,
        }
    }
}

/// The result of a successful request transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. Nothing here has been applied yet; the caller persists the
/// request, applies the stock adjustments, then emits the notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The request after the transition.
    pub request: Request,
    /// Notifications to emit once the transition is committed.
    pub notifications: Vec<Notification>,
    /// Stock to take off the shelf (hand-over only).
    pub stock_adjustments: Vec<StockAdjustment>,
}

/// A validated request creation, waiting for its sequence number.
///
/// The sequence key is `(dept_code, year)`; `month` and `year` come from
/// the creation timestamp, never from the time the number is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub requester_id: ActorId,
    pub dept_code: DeptCode,
    pub items: Vec<LineItem>,
    pub admin_signature: Option<String>,
    pub created_at: OffsetDateTime,
}

impl CreatePlan {
    #[must_use]
    pub const fn month(&self) -> Month {
        self.created_at.month()
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.created_at.year()
    }

    /// Builds the request once a sequence number has been allocated.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is zero or the year cannot be
    /// printed as four digits.
    pub fn into_new_request(self, sequence: u32) -> Result<NewRequest, CoreError> {
        let month: Month = self.month();
        let year: i32 = self.year();
        let doc_number: DocNumber = DocNumber::new(sequence, self.dept_code, month, year)?;
        Ok(NewRequest::new(
            doc_number,
            self.requester_id,
            self.admin_signature,
            self.items,
            self.created_at,
        )?)
    }
}

/// A validated batch creation, waiting for its batch id.
///
/// `members` are the requests as they were loaded and validated, in the
/// order the caller listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub schedule_datetime: OffsetDateTime,
    pub created_by: ActorId,
    pub created_at: OffsetDateTime,
    pub members: Vec<Request>,
    pub(crate) hrga_recipients: Vec<ActorId>,
}

impl BatchPlan {
    #[must_use]
    pub fn request_ids(&self) -> Vec<RequestId> {
        self.members.iter().map(Request::id).collect()
    }

    /// Runs the schedule transition on every member once the batch has an id.
    ///
    /// # Errors
    ///
    /// Returns an error if any member can no longer be scheduled.
    pub fn scheduled_members(&self, batch_id: BatchId) -> Result<Vec<Request>, CoreError> {
        let ctx: TransitionContext =
            TransitionContext::new(self.created_by.clone(), Vec::new(), self.created_at);
        self.members
            .iter()
            .map(|member| {
                apply(member, Command::Schedule { batch_id }, &ctx).map(|result| result.request)
            })
            .collect()
    }

    /// The aggregated batch-created summary, one per HRGA user.
    #[must_use]
    pub fn notifications(&self, batch_id: BatchId) -> Vec<Notification> {
        messages::batch_scheduled_for_hrga(
            batch_id,
            self.schedule_datetime,
            self.members.len(),
            &self.hrga_recipients,
        )
    }
}
