// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{BatchPlan, CreatePlan, TransitionContext, TransitionResult};
use gudang_domain::{
    ActorId, DeptCode, LineItem, Request, RequestStatus, StockAdjustment, validate_batch_members,
    validate_line_items,
};
use gudang_notify::{Notification, messages};
use time::OffsetDateTime;

/// Applies a command to a request, producing the next request value and
/// the effects of the transition.
///
/// # Arguments
///
/// * `request` - The current request (immutable)
/// * `command` - The transition to apply
/// * `ctx` - Actor, HRGA recipients and timestamp for this call
///
/// # Errors
///
/// Returns an error if:
/// - The transition is not permitted from the current status
/// - A rejection reason is blank
/// - The request is already in a batch (scheduling only)
pub fn apply(
    request: &Request,
    command: Command,
    ctx: &TransitionContext,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Approve {
            supervisor_signature,
        } => {
            let approved: Request = request.approve(supervisor_signature, ctx.now)?;

            let mut notifications: Vec<Notification> =
                vec![messages::approved_for_requester(&approved)];
            notifications.extend(messages::approved_for_hrga(
                &approved,
                &ctx.hrga_recipients,
            ));

            Ok(TransitionResult {
                request: approved,
                notifications,
                stock_adjustments: Vec::new(),
            })
        }
        Command::Reject { reason } => {
            let rejected: Request = request.reject(&reason, ctx.now)?;
            let notifications: Vec<Notification> =
                vec![messages::rejected_for_requester(&rejected)];

            Ok(TransitionResult {
                request: rejected,
                notifications,
                stock_adjustments: Vec::new(),
            })
        }
        Command::Schedule { batch_id } => {
            // The batch-created summary is emitted once per batch by the
            // caller, not once per member.
            let scheduled: Request = request.schedule(batch_id, ctx.now)?;
            Ok(TransitionResult {
                request: scheduled,
                notifications: Vec::new(),
                stock_adjustments: Vec::new(),
            })
        }
        Command::HandOver => {
            let completed: Request = request.complete(ctx.now)?;
            let stock_adjustments: Vec<StockAdjustment> = completed
                .items()
                .iter()
                .map(StockAdjustment::from)
                .collect();
            let notifications: Vec<Notification> =
                vec![messages::handed_over_for_requester(&completed)];

            Ok(TransitionResult {
                request: completed,
                notifications,
                stock_adjustments,
            })
        }
    }
}

/// Validates a request creation before any sequence number is allocated.
///
/// Authorization is the caller's concern; this checks the line items only,
/// so a rejected creation never consumes a sequence number.
///
/// # Errors
///
/// Returns an error if the line items are empty, repeat an item, or carry a
/// zero quantity.
pub fn plan_create(
    requester_id: ActorId,
    dept_code: DeptCode,
    items: Vec<LineItem>,
    admin_signature: Option<String>,
    now: OffsetDateTime,
) -> Result<CreatePlan, CoreError> {
    validate_line_items(&items)?;
    Ok(CreatePlan {
        requester_id,
        dept_code,
        items,
        admin_signature,
        created_at: now,
    })
}

/// Validates a batch creation against the current member requests.
///
/// All-or-nothing: one ineligible member fails the whole plan.
///
/// # Errors
///
/// Returns `DomainError::EmptyBatch` for no members and
/// `DomainError::InvalidMembership` for the first ineligible one.
pub fn plan_batch(
    members: &[Request],
    schedule_datetime: OffsetDateTime,
    ctx: &TransitionContext,
) -> Result<BatchPlan, CoreError> {
    validate_batch_members(members)?;
    Ok(BatchPlan {
        schedule_datetime,
        created_by: ctx.actor.clone(),
        created_at: ctx.now,
        members: members.to_vec(),
        hrga_recipients: ctx.hrga_recipients.clone(),
    })
}

/// Returns true once every member of a batch has been handed over.
#[must_use]
pub fn batch_fulfilled(members: &[Request]) -> bool {
    !members.is_empty()
        && members
            .iter()
            .all(|r| r.status() == RequestStatus::Completed)
}
