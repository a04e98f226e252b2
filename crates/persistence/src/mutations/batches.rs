// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pickup batch mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang::BatchPlan;
use gudang_domain::{BatchId, BatchStatus, PickupBatch, Request, RequestStatus};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::pickup_batches;
use crate::error::PersistenceError;
use crate::mutations::requests::update_if_status;

/// Creates a batch and schedules every member, all or nothing.
///
/// Each member goes through its own schedule transition once the batch id
/// is known, and is written only if the stored row is still `approved_spv`.
/// If any member moved on since it was validated, the whole batch is rolled
/// back.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` naming the first member that is
/// no longer eligible. Nothing is stored in that case.
pub fn insert_batch(
    conn: &mut SqliteConnection,
    plan: &BatchPlan,
) -> Result<PickupBatch, PersistenceError> {
    let schedule: String = format_timestamp(plan.schedule_datetime)?;
    let created_at: String = format_timestamp(plan.created_at)?;

    let batch_id: i64 = conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(pickup_batches::table)
            .values((
                pickup_batches::schedule_datetime.eq(&schedule),
                pickup_batches::status.eq(BatchStatus::Pending.as_str()),
                pickup_batches::created_by.eq(plan.created_by.as_str()),
                pickup_batches::created_at.eq(&created_at),
            ))
            .execute(conn)?;
        let batch_id: i64 = conn.get_last_insert_rowid()?;

        let scheduled: Vec<Request> = plan
            .scheduled_members(BatchId::new(batch_id))
            .map_err(|e| PersistenceError::Other(e.to_string()))?;
        for member in &scheduled {
            update_if_status(conn, RequestStatus::ApprovedSpv, member).inspect_err(|_| {
                warn!(
                    request_id = member.id().value(),
                    "Batch member no longer eligible; rolling back batch"
                );
            })?;
        }
        Ok(batch_id)
    })?;

    info!(
        batch_id,
        members = plan.members.len(),
        schedule = %schedule,
        "Created pickup batch"
    );
    Ok(PickupBatch {
        id: BatchId::new(batch_id),
        schedule_datetime: plan.schedule_datetime,
        status: BatchStatus::Pending,
        created_by: plan.created_by.clone(),
        created_at: plan.created_at,
        request_ids: plan.request_ids(),
    })
}

/// Moves a pending batch to `approved`.
///
/// Returns false when the batch was not pending, which includes a
/// concurrent writer having done it first.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_batch_fulfilled(
    conn: &mut SqliteConnection,
    batch_id: BatchId,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        pickup_batches::table
            .filter(pickup_batches::batch_id.eq(batch_id.value()))
            .filter(pickup_batches::status.eq(BatchStatus::Pending.as_str())),
    )
    .set(pickup_batches::status.eq(BatchStatus::Approved.as_str()))
    .execute(conn)?;

    if updated > 0 {
        info!(batch_id = batch_id.value(), "Pickup batch fulfilled");
    }
    Ok(updated > 0)
}
