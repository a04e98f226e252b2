// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pickup batch queries.
//!
//! Membership is not stored on the batch row. A request belongs to a batch
//! when its `batch_id` references it, so members are read from `requests`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang_domain::{BatchId, BatchStatus, PickupBatch};
use std::collections::BTreeMap;

use crate::data_models::{BatchRow, batch_from_row};
use crate::diesel_schema::{pickup_batches, requests};
use crate::error::PersistenceError;

fn members_of(
    conn: &mut SqliteConnection,
    batch_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<i64>>, PersistenceError> {
    let rows: Vec<(Option<i64>, i64)> = requests::table
        .filter(requests::batch_id.eq_any(batch_ids))
        .order((requests::batch_id.asc(), requests::request_id.asc()))
        .select((requests::batch_id, requests::request_id))
        .load::<(Option<i64>, i64)>(conn)?;

    let mut grouped: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (batch_id, request_id) in rows {
        if let Some(batch_id) = batch_id {
            grouped.entry(batch_id).or_default().push(request_id);
        }
    }
    Ok(grouped)
}

/// Retrieves a pickup batch with its member request ids.
///
/// # Errors
///
/// Returns an error if the query fails or the stored batch is invalid.
/// Returns `Ok(None)` if the batch does not exist.
pub fn get_batch(
    conn: &mut SqliteConnection,
    batch_id: BatchId,
) -> Result<Option<PickupBatch>, PersistenceError> {
    let Some(row) = pickup_batches::table
        .find(batch_id.value())
        .select(BatchRow::as_select())
        .first::<BatchRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };
    let mut members: BTreeMap<i64, Vec<i64>> = members_of(conn, &[row.batch_id])?;
    let own: Vec<i64> = members.remove(&row.batch_id).unwrap_or_default();
    batch_from_row(&row, own).map(Some)
}

/// Lists pickup batches ordered by schedule, optionally by status.
///
/// # Errors
///
/// Returns an error if the query fails or a stored batch is invalid.
pub fn list_batches(
    conn: &mut SqliteConnection,
    status: Option<BatchStatus>,
) -> Result<Vec<PickupBatch>, PersistenceError> {
    let mut query = pickup_batches::table
        .select(BatchRow::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(pickup_batches::status.eq(status.as_str()));
    }
    let rows: Vec<BatchRow> = query
        .order((
            pickup_batches::schedule_datetime.asc(),
            pickup_batches::batch_id.asc(),
        ))
        .load::<BatchRow>(conn)?;

    let ids: Vec<i64> = rows.iter().map(|r| r.batch_id).collect();
    let mut members: BTreeMap<i64, Vec<i64>> = members_of(conn, &ids)?;
    rows.into_iter()
        .map(|row| {
            let own: Vec<i64> = members.remove(&row.batch_id).unwrap_or_default();
            batch_from_row(&row, own)
        })
        .collect()
}
