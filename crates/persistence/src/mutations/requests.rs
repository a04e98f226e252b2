// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang::CreatePlan;
use gudang_domain::{
    DeptCode, NewRequest, Request, RequestId, RequestStatus, StockAdjustment, StockDecrement,
    StockShortage, clamp_decrement,
};
use num_traits::ToPrimitive;
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{HandOverRecord, format_timestamp, to_unsigned};
use crate::diesel_schema::{doc_sequences, items, request_items, requests};
use crate::error::PersistenceError;

/// Allocates the next document sequence for a department and year.
///
/// The counter is bumped by a single upsert, so two writers can never
/// observe the same value. Must run inside the transaction that stores the
/// request, so a failed insert gives the number back.
///
/// # Errors
///
/// Returns an error if the upsert fails or the counter overflows `u32`.
pub fn next_sequence(
    conn: &mut SqliteConnection,
    dept_code: &DeptCode,
    year: i32,
) -> Result<u32, PersistenceError> {
    diesel::insert_into(doc_sequences::table)
        .values((
            doc_sequences::dept_code.eq(dept_code.as_str()),
            doc_sequences::year.eq(year),
            doc_sequences::last_number.eq(1_i64),
        ))
        .on_conflict((doc_sequences::dept_code, doc_sequences::year))
        .do_update()
        .set(doc_sequences::last_number.eq(doc_sequences::last_number + 1_i64))
        .execute(conn)?;

    let last: i64 = doc_sequences::table
        .find((dept_code.as_str(), year))
        .select(doc_sequences::last_number)
        .first::<i64>(conn)?;
    last.to_u32()
        .ok_or_else(|| PersistenceError::Other(format!("document sequence overflow: {last}")))
}

/// Stores a planned request under a freshly allocated document number.
///
/// # Errors
///
/// Returns an error if any insert fails. Nothing is stored and no sequence
/// number is consumed in that case.
pub fn insert_request(
    conn: &mut SqliteConnection,
    plan: &CreatePlan,
) -> Result<Request, PersistenceError> {
    let request: Request = conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let sequence: u32 = next_sequence(conn, &plan.dept_code, plan.year())?;
        let new: NewRequest = plan
            .clone()
            .into_new_request(sequence)
            .map_err(|e| PersistenceError::Other(e.to_string()))?;
        let created_at: String = format_timestamp(new.created_at)?;

        diesel::insert_into(requests::table)
            .values((
                requests::doc_number.eq(new.doc_number.to_string()),
                requests::requester_id.eq(new.requester_id.as_str()),
                requests::dept_code.eq(new.dept_code.as_str()),
                requests::status.eq(RequestStatus::Pending.as_str()),
                requests::admin_signature.eq(new.admin_signature.as_deref()),
                requests::created_at.eq(&created_at),
                requests::updated_at.eq(&created_at),
            ))
            .execute(conn)?;
        let request_id: i64 = conn.get_last_insert_rowid()?;

        let mut lines = Vec::with_capacity(new.items.len());
        for (index, line) in new.items.iter().enumerate() {
            let line_no: i32 = (index + 1)
                .to_i32()
                .ok_or_else(|| PersistenceError::Other("too many line items".to_string()))?;
            let quantity: i32 = line.quantity.to_i32().ok_or_else(|| {
                PersistenceError::Other(format!("quantity out of range: {}", line.quantity))
            })?;
            lines.push((
                request_items::request_id.eq(request_id),
                request_items::line_no.eq(line_no),
                request_items::item_id.eq(line.item_id.value()),
                request_items::quantity.eq(quantity),
            ));
        }
        diesel::insert_into(request_items::table)
            .values(&lines)
            .execute(conn)?;

        Ok(Request::created(RequestId::new(request_id), new))
    })?;

    info!(
        request_id = request.id().value(),
        doc_number = %request.doc_number(),
        dept_code = %request.dept_code(),
        "Created request"
    );
    Ok(request)
}

/// Writes the lifecycle fields of `request`, provided the stored row is
/// still in `expected`.
pub(crate) fn update_if_status(
    conn: &mut SqliteConnection,
    expected: RequestStatus,
    request: &Request,
) -> Result<(), PersistenceError> {
    let updated_at: String = format_timestamp(request.updated_at())?;
    let updated: usize = diesel::update(
        requests::table
            .filter(requests::request_id.eq(request.id().value()))
            .filter(requests::status.eq(expected.as_str())),
    )
    .set((
        requests::status.eq(request.status().as_str()),
        requests::rejection_reason.eq(request.rejection_reason()),
        requests::supervisor_signature.eq(request.supervisor_signature()),
        requests::batch_id.eq(request.batch_id().map(|b| b.value())),
        requests::updated_at.eq(&updated_at),
    ))
    .execute(conn)?;

    if updated == 0 {
        warn!(
            request_id = request.id().value(),
            expected = expected.as_str(),
            "Conditional request update matched no row"
        );
        return Err(PersistenceError::StaleState {
            entity: "request",
            id: request.id().value(),
            expected: expected.as_str().to_string(),
        });
    }
    Ok(())
}

/// Persists a lifecycle transition computed from a request read in state
/// `expected`.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the stored request is no
/// longer in `expected`.
pub fn save_transition(
    conn: &mut SqliteConnection,
    expected: RequestStatus,
    request: &Request,
) -> Result<(), PersistenceError> {
    update_if_status(conn, expected, request)?;
    debug!(
        request_id = request.id().value(),
        from = expected.as_str(),
        to = request.status().as_str(),
        "Saved request transition"
    );
    Ok(())
}

/// Completes a request and applies its stock decrements in one transaction.
///
/// Each decrement is floored at zero. Lines that asked for more than was on
/// the shelf are returned as shortages.
///
/// # Errors
///
/// Returns `PersistenceError::StaleState` if the stored request is no
/// longer in `expected`, and `PersistenceError::NotFound` for an unknown
/// item. Nothing is written in either case.
pub fn complete_request(
    conn: &mut SqliteConnection,
    expected: RequestStatus,
    request: &Request,
    adjustments: &[StockAdjustment],
) -> Result<HandOverRecord, PersistenceError> {
    let record: HandOverRecord = conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        update_if_status(conn, expected, request)?;

        let mut shortages: Vec<StockShortage> = Vec::new();
        for adjustment in adjustments {
            let current: i64 = items::table
                .find(adjustment.item_id.value())
                .select(items::current_stock)
                .first::<i64>(conn)
                .optional()?
                .ok_or_else(|| PersistenceError::NotFound(format!("item {}", adjustment.item_id)))?;
            let decrement: StockDecrement = clamp_decrement(
                adjustment.item_id,
                to_unsigned(current, "current_stock")?,
                adjustment.quantity,
            );
            conn.decrement_stock_floored(
                adjustment.item_id.value(),
                i64::from(adjustment.quantity),
            )?;
            if let Some(shortage) = decrement.shortage {
                shortages.push(shortage);
            }
        }
        Ok(HandOverRecord { shortages })
    })?;

    for shortage in &record.shortages {
        warn!(
            request_id = request.id().value(),
            item_id = shortage.item_id.value(),
            requested = shortage.requested,
            available = shortage.available,
            "Hand-over exceeded available stock; stock floored at zero"
        );
    }
    info!(
        request_id = request.id().value(),
        lines = adjustments.len(),
        "Completed request"
    );
    Ok(record)
}
