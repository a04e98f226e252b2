// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang_domain::{DeptCode, Request, RequestId, RequestStatus};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::data_models::{
    RequestFilter, RequestItemRow, RequestRow, request_from_rows,
};
use crate::diesel_schema::{request_items, requests};
use crate::error::PersistenceError;

fn load_lines(
    conn: &mut SqliteConnection,
    request_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<RequestItemRow>>, PersistenceError> {
    let rows: Vec<RequestItemRow> = request_items::table
        .filter(request_items::request_id.eq_any(request_ids))
        .order((request_items::request_id.asc(), request_items::line_no.asc()))
        .select(RequestItemRow::as_select())
        .load::<RequestItemRow>(conn)?;

    let mut grouped: BTreeMap<i64, Vec<RequestItemRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.request_id).or_default().push(row);
    }
    Ok(grouped)
}

fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<RequestRow>,
) -> Result<Vec<Request>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.request_id).collect();
    let mut lines: BTreeMap<i64, Vec<RequestItemRow>> = load_lines(conn, &ids)?;
    rows.into_iter()
        .map(|row| {
            let own: Vec<RequestItemRow> = lines.remove(&row.request_id).unwrap_or_default();
            request_from_rows(row, own)
        })
        .collect()
}

/// Retrieves a request with its line items.
///
/// # Errors
///
/// Returns an error if the query fails or the stored request is invalid.
/// Returns `Ok(None)` if the request does not exist.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: RequestId,
) -> Result<Option<Request>, PersistenceError> {
    let Some(row) = requests::table
        .find(request_id.value())
        .select(RequestRow::as_select())
        .first::<RequestRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![row])?.pop())
}

/// Retrieves several requests, in the order of `request_ids`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` naming the first unknown id, and an
/// error if the query fails.
pub fn get_requests(
    conn: &mut SqliteConnection,
    request_ids: &[RequestId],
) -> Result<Vec<Request>, PersistenceError> {
    let ids: Vec<i64> = request_ids.iter().map(RequestId::value).collect();
    let rows: Vec<RequestRow> = requests::table
        .filter(requests::request_id.eq_any(&ids))
        .select(RequestRow::as_select())
        .load::<RequestRow>(conn)?;
    let mut by_id: BTreeMap<RequestId, Request> = assemble(conn, rows)?
        .into_iter()
        .map(|r| (r.id(), r))
        .collect();

    let mut ordered: Vec<Request> = Vec::with_capacity(request_ids.len());
    for id in request_ids {
        let request: Request = by_id
            .remove(id)
            .ok_or_else(|| PersistenceError::NotFound(format!("request {id}")))?;
        ordered.push(request);
    }
    Ok(ordered)
}

/// Lists requests matching a filter, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored request is invalid.
pub fn list_requests(
    conn: &mut SqliteConnection,
    filter: &RequestFilter,
) -> Result<Vec<Request>, PersistenceError> {
    if filter.departments.as_ref().is_some_and(BTreeSet::is_empty) {
        return Ok(Vec::new());
    }

    let mut query = requests::table
        .select(RequestRow::as_select())
        .into_boxed();

    if let Some(departments) = &filter.departments {
        let codes: Vec<&str> = departments.iter().map(DeptCode::as_str).collect();
        query = query.filter(requests::dept_code.eq_any(codes));
    }
    if let Some(status) = filter.status {
        query = query.filter(requests::status.eq(status.as_str()));
    }
    if let Some(batch_id) = filter.batch_id {
        query = query.filter(requests::batch_id.eq(batch_id.value()));
    }

    let rows: Vec<RequestRow> = query
        .order((requests::created_at.desc(), requests::request_id.desc()))
        .load::<RequestRow>(conn)?;
    assemble(conn, rows)
}

/// Counts requests per status, optionally within a set of departments.
///
/// Every status is present in the result, with zero where nothing matches.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_requests_by_status(
    conn: &mut SqliteConnection,
    departments: Option<&BTreeSet<DeptCode>>,
) -> Result<BTreeMap<RequestStatus, u64>, PersistenceError> {
    let mut query = requests::table.select(requests::status).into_boxed();
    if let Some(departments) = departments {
        let codes: Vec<&str> = departments.iter().map(DeptCode::as_str).collect();
        query = query.filter(requests::dept_code.eq_any(codes));
    }
    let statuses: Vec<String> = query.load::<String>(conn)?;

    let mut counts: BTreeMap<RequestStatus, u64> =
        RequestStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for status in statuses {
        let status: RequestStatus = RequestStatus::from_str(&status)
            .map_err(|e| PersistenceError::CorruptRecord(format!("request status: {e}")))?;
        *counts.entry(status).or_insert(0) += 1;
    }
    Ok(counts)
}
