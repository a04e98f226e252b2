// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Rows are plain Diesel structs mirroring the tables. Every conversion
//! back into a domain value goes through the domain constructors, so a row
//! that breaks an invariant surfaces as `PersistenceError::CorruptRecord`
//! instead of a malformed aggregate.

use diesel::prelude::*;
use gudang_domain::{
    Actor, ActorId, BatchId, BatchStatus, Department, DepartmentCategory, DeptCode, DocNumber,
    Item, ItemId, LineItem, PickupBatch, Request, RequestId, RequestParts, RequestStatus, Role,
    StockShortage,
};
use num_traits::ToPrimitive;
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{
    actors, departments, items, notifications, pickup_batches, request_items, requests,
};
use crate::error::PersistenceError;

/// Diesel Queryable struct for department rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = departments)]
pub struct DepartmentRow {
    pub dept_code: String,
    pub name: String,
    pub category: String,
}

/// Diesel Queryable struct for actor rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = actors)]
pub struct ActorRow {
    pub actor_id: String,
    pub display_name: String,
    pub role: String,
    pub primary_department: Option<String>,
}

/// Diesel Queryable struct for item rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = items)]
pub struct ItemRow {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub current_stock: i64,
    pub min_stock: i64,
}

/// Diesel Queryable struct for request rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = requests)]
pub struct RequestRow {
    pub request_id: i64,
    pub doc_number: String,
    pub requester_id: String,
    pub dept_code: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub admin_signature: Option<String>,
    pub supervisor_signature: Option<String>,
    pub batch_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Queryable struct for request line rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = request_items)]
pub struct RequestItemRow {
    pub request_id: i64,
    pub line_no: i32,
    pub item_id: i64,
    pub quantity: i32,
}

/// Diesel Queryable struct for pickup batch rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = pickup_batches)]
pub struct BatchRow {
    pub batch_id: i64,
    pub schedule_datetime: String,
    pub status: String,
    pub created_by: String,
    pub created_at: String,
}

/// Diesel Queryable struct for notification rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = notifications)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub user_id: String,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: String,
}

/// An actor together with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRecord {
    pub actor: Actor,
    pub display_name: String,
}

/// A notification as stored in a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNotification {
    pub notification_id: i64,
    pub user_id: ActorId,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

/// Filter for request listings.
///
/// `departments: None` means no department filter. `Some` of an empty set
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub departments: Option<BTreeSet<DeptCode>>,
    pub status: Option<RequestStatus>,
    pub batch_id: Option<BatchId>,
}

/// What a committed hand-over did to stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandOverRecord {
    /// Lines that asked for more than was on the shelf.
    pub shortages: Vec<StockShortage>,
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented as RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if the text is not RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRecord(format!("timestamp '{text}': {e}")))
}

/// Converts a stored count or stock level to the unsigned domain value.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` for a negative value.
pub fn to_unsigned(value: i64, what: &str) -> Result<u64, PersistenceError> {
    value
        .to_u64()
        .ok_or_else(|| PersistenceError::CorruptRecord(format!("negative {what}: {value}")))
}

/// Converts an unsigned domain value to its stored form.
///
/// # Errors
///
/// Returns an error if the value does not fit in a signed 64-bit column.
pub fn to_stored(value: u64, what: &str) -> Result<i64, PersistenceError> {
    value
        .to_i64()
        .ok_or_else(|| PersistenceError::Other(format!("{what} out of range: {value}")))
}

fn corrupt<E: std::fmt::Display>(what: &str) -> impl FnOnce(E) -> PersistenceError + '_ {
    move |e| PersistenceError::CorruptRecord(format!("{what}: {e}"))
}

impl TryFrom<DepartmentRow> for Department {
    type Error = PersistenceError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        let code: DeptCode = DeptCode::new(&row.dept_code).map_err(corrupt("department code"))?;
        let category: DepartmentCategory =
            DepartmentCategory::from_str(&row.category).map_err(corrupt("department category"))?;
        Ok(Self::new(code, row.name, category))
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = PersistenceError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ItemId::new(row.item_id),
            sku: row.sku,
            name: row.name,
            unit: row.unit,
            current_stock: to_unsigned(row.current_stock, "current_stock")?,
            min_stock: to_unsigned(row.min_stock, "min_stock")?,
        })
    }
}

impl TryFrom<NotificationRow> for StoredNotification {
    type Error = PersistenceError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_id: row.notification_id,
            user_id: ActorId::new(&row.user_id).map_err(corrupt("notification user"))?,
            message: row.message,
            link: row.link,
            is_read: row.is_read,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Builds an actor from its row and assigned departments.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if any stored value is invalid.
pub fn actor_from_rows(
    row: ActorRow,
    assigned: Vec<String>,
) -> Result<ActorRecord, PersistenceError> {
    let id: ActorId = ActorId::new(&row.actor_id).map_err(corrupt("actor id"))?;
    let role: Role = Role::from_str(&row.role).map_err(corrupt("actor role"))?;
    let mut actor: Actor = Actor::new(id, role);
    if let Some(primary) = row.primary_department {
        actor = actor.with_primary_department(
            DeptCode::new(&primary).map_err(corrupt("primary department"))?,
        );
    }
    for code in assigned {
        actor =
            actor.with_department(DeptCode::new(&code).map_err(corrupt("assigned department"))?);
    }
    Ok(ActorRecord {
        actor,
        display_name: row.display_name,
    })
}

/// Rebuilds a request aggregate from its row and line rows.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if any stored value is invalid
/// or the aggregate invariants do not hold.
pub fn request_from_rows(
    row: RequestRow,
    lines: Vec<RequestItemRow>,
) -> Result<Request, PersistenceError> {
    let mut items: Vec<LineItem> = Vec::with_capacity(lines.len());
    for line in lines {
        let quantity: u32 = line
            .quantity
            .to_u32()
            .ok_or_else(|| PersistenceError::CorruptRecord(format!("quantity {}", line.quantity)))?;
        items.push(LineItem::new(ItemId::new(line.item_id), quantity));
    }

    let parts: RequestParts = RequestParts {
        id: RequestId::new(row.request_id),
        doc_number: DocNumber::from_str(&row.doc_number).map_err(corrupt("doc number"))?,
        requester_id: ActorId::new(&row.requester_id).map_err(corrupt("requester"))?,
        dept_code: DeptCode::new(&row.dept_code).map_err(corrupt("request department"))?,
        status: RequestStatus::from_str(&row.status).map_err(corrupt("request status"))?,
        rejection_reason: row.rejection_reason,
        admin_signature: row.admin_signature,
        supervisor_signature: row.supervisor_signature,
        batch_id: row.batch_id.map(BatchId::new),
        items,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    };
    Request::restore(parts).map_err(corrupt("request"))
}

/// Builds a pickup batch from its row and member ids.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if any stored value is invalid.
pub fn batch_from_row(
    row: &BatchRow,
    members: Vec<i64>,
) -> Result<PickupBatch, PersistenceError> {
    Ok(PickupBatch {
        id: BatchId::new(row.batch_id),
        schedule_datetime: parse_timestamp(&row.schedule_datetime)?,
        status: BatchStatus::from_str(&row.status).map_err(corrupt("batch status"))?,
        created_by: ActorId::new(&row.created_by).map_err(corrupt("batch creator"))?,
        created_at: parse_timestamp(&row.created_at)?,
        request_ids: members.into_iter().map(RequestId::new).collect(),
    })
}
