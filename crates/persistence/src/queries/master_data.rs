// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Department, actor and item queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use gudang_domain::{ActorId, Department, DeptCode, Item, ItemId, Role};
use tracing::debug;

use crate::data_models::{ActorRecord, ActorRow, DepartmentRow, ItemRow, actor_from_rows};
use crate::diesel_schema::{actor_departments, actors, departments, items};
use crate::error::PersistenceError;

/// Lists every department, ordered by code.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_departments(conn: &mut SqliteConnection) -> Result<Vec<Department>, PersistenceError> {
    departments::table
        .order(departments::dept_code.asc())
        .select(DepartmentRow::as_select())
        .load::<DepartmentRow>(conn)?
        .into_iter()
        .map(Department::try_from)
        .collect()
}

/// Retrieves a department by code.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the
/// department does not exist.
pub fn get_department(
    conn: &mut SqliteConnection,
    code: &DeptCode,
) -> Result<Option<Department>, PersistenceError> {
    departments::table
        .find(code.as_str())
        .select(DepartmentRow::as_select())
        .first::<DepartmentRow>(conn)
        .optional()?
        .map(Department::try_from)
        .transpose()
}

/// Retrieves an actor and their assigned departments.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the actor is
/// not registered.
pub fn get_actor(
    conn: &mut SqliteConnection,
    actor_id: &ActorId,
) -> Result<Option<ActorRecord>, PersistenceError> {
    debug!(actor_id = %actor_id, "Looking up actor");

    let Some(row) = actors::table
        .find(actor_id.as_str())
        .select(ActorRow::as_select())
        .first::<ActorRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let assigned: Vec<String> = actor_departments::table
        .filter(actor_departments::actor_id.eq(actor_id.as_str()))
        .select(actor_departments::dept_code)
        .load::<String>(conn)?;

    actor_from_rows(row, assigned).map(Some)
}

/// Lists the ids of every actor holding a role.
///
/// # Errors
///
/// Returns an error if the query fails or an id is invalid.
pub fn list_actor_ids_by_role(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<Vec<ActorId>, PersistenceError> {
    actors::table
        .filter(actors::role.eq(role.as_str()))
        .order(actors::actor_id.asc())
        .select(actors::actor_id)
        .load::<String>(conn)?
        .iter()
        .map(|id| {
            ActorId::new(id).map_err(|e| PersistenceError::CorruptRecord(format!("actor id: {e}")))
        })
        .collect()
}

/// Retrieves an item by id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the item does
/// not exist.
pub fn get_item(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Option<Item>, PersistenceError> {
    items::table
        .find(item_id.value())
        .select(ItemRow::as_select())
        .first::<ItemRow>(conn)
        .optional()?
        .map(Item::try_from)
        .transpose()
}

/// Retrieves several items at once. Unknown ids are skipped.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn get_items(
    conn: &mut SqliteConnection,
    item_ids: &[ItemId],
) -> Result<Vec<Item>, PersistenceError> {
    let ids: Vec<i64> = item_ids.iter().map(ItemId::value).collect();
    items::table
        .filter(items::item_id.eq_any(ids))
        .order(items::item_id.asc())
        .select(ItemRow::as_select())
        .load::<ItemRow>(conn)?
        .into_iter()
        .map(Item::try_from)
        .collect()
}

/// Lists items ordered by SKU, optionally only those at or below their
/// minimum stock.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_items(
    conn: &mut SqliteConnection,
    low_stock_only: bool,
) -> Result<Vec<Item>, PersistenceError> {
    let mut query = items::table.select(ItemRow::as_select()).into_boxed();
    if low_stock_only {
        query = query.filter(items::current_stock.le(items::min_stock));
    }
    query
        .order(items::sku.asc())
        .load::<ItemRow>(conn)?
        .into_iter()
        .map(Item::try_from)
        .collect()
}
