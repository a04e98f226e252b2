// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Department, actor and item mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gudang_domain::{Actor, Department, DeptCode, Item, ItemId};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{ItemRow, to_stored};
use crate::diesel_schema::{actor_departments, actors, departments, items};
use crate::error::PersistenceError;

/// Inserts a department.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the code is taken.
pub fn insert_department(
    conn: &mut SqliteConnection,
    department: &Department,
) -> Result<(), PersistenceError> {
    diesel::insert_into(departments::table)
        .values((
            departments::dept_code.eq(department.code.as_str()),
            departments::name.eq(&department.name),
            departments::category.eq(department.category.as_str()),
        ))
        .execute(conn)?;
    debug!(dept_code = %department.code, "Inserted department");
    Ok(())
}

/// Inserts an actor and its department assignments.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the id is taken, and
/// `PersistenceError::ConstraintViolation` for an unknown department.
pub fn insert_actor(
    conn: &mut SqliteConnection,
    actor: &Actor,
    display_name: &str,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(actors::table)
            .values((
                actors::actor_id.eq(actor.id.as_str()),
                actors::display_name.eq(display_name),
                actors::role.eq(actor.role.as_str()),
                actors::primary_department
                    .eq(actor.primary_department.as_ref().map(DeptCode::as_str)),
            ))
            .execute(conn)?;

        let assignments: Vec<_> = actor
            .departments
            .iter()
            .map(|dept| {
                (
                    actor_departments::actor_id.eq(actor.id.as_str()),
                    actor_departments::dept_code.eq(dept.as_str()),
                )
            })
            .collect();
        if !assignments.is_empty() {
            diesel::insert_into(actor_departments::table)
                .values(&assignments)
                .execute(conn)?;
        }
        Ok(())
    })?;
    info!(actor_id = %actor.id, role = %actor.role.as_str(), "Registered actor");
    Ok(())
}

/// Inserts an item and returns it with its assigned id.
///
/// # Errors
///
/// Returns `PersistenceError::Duplicate` if the SKU is taken.
pub fn insert_item(
    conn: &mut SqliteConnection,
    sku: &str,
    name: &str,
    unit: &str,
    min_stock: u64,
    initial_stock: u64,
) -> Result<Item, PersistenceError> {
    let min_stock_stored: i64 = to_stored(min_stock, "min_stock")?;
    let initial_stored: i64 = to_stored(initial_stock, "current_stock")?;

    let item_id: i64 = conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(items::table)
            .values((
                items::sku.eq(sku),
                items::name.eq(name),
                items::unit.eq(unit),
                items::current_stock.eq(initial_stored),
                items::min_stock.eq(min_stock_stored),
            ))
            .execute(conn)?;
        conn.get_last_insert_rowid()
    })?;
    debug!(item_id, sku, "Inserted item");

    Ok(Item {
        id: ItemId::new(item_id),
        sku: sku.to_string(),
        name: name.to_string(),
        unit: unit.to_string(),
        current_stock: initial_stock,
        min_stock,
    })
}

/// Updates an item's descriptive fields and threshold. Stock is untouched.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown item.
pub fn update_item(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    name: &str,
    unit: &str,
    min_stock: u64,
) -> Result<Item, PersistenceError> {
    let min_stock_stored: i64 = to_stored(min_stock, "min_stock")?;
    let updated: usize = diesel::update(items::table.find(item_id.value()))
        .set((
            items::name.eq(name),
            items::unit.eq(unit),
            items::min_stock.eq(min_stock_stored),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("item {item_id}")));
    }
    reload_item(conn, item_id)
}

/// Adds received goods to an item's stock.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for an unknown item.
pub fn receive_stock(
    conn: &mut SqliteConnection,
    item_id: ItemId,
    quantity: u64,
) -> Result<Item, PersistenceError> {
    let quantity_stored: i64 = to_stored(quantity, "received quantity")?;
    let updated: usize = diesel::update(items::table.find(item_id.value()))
        .set(items::current_stock.eq(items::current_stock + quantity_stored))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("item {item_id}")));
    }
    info!(item_id = item_id.value(), quantity, "Received stock");
    reload_item(conn, item_id)
}

fn reload_item(conn: &mut SqliteConnection, item_id: ItemId) -> Result<Item, PersistenceError> {
    items::table
        .find(item_id.value())
        .select(ItemRow::as_select())
        .first::<ItemRow>(conn)?
        .try_into()
}
