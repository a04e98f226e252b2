// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Gudang request system.
//!
//! Stores departments, actors, items, requests, pickup batches and the
//! notification inbox in `SQLite` through Diesel.
//!
//! ## Concurrency
//!
//! Each [`Persistence`] owns one connection. Several processes or threads
//! may open the same database file; writers are serialized by `SQLite`
//! (immediate transactions with a busy timeout), and every lifecycle write
//! is conditional on the status the caller read. Concretely:
//!
//! - document sequence numbers are allocated by a single upsert inside the
//!   transaction that stores the request, so numbers never repeat
//! - two writers moving the same request race on a conditional update; the
//!   loser gets [`PersistenceError::StaleState`]
//! - batch creation schedules every member or none
//! - stock decrements are floored at zero in one statement
//!
//! ## Testing
//!
//! Tests run against isolated shared-cache in-memory databases created by
//! [`Persistence::new_in_memory`]. Multi-connection tests use temporary
//! database files.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use gudang::{BatchPlan, CreatePlan};
use gudang_domain::{
    Actor, ActorId, BatchId, BatchStatus, Department, DeptCode, Item, ItemId, PickupBatch, Request,
    RequestId, RequestStatus, Role, StockAdjustment,
};
use gudang_notify::Notification;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{ActorRecord, HandOverRecord, RequestFilter, StoredNotification};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// The file is created and migrated if needed. Any number of adapters
    /// may be opened on the same file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Master data
    // ========================================================================

    /// Inserts a department.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the code is taken.
    pub fn insert_department(&mut self, department: &Department) -> Result<(), PersistenceError> {
        mutations::master_data::insert_department(&mut self.conn, department)
    }

    /// Lists every department, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_departments(&mut self) -> Result<Vec<Department>, PersistenceError> {
        queries::master_data::list_departments(&mut self.conn)
    }

    /// Retrieves a department by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_department(
        &mut self,
        code: &DeptCode,
    ) -> Result<Option<Department>, PersistenceError> {
        queries::master_data::get_department(&mut self.conn, code)
    }

    /// Inserts an actor and its department assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or a department is unknown.
    pub fn insert_actor(
        &mut self,
        actor: &Actor,
        display_name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::master_data::insert_actor(&mut self.conn, actor, display_name)
    }

    /// Retrieves an actor by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_actor(
        &mut self,
        actor_id: &ActorId,
    ) -> Result<Option<ActorRecord>, PersistenceError> {
        queries::master_data::get_actor(&mut self.conn, actor_id)
    }

    /// Lists the ids of every actor holding `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_actor_ids_by_role(&mut self, role: Role) -> Result<Vec<ActorId>, PersistenceError> {
        queries::master_data::list_actor_ids_by_role(&mut self.conn, role)
    }

    /// Inserts an item.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Duplicate` if the SKU is taken.
    pub fn insert_item(
        &mut self,
        sku: &str,
        name: &str,
        unit: &str,
        min_stock: u64,
        initial_stock: u64,
    ) -> Result<Item, PersistenceError> {
        mutations::master_data::insert_item(
            &mut self.conn,
            sku,
            name,
            unit,
            min_stock,
            initial_stock,
        )
    }

    /// Updates an item's name, unit and threshold.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for an unknown item.
    pub fn update_item(
        &mut self,
        item_id: ItemId,
        name: &str,
        unit: &str,
        min_stock: u64,
    ) -> Result<Item, PersistenceError> {
        mutations::master_data::update_item(&mut self.conn, item_id, name, unit, min_stock)
    }

    /// Adds received goods to an item's stock.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for an unknown item.
    pub fn receive_stock(
        &mut self,
        item_id: ItemId,
        quantity: u64,
    ) -> Result<Item, PersistenceError> {
        mutations::master_data::receive_stock(&mut self.conn, item_id, quantity)
    }

    /// Retrieves an item by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item(&mut self, item_id: ItemId) -> Result<Option<Item>, PersistenceError> {
        queries::master_data::get_item(&mut self.conn, item_id)
    }

    /// Retrieves the items with the given ids. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_items(&mut self, item_ids: &[ItemId]) -> Result<Vec<Item>, PersistenceError> {
        queries::master_data::get_items(&mut self.conn, item_ids)
    }

    /// Lists items by SKU, optionally only those at or below threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_items(&mut self, low_stock_only: bool) -> Result<Vec<Item>, PersistenceError> {
        queries::master_data::list_items(&mut self.conn, low_stock_only)
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Stores a planned request under the next document number for its
    /// department and year.
    ///
    /// # Errors
    ///
    /// Returns an error if storing fails. No sequence number is consumed.
    pub fn insert_request(&mut self, plan: &CreatePlan) -> Result<Request, PersistenceError> {
        mutations::requests::insert_request(&mut self.conn, plan)
    }

    /// Retrieves a request with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored request is invalid.
    pub fn get_request(
        &mut self,
        request_id: RequestId,
    ) -> Result<Option<Request>, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)
    }

    /// Retrieves several requests in the given order.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` for the first unknown id.
    pub fn get_requests(
        &mut self,
        request_ids: &[RequestId],
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::get_requests(&mut self.conn, request_ids)
    }

    /// Lists requests matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests(
        &mut self,
        filter: &RequestFilter,
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_requests(&mut self.conn, filter)
    }

    /// Counts requests per status, optionally within a set of departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_requests_by_status(
        &mut self,
        departments: Option<&BTreeSet<DeptCode>>,
    ) -> Result<BTreeMap<RequestStatus, u64>, PersistenceError> {
        queries::requests::count_requests_by_status(&mut self.conn, departments)
    }

    /// Persists a transition computed from a request read in `expected`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the request moved on.
    pub fn save_transition(
        &mut self,
        expected: RequestStatus,
        request: &Request,
    ) -> Result<(), PersistenceError> {
        mutations::requests::save_transition(&mut self.conn, expected, request)
    }

    /// Completes a request and applies its stock decrements atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if the request moved on.
    pub fn complete_request(
        &mut self,
        expected: RequestStatus,
        request: &Request,
        adjustments: &[StockAdjustment],
    ) -> Result<HandOverRecord, PersistenceError> {
        mutations::requests::complete_request(&mut self.conn, expected, request, adjustments)
    }

    // ========================================================================
    // Pickup batches
    // ========================================================================

    /// Creates a pickup batch and schedules every member, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleState` if a member is no longer
    /// eligible. Nothing is stored in that case.
    pub fn insert_batch(&mut self, plan: &BatchPlan) -> Result<PickupBatch, PersistenceError> {
        mutations::batches::insert_batch(&mut self.conn, plan)
    }

    /// Retrieves a pickup batch with its members.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_batch(
        &mut self,
        batch_id: BatchId,
    ) -> Result<Option<PickupBatch>, PersistenceError> {
        queries::batches::get_batch(&mut self.conn, batch_id)
    }

    /// Lists pickup batches by schedule, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_batches(
        &mut self,
        status: Option<BatchStatus>,
    ) -> Result<Vec<PickupBatch>, PersistenceError> {
        queries::batches::list_batches(&mut self.conn, status)
    }

    /// Moves a pending batch to `approved`. Returns false if it was not
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_batch_fulfilled(&mut self, batch_id: BatchId) -> Result<bool, PersistenceError> {
        mutations::batches::mark_batch_fulfilled(&mut self.conn, batch_id)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Stores a notification in its recipient's inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is unknown.
    pub fn insert_notification(
        &mut self,
        notification: &Notification,
        at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::notifications::insert_notification(&mut self.conn, notification, at)
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notifications(
        &mut self,
        user_id: &ActorId,
        unread_only: bool,
    ) -> Result<Vec<StoredNotification>, PersistenceError> {
        queries::notifications::list_notifications(&mut self.conn, user_id, unread_only)
    }

    /// Counts a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_unread_notifications(
        &mut self,
        user_id: &ActorId,
    ) -> Result<u64, PersistenceError> {
        queries::notifications::count_unread(&mut self.conn, user_id)
    }

    /// Marks one notification read. Returns false if it is not the user's.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_notification_read(
        &mut self,
        user_id: &ActorId,
        notification_id: i64,
    ) -> Result<bool, PersistenceError> {
        mutations::notifications::mark_notification_read(&mut self.conn, user_id, notification_id)
    }

    /// Marks all of a user's notifications read, returning how many changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_notifications_read(
        &mut self,
        user_id: &ActorId,
    ) -> Result<usize, PersistenceError> {
        mutations::notifications::mark_all_notifications_read(&mut self.conn, user_id)
    }
}
