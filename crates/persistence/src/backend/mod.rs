// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific helpers.
//!
//! Everything in `queries/` and `mutations/` is written in Diesel DSL. The
//! few operations Diesel cannot express (PRAGMAs, `last_insert_rowid()`, the
//! clamped stock decrement) live in the backend module and are reached
//! through [`PersistenceBackend`].

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// This is a startup-time check to ensure referential integrity
    /// constraints are enforced by the database backend.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Decrements an item's stock in one statement, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn decrement_stock_floored(&mut self, item_id: i64, quantity: i64)
    -> Result<usize, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn decrement_stock_floored(
        &mut self,
        item_id: i64,
        quantity: i64,
    ) -> Result<usize, PersistenceError> {
        sqlite::decrement_stock_floored(self, item_id, quantity)
    }
}
