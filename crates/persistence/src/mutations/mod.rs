// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every mutation that touches more than one row runs inside an immediate
//! transaction, so a failure part-way leaves the database as it was.
//! Lifecycle updates are conditional on the status the caller read; a
//! concurrent writer that got there first makes the update match nothing,
//! which surfaces as `PersistenceError::StaleState`.
//!
//! ## Module Organization
//!
//! - `master_data`: Departments, actors, items, stock receipts
//! - `requests`: Request creation and lifecycle updates
//! - `batches`: Pickup batch creation and fulfilment
//! - `notifications`: Notification inbox writes

pub mod batches;
pub mod master_data;
pub mod notifications;
pub mod requests;
