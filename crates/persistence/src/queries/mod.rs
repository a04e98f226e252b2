// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `master_data`: Departments, actors, items
//! - `requests`: Request aggregates, listings and counts
//! - `batches`: Pickup batches
//! - `notifications`: Notification inbox

pub mod batches;
pub mod master_data;
pub mod notifications;
pub mod requests;
