// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod batch;
mod doc_number;
mod error;
mod request;
mod request_status;
mod scope;
mod stock;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use batch::{BatchStatus, PickupBatch, validate_batch_members};
pub use doc_number::{DocNumber, format_doc_number, parse_doc_number, roman_month};
pub use request::{NewRequest, Request, RequestParts};
pub use request_status::RequestStatus;
pub use scope::{Scope, ScopeRules, ScopeWidenings};
pub use stock::{StockAdjustment, StockDecrement, StockShortage, clamp_decrement};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Actor, ActorId, BatchId, Department, DepartmentCategory, DeptCode, Item, ItemId, LineItem,
    RequestId, Role,
};
pub use validation::{validate_item_fields, validate_line_items, validate_rejection_reason};
