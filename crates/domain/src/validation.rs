// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ItemId, LineItem};
use std::collections::BTreeSet;

/// Validates the line items of a new request.
///
/// # Errors
///
/// Returns an error if:
/// - There are no line items
/// - A quantity is zero
/// - The same item appears on more than one line
pub fn validate_line_items(items: &[LineItem]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyItems);
    }

    let mut seen: BTreeSet<ItemId> = BTreeSet::new();
    for line in items {
        if line.quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                item_id: line.item_id,
                quantity: line.quantity,
            });
        }
        if !seen.insert(line.item_id) {
            return Err(DomainError::DuplicateLineItem {
                item_id: line.item_id,
            });
        }
    }
    Ok(())
}

/// Validates a rejection reason and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::EmptyReason` if the reason is blank.
pub fn validate_rejection_reason(reason: &str) -> Result<String, DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyReason);
    }
    Ok(trimmed.to_string())
}

/// Validates item master data fields.
///
/// # Errors
///
/// Returns `DomainError::InvalidItem` naming the first blank field.
pub fn validate_item_fields(sku: &str, name: &str, unit: &str) -> Result<(), DomainError> {
    for (field, value) in [("sku", sku), ("name", name), ("unit", unit)] {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidItem {
                field,
                message: format!("{field} cannot be empty"),
            });
        }
    }
    Ok(())
}
