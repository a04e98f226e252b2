// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stock adjustment on hand-over.
//!
//! Hand-over never fails for lack of stock. Each line decrements the item's
//! stock floored at zero, and a shortfall is reported so callers can surface
//! it instead of masking an under-stock situation.

use crate::types::{ItemId, LineItem};
use serde::{Deserialize, Serialize};

/// A pending decrement of one item's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl From<&LineItem> for StockAdjustment {
    fn from(line: &LineItem) -> Self {
        Self {
            item_id: line.item_id,
            quantity: line.quantity,
        }
    }
}

/// A hand-over line that asked for more than was on the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortage {
    pub item_id: ItemId,
    pub requested: u32,
    pub available: u64,
}

/// The outcome of a clamped decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDecrement {
    pub new_stock: u64,
    pub shortage: Option<StockShortage>,
}

/// Computes `max(0, current - quantity)`.
#[must_use]
pub fn clamp_decrement(item_id: ItemId, current: u64, quantity: u32) -> StockDecrement {
    let requested: u64 = u64::from(quantity);
    let shortage: Option<StockShortage> = if requested > current {
        Some(StockShortage {
            item_id,
            requested: quantity,
            available: current,
        })
    } else {
        None
    };
    StockDecrement {
        new_stock: current.saturating_sub(requested),
        shortage,
    }
}
