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
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Notifications emitted by request lifecycle transitions.
//!
//! Every state change produces zero or more [`Notification`]s addressed to a
//! single user. Delivery is fire-and-forget: a transition never waits on a
//! sink and a failed delivery never rolls a transition back.

pub mod messages;
mod sink;

#[cfg(test)]
mod tests;

pub use sink::{DeliveryError, FanOutSink, NotificationSink, RecordingSink, TracingSink};

use gudang_domain::ActorId;
use serde::{Deserialize, Serialize};

/// A message addressed to one user.
///
/// The `link` is an application-relative path pointing at the subject of the
/// notification, e.g. `/requests/12`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The recipient.
    pub user_id: ActorId,
    /// Human-readable text.
    pub message: String,
    /// Where the recipient should go to act on it.
    pub link: String,
}

impl Notification {
    /// Creates a new `Notification`.
    #[must_use]
    pub const fn new(user_id: ActorId, message: String, link: String) -> Self {
        Self {
            user_id,
            message,
            link,
        }
    }
}
