// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request status tracking and transition logic.
//!
//! ```text
//! pending ──approve──▶ approved_spv ──schedule──▶ scheduled ──hand over──▶ completed
//!    │                      │                                                ▲
//!    └──reject──▶ rejected  └────────────────hand over───────────────────────┘
//! ```
//!
//! Transitions only move forward; `rejected` and `completed` are terminal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, awaiting supervisor decision
    Pending,
    /// Approved by the department supervisor
    ApprovedSpv,
    /// Rejected by the department supervisor
    Rejected,
    /// Assigned to a pickup batch
    Scheduled,
    /// Items handed over
    Completed,
}

impl RequestStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::ApprovedSpv,
        Self::Rejected,
        Self::Scheduled,
        Self::Completed,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ApprovedSpv => "approved_spv",
            Self::Rejected => "rejected",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved_spv" => Ok(Self::ApprovedSpv),
            "rejected" => Ok(Self::Rejected),
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }

    /// Returns true if no further transition is accepted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Returns true if the status requires a pickup batch reference.
    #[must_use]
    pub const fn requires_batch(&self) -> bool {
        matches!(self, Self::Scheduled)
    }

    /// Returns true if the status may carry a pickup batch reference.
    #[must_use]
    pub const fn permits_batch(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Completed)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(new_status, Self::ApprovedSpv | Self::Rejected),
            Self::ApprovedSpv => matches!(new_status, Self::Scheduled | Self::Completed),
            Self::Scheduled => matches!(new_status, Self::Completed),
            Self::Rejected | Self::Completed => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by request lifecycle rules".to_string(),
            })
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
