// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gudang_domain::BatchId;

/// A command represents actor intent against one request, as data only.
///
/// Commands are the only way to request a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Supervisor approval of a pending request.
    Approve {
        /// Optional signature artifact captured at approval.
        supervisor_signature: Option<String>,
    },
    /// Supervisor rejection of a pending request.
    Reject {
        /// Why the request was rejected. Must not be blank.
        reason: String,
    },
    /// Membership in a newly created pickup batch.
    Schedule {
        /// The batch the request joins.
        batch_id: BatchId,
    },
    /// HRGA hand-over of the requested items.
    HandOver,
}

impl Command {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Reject { .. } => "reject",
            Self::Schedule { .. } => "schedule",
            Self::HandOver => "hand_over",
        }
    }
}
