// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-deployment collaborators passed into every handler.

use gudang_domain::ScopeWidenings;
use gudang_notify::{NotificationSink, TracingSink};
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The system clock, reported at a fixed UTC offset.
///
/// Document numbers take their month and year from this clock, so the
/// offset should be the plant's local one. Defaults to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    #[must_use]
    pub const fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// What a handler needs besides storage and the calling actor.
#[derive(Clone)]
pub struct ApiContext {
    /// Where committed notifications are emitted.
    pub sink: Arc<dyn NotificationSink>,
    /// Supervisor widening rules for scope resolution.
    pub widenings: ScopeWidenings,
    /// Timestamps for transitions and notifications.
    pub clock: Arc<dyn Clock>,
}

impl ApiContext {
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>, widenings: ScopeWidenings) -> Self {
        Self {
            sink,
            widenings,
            clock: Arc::new(SystemClock::default()),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

impl Default for ApiContext {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink), ScopeWidenings::plant_defaults())
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("widenings", &self.widenings)
            .finish_non_exhaustive()
    }
}
