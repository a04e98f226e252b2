// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Notification;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// A notification could not be handed to its transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The transport has no listeners or has shut down.
    #[error("Notification channel closed: {0}")]
    ChannelClosed(String),
    /// Any other transport failure.
    #[error("Notification delivery failed: {0}")]
    Failed(String),
}

/// Destination for emitted notifications.
///
/// Implementations must not block for long: callers emit after committing a
/// transition and log-and-ignore any error returned here.
pub trait NotificationSink: Send + Sync {
    /// Hands one notification to the transport.
    ///
    /// # Errors
    ///
    /// Returns a `DeliveryError` if the transport refused it.
    fn emit(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Sink that writes every notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn emit(&self, notification: &Notification) -> Result<(), DeliveryError> {
        info!(
            user_id = %notification.user_id,
            link = %notification.link,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Sink that keeps every notification in memory.
///
/// Cloning shares the underlying buffer, so a test can hold one handle and
/// pass another into the workflow.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Drains and returns everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn emit(&self, notification: &Notification) -> Result<(), DeliveryError> {
        self.recorded
            .lock()
            .map_err(|_| DeliveryError::Failed(String::from("recording buffer poisoned")))?
            .push(notification.clone());
        Ok(())
    }
}

/// Sink that forwards to several sinks.
///
/// Every inner sink is tried even if an earlier one fails; the first error is
/// returned after all have been attempted.
#[derive(Clone, Default)]
pub struct FanOutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanOutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for FanOutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl NotificationSink for FanOutSink {
    fn emit(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let mut first_error: Option<DeliveryError> = None;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(notification) {
                warn!(user_id = %notification.user_id, error = %e, "Fan-out delivery failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
