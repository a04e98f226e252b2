// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live notification streaming over WebSocket.
//!
//! Every committed notification is pushed to connected clients as it is
//! emitted. The stream is informational only: the inbox endpoints remain
//! the source of truth, and nothing sent by a client is acted upon.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use gudang_notify::{DeliveryError, Notification, NotificationSink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events buffered per subscriber before the slowest ones start lagging.
const EVENT_BUFFER_SIZE: usize = 100;

/// Messages pushed to live clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A notification was emitted for `user_id`.
    Notification {
        user_id: String,
        message: String,
        link: String,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl LiveEvent {
    fn is_for(&self, user_id: Option<&str>) -> bool {
        match (self, user_id) {
            (Self::Notification { user_id: to, .. }, Some(wanted)) => to == wanted,
            _ => true,
        }
    }
}

/// Fans notifications out to every live subscriber.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event. With no subscribers the event is dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => debug!(?event, receivers = count, "Broadcast live event"),
            Err(_) => debug!(?event, "No receivers for live event"),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for LiveEventBroadcaster {
    fn emit(&self, notification: &Notification) -> Result<(), DeliveryError> {
        self.broadcast(&LiveEvent::Notification {
            user_id: notification.user_id.to_string(),
            message: notification.message.clone(),
            link: notification.link.clone(),
        });
        Ok(())
    }
}

/// Query parameters for `/live`.
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    /// Only stream notifications addressed to this user.
    pub user_id: Option<String>,
}

/// Upgrades the connection and streams live events.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
    Query(query): Query<LiveQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, query.user_id))
}

async fn handle_socket(
    socket: WebSocket,
    broadcaster: Arc<LiveEventBroadcaster>,
    user_id: Option<String>,
) {
    info!(user_id = ?user_id, "Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event: LiveEvent = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let event: LiveEvent = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live client lagged; events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            if !event.is_for(user_id.as_deref()) {
                continue;
            }
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!(?e, "Failed to serialize live event"),
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Client disconnected from live event stream");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use gudang_domain::ActorId;

    fn notification(user: &str) -> Notification {
        Notification::new(
            ActorId::new(user).unwrap(),
            String::from("Request REQ/0001/MLD/III/2026 has been approved by the supervisor"),
            String::from("/requests/1"),
        )
    }

    #[test]
    fn test_emit_without_receivers_succeeds() {
        let broadcaster: LiveEventBroadcaster = LiveEventBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
        assert!(broadcaster.emit(&notification("admin.mld")).is_ok());
    }

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let broadcaster: LiveEventBroadcaster = LiveEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.emit(&notification("hrga.1")).unwrap();

        for rx in [&mut rx1, &mut rx2] {
            match rx.try_recv() {
                Ok(LiveEvent::Notification { user_id, link, .. }) => {
                    assert_eq!(user_id, "hrga.1");
                    assert_eq!(link, "/requests/1");
                }
                other => panic!("Expected a notification event, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_user_filter() {
        let event: LiveEvent = LiveEvent::Notification {
            user_id: String::from("hrga.1"),
            message: String::new(),
            link: String::new(),
        };
        let connected: LiveEvent = LiveEvent::Connected {
            timestamp: String::from("now"),
        };

        assert!(event.is_for(None));
        assert!(event.is_for(Some("hrga.1")));
        assert!(!event.is_for(Some("hrga.2")));
        assert!(connected.is_for(Some("hrga.2")));
    }

    #[test]
    fn test_event_serialization() {
        let event: LiveEvent = LiveEvent::Notification {
            user_id: String::from("admin.mld"),
            message: String::from("hello"),
            link: String::from("/requests/7"),
        };

        let json: String = serde_json::to_string(&event).expect("Failed to serialize");
        assert!(json.contains("\"type\":\"notification\""));
        let back: LiveEvent = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(back, event);
    }
}
