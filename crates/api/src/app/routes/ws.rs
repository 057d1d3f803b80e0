//! Live inventory feed over WebSocket.
//!
//! ```text
//! Client            Handler                  Hub
//!   │                  │                      │
//!   ├─ Upgrade ───────>│                      │
//!   │                  ├─ attach(tx) ────────>│
//!   │<─ snapshot ──────┤                      │
//!   │                  │<──── broadcast ──────┤
//!   │<─ snapshot ──────┤                      │
//!   ├─ Close ─────────>│                      │
//!   │                  ├─ unsubscribe ───────>│
//! ```
//!
//! Every frame is a text frame holding the JSON array of all bikes. Frames may
//! be skipped for a slow client, never reordered: the newest snapshot always
//! wins. Frames from the client are ignored apart from Close.

use std::sync::Arc;

use axum::{
    extract::{
        Extension, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;

use pedalshare_infra::SnapshotPayload;

use crate::app::services::AppServices;

/// GET /ws
pub async fn snapshot_feed(
    ws: WebSocketUpgrade,
    Extension(services): Extension<Arc<AppServices>>,
) -> Response {
    ws.on_upgrade(move |socket| stream_snapshots(socket, services))
}

async fn stream_snapshots(socket: WebSocket, services: Arc<AppServices>) {
    let (mut sender, mut receiver) = socket.split();

    // Latest value wins: a client that stops reading holds one pending snapshot.
    let (tx, mut rx) = watch::channel::<SnapshotPayload>(Arc::from(""));
    let hub = services.coordinator.hub().clone();
    let id = services.coordinator.attach(Arc::new(tx));
    tracing::info!(subscriber = %id, "websocket subscriber connected");

    let mut send_task = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let payload = rx.borrow_and_update().clone();
            if sender.send(Message::Text(payload.to_string())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unsubscribe(id);
    tracing::info!(subscriber = %id, "websocket subscriber disconnected");
}
