use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, HeaderMap},
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

use super::{RealtimeEvent, SnapshotPublisher};
use crate::{
    api::{errors::AppError, AppState},
    reading_cache::ReadingCache,
    sensors::models::SensorSnapshot,
};

/// Upgrade to the realtime channel.
///
/// The current snapshot is sent immediately, then again after every
/// classified sensor line, each as `{"event":"sensorData","data":{...}}`.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching to websocket; pushes `sensorData` events", body = SensorSnapshot),
        (status = 403, description = "Origin not allowed"),
    ),
    tag = "realtime"
)]
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    if let Some(origin) = headers.get(header::ORIGIN) {
        if !state.realtime_origins.allows(origin) {
            warn!(origin = ?origin, "Refusing realtime connection from disallowed origin");
            return Err(AppError::Forbidden("origin not allowed".into()));
        }
    }

    let session = Uuid::new_v4();
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state.cache, state.publisher)
            .instrument(info_span!("realtime", %session))
    }))
}

async fn handle_socket(socket: WebSocket, cache: ReadingCache, publisher: SnapshotPublisher) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before reading the cache so nothing published in between is lost.
    let mut updates = publisher.subscribe();
    info!(clients = publisher.subscriber_count(), "Realtime client connected");

    let initial = cache.snapshot().await;
    if send_snapshot(&mut sender, &initial).await.is_err() {
        debug!("client disconnected before handshake");
        return;
    }

    let mut send_task = tokio::spawn(
        async move {
            loop {
                match updates.recv().await {
                    Ok(snapshot) => {
                        if send_snapshot(&mut sender, &snapshot).await.is_err() {
                            debug!("client disconnected");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Realtime client fell behind; skipping stale snapshots");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
        .in_current_span(),
    );

    let mut recv_task = tokio::spawn(
        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Close(_) => break,
                    Message::Text(text) => trace!(text = %text.as_str(), "ignoring client message"),
                    _ => {}
                }
            }
        }
        .in_current_span(),
    );

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Realtime client disconnected");
}

async fn send_snapshot<S>(sender: &mut S, snapshot: &SensorSnapshot) -> Result<(), axum::Error>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let payload =
        serde_json::to_string(&RealtimeEvent::sensor_data(snapshot)).map_err(axum::Error::new)?;
    sender.send(Message::Text(payload.into())).await
}
