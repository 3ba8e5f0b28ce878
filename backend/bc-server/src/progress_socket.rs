//! Live campaign progress over WebSocket
//!
//! `GET /ws/campaigns/{id}` upgrades to a socket that receives one JSON text
//! frame per progress event, starting with a status event for the current
//! snapshot. Client frames are ignored.

use crate::{ApiResult, AppState, UserId};

use bc_core::ProgressEvent;
use bc_dispatch::BroadcastMessage;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

pub async fn progress_socket(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let campaign_id = Uuid::parse_str(&id)?;

    // Ownership check before upgrading
    state.campaigns().get(user_id, campaign_id).await?;
    log::debug!("Progress socket requested for campaign {} by {}", campaign_id, user_id);

    Ok(ws.on_upgrade(move |socket| stream_progress(socket, state, campaign_id)))
}

async fn stream_progress(socket: WebSocket, state: AppState, campaign_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the first snapshot so no event falls in between
    let mut events = state.broadcaster.subscribe(campaign_id).await;
    let mut shutdown_guard = state.shutdown.subscribe_guard();

    match initial_frame(&state, campaign_id).await {
        Some(text) => {
            if sender.send(Message::Text(text.into())).await.is_err() {
                state.broadcaster.unsubscribe(campaign_id).await;
                return;
            }
        }
        None => log::warn!("No initial snapshot for campaign {}", campaign_id),
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        log::debug!("Progress socket for campaign {} closed by client", campaign_id);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("Progress socket error for campaign {}: {}", campaign_id, e);
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Ok(message) => {
                        let text = message.as_text().to_owned();
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        log::warn!(
                            "Progress socket for campaign {} lagged, missed {} events",
                            campaign_id,
                            missed
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            _ = shutdown_guard.wait() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    state.broadcaster.unsubscribe(campaign_id).await;
}

async fn initial_frame(state: &AppState, campaign_id: Uuid) -> Option<String> {
    let snapshot = match state.engine.tracker().snapshot(campaign_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("Failed to load progress of campaign {}: {}", campaign_id, e);
            return None;
        }
    };

    let event = ProgressEvent::status(snapshot, None);
    match BroadcastMessage::from_event(&event) {
        Ok(message) => Some(message.as_text().to_owned()),
        Err(e) => {
            log::error!("Failed to serialize progress event: {}", e);
            None
        }
    }
}
