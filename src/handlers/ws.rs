use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    user_id: Option<Uuid>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let Some(user_id) = query.user_id else {
        return (StatusCode::UNAUTHORIZED, "Missing user_id").into_response();
    };
    if state.users.get_user(user_id).await.is_none() {
        tracing::warn!(user_id = %user_id, "WebSocket rejected: unknown user");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    let Some(rx) = state.ws_tx.as_ref().map(|tx| tx.subscribe()) else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Live feed disabled").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, rx, user_id))
}

/// True when the message carries this user's id.
fn is_for_user(msg: &str, user_id: Uuid) -> bool {
    serde_json::from_str::<serde_json::Value>(msg)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("user_id")
                .and_then(|v| v.as_str())
                .map(|id| id == user_id.to_string())
        })
        .unwrap_or(false)
}

async fn handle_socket(socket: WebSocket, mut rx: broadcast::Receiver<String>, user_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!(user_id = %user_id, "WebSocket connection established");

    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = match rx.recv().await {
                Ok(msg) => msg,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "WebSocket subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            if !is_for_user(&msg, user_id) {
                continue;
            }
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    tracing::debug!(
                        user_id = %user_id,
                        message = %text,
                        "WebSocket message received"
                    );
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, "WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_for_user_matches_only_own_messages() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let msg = serde_json::json!({"type": "log_reviewed", "user_id": me}).to_string();
        assert!(is_for_user(&msg, me));
        assert!(!is_for_user(&msg, other));
        assert!(!is_for_user(r#"{"type":"log_deleted"}"#, me));
        assert!(!is_for_user("not json", me));
    }
}
