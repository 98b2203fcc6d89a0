//! WebSocket transport for game traffic.
//!
//! Every socket is one connection with its own [`ConnectionId`]. A single
//! connection may sit in several rooms; events from all of them arrive on
//! the same socket and carry their `roomId`.
//!
//! # Client Messages
//!
//! JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "create_room", "roomId": "abc123", "name": "alice"}
//! {"type": "join_room", "roomId": "abc123", "name": "bob"}
//! {"type": "start_game", "roomId": "abc123"}
//! {"type": "play_cards", "roomId": "abc123", "playerId": "p_1a2b3c4d",
//!  "cardIds": [4, 17], "claim": {"rank": "K"}}
//! {"type": "call_bluff", "roomId": "abc123", "callerId": "p_5e6f7a8b",
//!  "claimedPlayerId": "p_1a2b3c4d"}
//! {"type": "leave_room", "roomId": "abc123"}
//! ```
//!
//! # Server Messages
//!
//! JSON objects tagged by `event` with the payload under `data`:
//!
//! - `ack`: reply to create/join/start/call, `{request, ok, ...}`
//! - `room_state`: public room snapshot, to everyone in the room
//! - `your_hand`: the receiving player's own cards
//! - `game_over`: loser and winners of a finished round
//! - `error`: unparseable or rate-limited frame
//!
//! `play_cards` and `leave_room` are never acknowledged; their effect shows
//! up in the next `room_state`.

use std::sync::atomic::Ordering;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use bluff::{
    RoomEvent,
    entities::{CardId, ClaimDeclaration, ConnectionId, PlayerId, RoomId, display_name},
    game::BluffResolution,
    room::{RegistryError, Seat},
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::{AppState, rate_limiter::MessageLimiter};
use crate::{logging, metrics};

/// Room events buffered per connection before new ones are dropped
const EVENT_BUFFER: usize = 256;

/// Client messages received via WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
enum ClientMessage {
    CreateRoom {
        room_id: Option<RoomId>,
        name: Option<String>,
    },
    JoinRoom {
        room_id: RoomId,
        name: Option<String>,
    },
    StartGame {
        room_id: RoomId,
    },
    PlayCards {
        room_id: RoomId,
        player_id: PlayerId,
        #[serde(default)]
        card_ids: Vec<CardId>,
        #[serde(default)]
        claim: ClaimDeclaration,
    },
    CallBluff {
        room_id: RoomId,
        caller_id: PlayerId,
        claimed_player_id: PlayerId,
    },
    LeaveRoom {
        room_id: RoomId,
    },
}

impl ClientMessage {
    fn kind(&self) -> &'static str {
        match self {
            ClientMessage::CreateRoom { .. } => "create_room",
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::StartGame { .. } => "start_game",
            ClientMessage::PlayCards { .. } => "play_cards",
            ClientMessage::CallBluff { .. } => "call_bluff",
            ClientMessage::LeaveRoom { .. } => "leave_room",
        }
    }
}

/// Acknowledgment of a client request
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Ack {
    request: &'static str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<RoomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<BluffResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Ack {
    fn ok(request: &'static str) -> Self {
        Self {
            request,
            ok: true,
            ..Self::default()
        }
    }

    fn seated(request: &'static str, seat: Seat) -> Self {
        Self {
            room_id: Some(seat.room_id),
            player_id: Some(seat.player_id),
            ..Self::ok(request)
        }
    }

    fn failed(request: &'static str, error: String) -> Self {
        Self {
            request,
            ok: false,
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Replies addressed to the requesting connection only
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum ServerMessage {
    Ack(Ack),
    Error { message: String },
}

/// Upgrade HTTP connection to WebSocket.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Spawns a send task that serializes room events and replies onto the
/// socket, processes inbound frames in order on this task, and removes the
/// connection from every room it sat in once the socket closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection = ConnectionId::new();
    let player_id = PlayerId::for_connection(&connection);
    let (mut sender, mut receiver) = socket.split();

    let open = state.connections.fetch_add(1, Ordering::Relaxed) + 1;
    metrics::websocket_connections_total();
    metrics::websocket_connections_active(open);
    tracing::info!(connection_id = %connection, player_id = %player_id, "WebSocket connected");

    let mut limiter = MessageLimiter::default();

    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<RoomEvent>(EVENT_BUFFER);

    let send_player_id = player_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let json = tokio::select! {
                Some(event) = event_rx.recv() => {
                    if let RoomEvent::GameOver(over) = &event
                        && over.loser_id == send_player_id
                    {
                        // Counted once per round, by the loser's connection.
                        metrics::games_finished_total();
                    }
                    serde_json::to_string(&event)
                }
                Some(reply) = reply_rx.recv() => serde_json::to_string(&reply),
                else => break,
            };

            let json = match json {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize outbound frame: {}", e);
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(exceeded) = limiter.check() {
                    tracing::warn!(
                        connection_id = %connection,
                        window = exceeded.label(),
                        "Rate limit exceeded, dropping frame"
                    );
                    metrics::rate_limit_hits_total(exceeded.label());
                    let reply = ServerMessage::Error {
                        message: exceeded.client_message().to_string(),
                    };
                    if reply_tx.send(reply).await.is_err() {
                        break;
                    }
                    continue;
                }

                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        metrics::websocket_messages_received(client_msg.kind());
                        handle_client_message(client_msg, connection, &event_tx, &state)
                            .await
                            .map(ServerMessage::Ack)
                    }
                    Err(e) => parse_failure_reply(&text, connection, &e),
                };

                if let Some(reply) = reply
                    && reply_tx.send(reply).await.is_err()
                {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::warn!(connection_id = %connection, "WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();

    let left = state.room_manager.disconnect(connection).await;
    metrics::rooms_active(state.room_manager.room_count().await);

    let open = state.connections.fetch_sub(1, Ordering::Relaxed).saturating_sub(1);
    metrics::websocket_connections_active(open);
    tracing::info!(
        connection_id = %connection,
        rooms_left = left,
        "WebSocket disconnected"
    );
}

/// Process one client message.
///
/// # Returns
///
/// The acknowledgment to send back, or `None` for requests that are never
/// acknowledged.
async fn handle_client_message(
    msg: ClientMessage,
    connection: ConnectionId,
    events: &mpsc::Sender<RoomEvent>,
    state: &AppState,
) -> Option<Ack> {
    let request = msg.kind();
    let manager = &state.room_manager;

    match msg {
        ClientMessage::CreateRoom { room_id, name } => {
            let name = display_name(name.as_deref());
            let result = manager
                .create_room(room_id, connection, name.clone(), events.clone())
                .await;
            metrics::rooms_active(manager.room_count().await);
            Some(match result {
                Ok(seat) => {
                    logging::log_room_event(
                        "created",
                        seat.room_id.as_str(),
                        &format!("{} ({})", name, seat.player_id),
                    );
                    Ack::seated(request, seat)
                }
                Err(e) => reject(request, connection, e.client_message()),
            })
        }

        ClientMessage::JoinRoom { room_id, name } => {
            let name = display_name(name.as_deref());
            let result = manager
                .join_room(&room_id, connection, name.clone(), events.clone())
                .await;
            Some(match result {
                Ok(seat) => {
                    logging::log_room_event(
                        "joined",
                        room_id.as_str(),
                        &format!("{} ({})", name, seat.player_id),
                    );
                    Ack::seated(request, seat)
                }
                Err(e) => reject(request, connection, e.join_message()),
            })
        }

        ClientMessage::StartGame { room_id } => Some(match manager.start_game(&room_id).await {
            Ok(()) => {
                metrics::games_started_total();
                logging::log_room_event("started", room_id.as_str(), &connection.to_string());
                Ack::ok(request)
            }
            Err(e) => reject(request, connection, e.client_message()),
        }),

        ClientMessage::PlayCards {
            room_id,
            player_id,
            card_ids,
            claim,
        } => {
            if let Err(e) = manager.play_cards(&room_id, player_id, card_ids, claim).await {
                logging::log_rejected_request(request, &connection.to_string(), &e.to_string());
            }
            None
        }

        ClientMessage::CallBluff {
            room_id,
            caller_id,
            claimed_player_id,
        } => Some(
            match manager
                .call_bluff(&room_id, caller_id, claimed_player_id)
                .await
            {
                Ok(resolution) => {
                    metrics::bluff_calls_total(resolution.result);
                    Ack {
                        result: Some(resolution),
                        ..Ack::ok(request)
                    }
                }
                Err(e) => reject(request, connection, e.client_message()),
            },
        ),

        ClientMessage::LeaveRoom { room_id } => {
            match manager.leave_room(&room_id, connection).await {
                Ok(true) => {
                    logging::log_room_event("left", room_id.as_str(), &connection.to_string());
                }
                Ok(false) | Err(RegistryError::NotFound(_)) => {}
                Err(e) => {
                    logging::log_rejected_request(request, &connection.to_string(), &e.to_string());
                }
            }
            metrics::rooms_active(manager.room_count().await);
            None
        }
    }
}

/// Reply to a frame that failed to parse.
///
/// Malformed `play_cards` frames are dropped like any other invalid play;
/// everything else gets an `error` frame.
fn parse_failure_reply(
    text: &str,
    connection: ConnectionId,
    error: &serde_json::Error,
) -> Option<ServerMessage> {
    let kind = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|frame| frame.get("type")?.as_str().map(str::to_owned));

    if kind.as_deref() == Some("play_cards") {
        logging::log_rejected_request("play_cards", &connection.to_string(), &error.to_string());
        return None;
    }

    tracing::warn!(connection_id = %connection, "Failed to parse client message: {}", error);
    Some(ServerMessage::Error {
        message: "Invalid message format".to_string(),
    })
}

fn reject(request: &'static str, connection: ConnectionId, message: String) -> Ack {
    logging::log_rejected_request(request, &connection.to_string(), &message);
    Ack::failed(request, message)
}
