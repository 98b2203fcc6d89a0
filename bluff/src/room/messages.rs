//! Room actor message types.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::game::{
    BluffResolution, GameOverView, RoomResult, RoomView,
    entities::{Card, CardId, ClaimDeclaration, ConnectionId, PlayerId, RoomId},
};

/// Messages that can be sent to a RoomActor
#[derive(Debug)]
pub enum RoomMessage {
    /// Seat a connection and subscribe it to room events
    Join {
        connection: ConnectionId,
        name: String,
        subscriber: mpsc::Sender<RoomEvent>,
        response: oneshot::Sender<RoomResult<PlayerId>>,
    },

    /// Remove a connection's seat and subscription
    Leave {
        connection: ConnectionId,
        response: oneshot::Sender<LeaveResponse>,
    },

    /// Deal and begin a round
    StartGame {
        response: oneshot::Sender<RoomResult<()>>,
    },

    /// Play cards with a claim. Invalid plays are dropped without a reply.
    PlayCards {
        player_id: PlayerId,
        card_ids: Vec<CardId>,
        declaration: ClaimDeclaration,
    },

    /// Challenge the last claim
    CallBluff {
        caller_id: PlayerId,
        claimed_id: PlayerId,
        response: oneshot::Sender<RoomResult<BluffResolution>>,
    },

    /// Get the public room view
    GetState {
        response: oneshot::Sender<RoomView>,
    },

    /// Get a single player's hand
    GetHand {
        player_id: PlayerId,
        response: oneshot::Sender<Option<Vec<Card>>>,
    },
}

/// Outcome of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveResponse {
    /// Whether the connection held a seat
    pub left: bool,

    /// Seats still occupied afterwards
    pub remaining: usize,
}

/// A player's own cards, addressed to their connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandUpdate {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
}

/// Event pushed to a subscribed connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Redacted room snapshot, sent to everyone in the room
    RoomState(RoomView),

    /// Private hand snapshot, sent only to its owner
    YourHand(HandUpdate),

    /// A round ended with a single card holder left
    GameOver(GameOverView),
}

impl RoomEvent {
    pub fn room_id(&self) -> &RoomId {
        match self {
            RoomEvent::RoomState(view) => &view.room_id,
            RoomEvent::YourHand(hand) => &hand.room_id,
            RoomEvent::GameOver(over) => &over.room_id,
        }
    }
}
