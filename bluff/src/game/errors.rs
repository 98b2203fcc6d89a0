//! Room-level error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the room state machine.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoomError {
    #[error("game already started")]
    AlreadyStarted,
    #[error("game not started")]
    NotStarted,
    #[error("nothing to challenge")]
    NothingToChallenge,
    #[error("invalid players")]
    InvalidPlayers,
    #[error("challenged player did not make the last claim")]
    NotClaimant,
    #[error("player not found")]
    PlayerNotFound,
    #[error("not your turn")]
    OutOfTurn,
    #[error("room is full")]
    RoomFull,
    #[error("already joined")]
    AlreadyJoined,
}

impl RoomError {
    /// Message placed in a failed acknowledgment.
    ///
    /// `start_game` and `join_room` word the "already started" case
    /// differently, so joins go through [`RoomError::join_message`].
    pub fn client_message(&self) -> String {
        match self {
            RoomError::AlreadyStarted => "Already started".to_string(),
            RoomError::NotStarted | RoomError::NothingToChallenge => {
                "Nothing to call".to_string()
            }
            RoomError::InvalidPlayers | RoomError::PlayerNotFound => {
                "Invalid players".to_string()
            }
            RoomError::NotClaimant => "Not the claimant".to_string(),
            RoomError::OutOfTurn => "Not your turn".to_string(),
            RoomError::RoomFull => "Room is full".to_string(),
            RoomError::AlreadyJoined => "Already joined".to_string(),
        }
    }

    pub fn join_message(&self) -> String {
        match self {
            RoomError::AlreadyStarted => "Game already started".to_string(),
            other => other.client_message(),
        }
    }
}

pub type RoomResult<T> = Result<T, RoomError>;
