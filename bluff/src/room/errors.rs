use thiserror::Error;

use crate::game::{RoomError, entities::RoomId};

/// Errors raised by the room registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    #[error("room {0} not found")]
    NotFound(RoomId),

    #[error("room {0} is closed")]
    RoomClosed(RoomId),

    #[error("invalid room configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

impl RegistryError {
    /// Message placed in a failed acknowledgment.
    pub fn client_message(&self) -> String {
        match self {
            RegistryError::AlreadyExists(_) => "Room exists".to_string(),
            // A room whose actor already stopped is indistinguishable from
            // one that was never created.
            RegistryError::NotFound(_) | RegistryError::RoomClosed(_) => {
                "No such room".to_string()
            }
            RegistryError::InvalidConfig(_) => "Invalid room configuration".to_string(),
            RegistryError::Room(e) => e.client_message(),
        }
    }

    /// Like [`RegistryError::client_message`], worded for `join_room`.
    pub fn join_message(&self) -> String {
        match self {
            RegistryError::Room(e) => e.join_message(),
            other => other.client_message(),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
