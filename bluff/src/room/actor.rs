//! Room actor implementation with async message handling.

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::{
    errors::{RegistryError, RegistryResult},
    messages::{HandUpdate, LeaveResponse, RoomEvent, RoomMessage},
};
use crate::game::{
    GameOverView, Room, RoomResult,
    entities::{ConnectionId, Player, PlayerId, RoomId},
};

/// Capacity of a room's inbox.
const INBOX_CAPACITY: usize = 100;

/// Room actor handle for sending messages
#[derive(Clone, Debug)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    room_id: RoomId,
}

impl RoomHandle {
    pub fn new(sender: mpsc::Sender<RoomMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage) -> RegistryResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RegistryError::RoomClosed(self.room_id.clone()))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Actor owning a single room.
///
/// All mutations of a room happen on this actor's task, one message at a
/// time, so each mutation and the events it publishes are observed by every
/// subscriber in the same order.
pub struct RoomActor {
    room: Room,

    /// Message inbox
    inbox: mpsc::Receiver<RoomMessage>,

    /// Event channels of connections seated in the room
    subscribers: HashMap<ConnectionId, mpsc::Sender<RoomEvent>>,

    is_closed: bool,
}

impl RoomActor {
    /// Create an actor for `room`, subscribing its host.
    ///
    /// # Returns
    ///
    /// * `(RoomActor, RoomHandle)` - Actor and handle for sending messages
    pub fn new(room: Room, host_subscriber: mpsc::Sender<RoomEvent>) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = RoomHandle::new(sender, room.id().clone());

        let mut subscribers = HashMap::new();
        if let Some(host) = room.players().first() {
            subscribers.insert(host.connection, host_subscriber);
        }

        let actor = Self {
            room,
            inbox,
            subscribers,
            is_closed: false,
        };

        (actor, handle)
    }

    /// Run the room actor event loop
    pub async fn run(mut self) {
        log::info!("Room {} starting", self.room.id());

        // The host sees the lobby as soon as the room exists.
        self.publish(None);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!("Room {} closed", self.room.id());
    }

    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join {
                connection,
                name,
                subscriber,
                response,
            } => {
                let result = self.handle_join(connection, name, subscriber);
                let _ = response.send(result);
            }

            RoomMessage::Leave {
                connection,
                response,
            } => {
                let result = self.handle_leave(connection);
                let _ = response.send(result);
            }

            RoomMessage::StartGame { response } => {
                let result = self.room.start_game();
                if result.is_ok() {
                    self.publish(None);
                }
                let _ = response.send(result);
            }

            RoomMessage::PlayCards {
                player_id,
                card_ids,
                declaration,
            } => match self.room.play_cards(&player_id, &card_ids, declaration) {
                Ok(outcome) => self.publish(outcome.game_over),
                Err(e) => {
                    log::debug!("Room {}: ignored play by {}: {}", self.room.id(), player_id, e);
                }
            },

            RoomMessage::CallBluff {
                caller_id,
                claimed_id,
                response,
            } => {
                let result = self
                    .room
                    .call_bluff(&caller_id, &claimed_id)
                    .map(|outcome| {
                        self.publish(outcome.game_over);
                        outcome.resolution
                    });
                let _ = response.send(result);
            }

            RoomMessage::GetState { response } => {
                let _ = response.send(self.room.public_view());
            }

            RoomMessage::GetHand {
                player_id,
                response,
            } => {
                let _ = response.send(self.room.hand_view(&player_id));
            }
        }
    }

    fn handle_join(
        &mut self,
        connection: ConnectionId,
        name: String,
        subscriber: mpsc::Sender<RoomEvent>,
    ) -> RoomResult<PlayerId> {
        let player = Player::new(connection, name, false);
        let player_id = player.id.clone();
        self.room.add_player(player)?;

        self.subscribers.insert(connection, subscriber);
        self.publish(None);

        Ok(player_id)
    }

    fn handle_leave(&mut self, connection: ConnectionId) -> LeaveResponse {
        self.subscribers.remove(&connection);

        let Some(departure) = self.room.remove_connection(&connection) else {
            return LeaveResponse {
                left: false,
                remaining: self.room.players().len(),
            };
        };

        let remaining = self.room.players().len();
        if remaining == 0 {
            // Nobody left to notify; the registry drops the handle.
            self.is_closed = true;
        } else {
            log::debug!(
                "Room {}: {} left, {} remaining",
                self.room.id(),
                departure.player.id,
                remaining
            );
            self.publish(departure.game_over);
        }

        LeaveResponse {
            left: true,
            remaining,
        }
    }

    /// Push the consequences of a mutation to subscribers: the game-over
    /// announcement if the round just ended, then the public state, then
    /// each player's private hand.
    fn publish(&mut self, game_over: Option<GameOverView>) {
        if let Some(game_over) = game_over {
            log::info!(
                "Room {}: game over, {} ({}) holds the last cards",
                self.room.id(),
                game_over.loser_name,
                game_over.loser_id
            );
            self.broadcast(RoomEvent::GameOver(game_over));
        }

        self.broadcast(RoomEvent::RoomState(self.room.public_view()));

        for hand in self.room.hand_views() {
            let event = RoomEvent::YourHand(HandUpdate {
                room_id: self.room.id().clone(),
                player_id: hand.player_id,
                cards: hand.cards,
            });
            self.notify(hand.connection, event);
        }
    }

    fn broadcast(&mut self, event: RoomEvent) {
        let room_id = self.room.id();
        self.subscribers.retain(|connection, sender| {
            match sender.try_send(event.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Room {room_id}: subscriber {connection} channel full, dropping event"
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Room {room_id}: subscriber {connection} disconnected, removing");
                    false
                }
            }
        });
    }

    fn notify(&mut self, connection: ConnectionId, event: RoomEvent) {
        let Some(sender) = self.subscribers.get(&connection) else {
            return;
        };
        match sender.try_send(event) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!(
                    "Room {}: subscriber {} channel full, dropping hand",
                    self.room.id(),
                    connection
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.subscribers.remove(&connection);
            }
        }
    }
}
