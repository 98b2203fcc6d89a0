//! Room registry for spawning and addressing room actors.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::sync::{RwLock, mpsc, oneshot};

use super::{
    actor::{RoomActor, RoomHandle},
    config::RoomConfig,
    errors::{RegistryError, RegistryResult},
    messages::{RoomEvent, RoomMessage},
};
use crate::game::{
    BluffResolution, Room, RoomError, RoomView,
    entities::{Card, CardId, ClaimDeclaration, ConnectionId, Player, PlayerId, RoomId},
};

/// Where a connection ended up after creating or joining a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub room_id: RoomId,
    pub player_id: PlayerId,
}

/// Registry of live rooms.
///
/// Creating, joining and leaving a room are serialized against each other
/// through the `rooms` lock, so a join can never land in a room that is
/// being deleted because its last player left. Gameplay requests only take
/// the lock long enough to clone a handle.
pub struct RoomManager {
    /// Configuration applied to every new room
    config: RoomConfig,

    /// Active room handles
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle>>>,

    /// Rooms each connection is seated in, for disconnect cleanup
    memberships: Arc<RwLock<HashMap<ConnectionId, HashSet<RoomId>>>>,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl RoomManager {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: Arc::new(RwLock::new(HashMap::new())),
            memberships: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Create a room with the caller seated as host
    ///
    /// # Arguments
    ///
    /// * `room_id` - Requested id, or `None` for a random one
    /// * `connection` - Creating connection
    /// * `name` - Host display name
    /// * `subscriber` - Channel the host receives room events on
    ///
    /// # Returns
    ///
    /// * `RegistryResult<Seat>` - Room and player id, or `AlreadyExists`
    pub async fn create_room(
        &self,
        room_id: Option<RoomId>,
        connection: ConnectionId,
        name: String,
        subscriber: mpsc::Sender<RoomEvent>,
    ) -> RegistryResult<Seat> {
        self.config
            .validate()
            .map_err(RegistryError::InvalidConfig)?;

        let mut rooms = self.rooms.write().await;

        let room_id = match room_id.filter(|id| !id.as_str().is_empty()) {
            Some(id) => {
                if rooms.get(&id).is_some_and(RoomHandle::is_closed) {
                    log::warn!("Room {id} actor stopped unexpectedly, dropping handle");
                    rooms.remove(&id);
                }
                if rooms.contains_key(&id) {
                    return Err(RegistryError::AlreadyExists(id));
                }
                id
            }
            None => loop {
                let id = RoomId::random();
                if !rooms.contains_key(&id) {
                    break id;
                }
            },
        };

        let host = Player::new(connection, name, true);
        let player_id = host.id.clone();
        let room = Room::new(room_id.clone(), host, self.config.clone());
        let (actor, handle) = RoomActor::new(room, subscriber);

        rooms.insert(room_id.clone(), handle);
        self.memberships
            .write()
            .await
            .entry(connection)
            .or_default()
            .insert(room_id.clone());
        drop(rooms);

        tokio::spawn(actor.run());

        log::info!("Created and spawned room {room_id}");

        Ok(Seat { room_id, player_id })
    }

    /// Get a room handle
    pub async fn get_room(&self, room_id: &RoomId) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    async fn require_room(&self, room_id: &RoomId) -> RegistryResult<RoomHandle> {
        self.get_room(room_id)
            .await
            .ok_or_else(|| RegistryError::NotFound(room_id.clone()))
    }

    /// Seat a connection in an existing room
    ///
    /// # Returns
    ///
    /// * `RegistryResult<Seat>` - Seat, or `NotFound` / a room error
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        connection: ConnectionId,
        name: String,
        subscriber: mpsc::Sender<RoomEvent>,
    ) -> RegistryResult<Seat> {
        // Held across the actor round trip so the room can't be deleted
        // underneath the join.
        let rooms = self.rooms.read().await;
        let handle = rooms
            .get(room_id)
            .ok_or_else(|| RegistryError::NotFound(room_id.clone()))?;

        let player_id = request(handle, |response| RoomMessage::Join {
            connection,
            name,
            subscriber,
            response,
        })
        .await??;

        self.memberships
            .write()
            .await
            .entry(connection)
            .or_default()
            .insert(room_id.clone());
        drop(rooms);

        Ok(Seat {
            room_id: room_id.clone(),
            player_id,
        })
    }

    /// Deal and begin a round
    pub async fn start_game(&self, room_id: &RoomId) -> RegistryResult<()> {
        let handle = self.require_room(room_id).await?;
        request(&handle, |response| RoomMessage::StartGame { response }).await??;
        Ok(())
    }

    /// Submit a play. Plays that the room rejects are dropped silently, so
    /// only a missing room is reported.
    pub async fn play_cards(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        card_ids: Vec<CardId>,
        declaration: ClaimDeclaration,
    ) -> RegistryResult<()> {
        let handle = self.require_room(room_id).await?;
        handle
            .send(RoomMessage::PlayCards {
                player_id,
                card_ids,
                declaration,
            })
            .await
    }

    /// Challenge the last claim in a room
    ///
    /// A missing or stopped room has no claim to challenge, so it reports
    /// `NothingToChallenge` like an idle one.
    pub async fn call_bluff(
        &self,
        room_id: &RoomId,
        caller_id: PlayerId,
        claimed_id: PlayerId,
    ) -> RegistryResult<BluffResolution> {
        let handle = self
            .require_room(room_id)
            .await
            .map_err(nothing_to_challenge)?;
        let resolution = request(&handle, |response| RoomMessage::CallBluff {
            caller_id,
            claimed_id,
            response,
        })
        .await
        .map_err(nothing_to_challenge)??;
        Ok(resolution)
    }

    /// Remove a connection from a room, deleting the room once it is empty
    ///
    /// # Returns
    ///
    /// * `RegistryResult<bool>` - Whether the connection held a seat there
    pub async fn leave_room(
        &self,
        room_id: &RoomId,
        connection: ConnectionId,
    ) -> RegistryResult<bool> {
        let mut rooms = self.rooms.write().await;
        let handle = rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(room_id.clone()))?;

        let result = request(&handle, |response| RoomMessage::Leave {
            connection,
            response,
        })
        .await;

        let mut memberships = self.memberships.write().await;
        if let Some(joined) = memberships.get_mut(&connection) {
            joined.remove(room_id);
            if joined.is_empty() {
                memberships.remove(&connection);
            }
        }

        let left = match result {
            Ok(left) => left,
            Err(e) => {
                log::warn!("Room {room_id} actor stopped unexpectedly, dropping handle");
                rooms.remove(room_id);
                return Err(e);
            }
        };

        if left.remaining == 0 {
            rooms.remove(room_id);
            log::info!("Room {room_id} is empty, deleted");
        }

        Ok(left.left)
    }

    /// Remove a connection from every room it is seated in
    ///
    /// # Returns
    ///
    /// * `usize` - Number of rooms the connection was removed from
    pub async fn disconnect(&self, connection: ConnectionId) -> usize {
        let joined: Vec<RoomId> = self
            .memberships
            .write()
            .await
            .remove(&connection)
            .map(|rooms| rooms.into_iter().collect())
            .unwrap_or_default();

        let mut removed = 0;
        for room_id in joined {
            match self.leave_room(&room_id, connection).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => log::debug!("Disconnect cleanup for {connection} in {room_id}: {e}"),
            }
        }
        removed
    }

    /// Get the public view of a room
    pub async fn room_state(&self, room_id: &RoomId) -> RegistryResult<RoomView> {
        let handle = self.require_room(room_id).await?;
        request(&handle, |response| RoomMessage::GetState { response }).await
    }

    /// Get one player's hand
    pub async fn hand(&self, room_id: &RoomId, player_id: PlayerId) -> RegistryResult<Option<Vec<Card>>> {
        let handle = self.require_room(room_id).await?;
        request(&handle, |response| RoomMessage::GetHand {
            player_id,
            response,
        })
        .await
    }

    /// Rooms a connection is currently seated in
    pub async fn rooms_of(&self, connection: ConnectionId) -> Vec<RoomId> {
        let memberships = self.memberships.read().await;
        let mut rooms: Vec<RoomId> = memberships
            .get(&connection)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    /// Get active room count
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

fn nothing_to_challenge(err: RegistryError) -> RegistryError {
    match err {
        RegistryError::NotFound(_) | RegistryError::RoomClosed(_) => {
            RegistryError::Room(RoomError::NothingToChallenge)
        }
        other => other,
    }
}

/// Send a request to a room actor and wait for its reply.
async fn request<T>(
    handle: &RoomHandle,
    build: impl FnOnce(oneshot::Sender<T>) -> RoomMessage,
) -> RegistryResult<T> {
    let (tx, rx) = oneshot::channel();
    handle.send(build(tx)).await?;
    rx.await
        .map_err(|_| RegistryError::RoomClosed(handle.room_id().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (mpsc::Sender<RoomEvent>, mpsc::Receiver<RoomEvent>) {
        mpsc::channel(256)
    }

    #[tokio::test]
    async fn test_create_room_with_explicit_id() {
        let manager = RoomManager::default();
        let (tx, _rx) = channel();
        let conn = ConnectionId::new();
        let seat = manager
            .create_room(Some("lobby".into()), conn, "alice".into(), tx)
            .await
            .unwrap();
        assert_eq!(seat.room_id.as_str(), "lobby");
        assert_eq!(seat.player_id, PlayerId::for_connection(&conn));
        assert_eq!(manager.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_room_random_id() {
        let manager = RoomManager::default();
        let (tx, _rx) = channel();
        let seat = manager
            .create_room(None, ConnectionId::new(), "alice".into(), tx)
            .await
            .unwrap();
        assert_eq!(seat.room_id.as_str().len(), 6);

        let (tx, _rx2) = channel();
        let seat = manager
            .create_room(Some("  ".into()), ConnectionId::new(), "bob".into(), tx)
            .await
            .unwrap();
        assert_eq!(seat.room_id.as_str().len(), 6);
        assert_eq!(manager.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_room_rejected() {
        let manager = RoomManager::default();
        let (tx, _rx) = channel();
        manager
            .create_room(Some("dup".into()), ConnectionId::new(), "alice".into(), tx.clone())
            .await
            .unwrap();
        let err = manager
            .create_room(Some("dup".into()), ConnectionId::new(), "bob".into(), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(_)));
        assert_eq!(err.client_message(), "Room exists");
    }

    #[tokio::test]
    async fn test_join_missing_room() {
        let manager = RoomManager::default();
        let (tx, _rx) = channel();
        let err = manager
            .join_room(&"nope".into(), ConnectionId::new(), "bob".into(), tx)
            .await
            .unwrap_err();
        assert_eq!(err.join_message(), "No such room");
    }

    #[tokio::test]
    async fn test_join_twice_and_after_start() {
        let manager = RoomManager::default();
        let room: RoomId = "r1".into();
        let (tx, _rx) = channel();
        manager
            .create_room(Some(room.clone()), ConnectionId::new(), "alice".into(), tx.clone())
            .await
            .unwrap();

        let bob = ConnectionId::new();
        manager
            .join_room(&room, bob, "bob".into(), tx.clone())
            .await
            .unwrap();
        let err = manager
            .join_room(&room, bob, "bob".into(), tx.clone())
            .await
            .unwrap_err();
        assert_eq!(err.join_message(), "Already joined");

        manager.start_game(&room).await.unwrap();
        let err = manager
            .join_room(&room, ConnectionId::new(), "carol".into(), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Room(RoomError::AlreadyStarted)));
        assert_eq!(err.join_message(), "Game already started");

        let err = manager.start_game(&room).await.unwrap_err();
        assert_eq!(err.client_message(), "Already started");
    }

    #[tokio::test]
    async fn test_last_leave_deletes_room() {
        let manager = RoomManager::default();
        let room: RoomId = "gone".into();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx, _rx) = channel();
        manager
            .create_room(Some(room.clone()), alice, "alice".into(), tx.clone())
            .await
            .unwrap();
        manager
            .join_room(&room, bob, "bob".into(), tx.clone())
            .await
            .unwrap();

        assert!(manager.leave_room(&room, alice).await.unwrap());
        assert_eq!(manager.room_count().await, 1);
        assert!(!manager.leave_room(&room, alice).await.unwrap());

        assert!(manager.leave_room(&room, bob).await.unwrap());
        assert_eq!(manager.room_count().await, 0);

        let err = manager
            .join_room(&room, ConnectionId::new(), "carol".into(), tx)
            .await
            .unwrap_err();
        assert_eq!(err.join_message(), "No such room");
    }

    #[tokio::test]
    async fn test_disconnect_leaves_every_room() {
        let manager = RoomManager::default();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx, _rx) = channel();

        manager
            .create_room(Some("a".into()), alice, "alice".into(), tx.clone())
            .await
            .unwrap();
        manager
            .create_room(Some("b".into()), bob, "bob".into(), tx.clone())
            .await
            .unwrap();
        manager
            .join_room(&"b".into(), alice, "alice".into(), tx)
            .await
            .unwrap();
        assert_eq!(manager.rooms_of(alice).await.len(), 2);

        assert_eq!(manager.disconnect(alice).await, 2);
        assert!(manager.rooms_of(alice).await.is_empty());
        // Room "a" had only alice.
        assert!(manager.get_room(&"a".into()).await.is_none());
        let view = manager.room_state(&"b".into()).await.unwrap();
        assert_eq!(view.players.len(), 1);
        assert!(view.players[0].is_host);
    }

    #[tokio::test]
    async fn test_call_bluff_without_claim() {
        let manager = RoomManager::default();
        let room: RoomId = "quiet".into();
        let (tx, _rx) = channel();
        let seat = manager
            .create_room(Some(room.clone()), ConnectionId::new(), "alice".into(), tx)
            .await
            .unwrap();
        let err = manager
            .call_bluff(&room, seat.player_id.clone(), seat.player_id)
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Nothing to call");
    }

    #[tokio::test]
    async fn test_call_bluff_unknown_room() {
        let manager = RoomManager::default();
        let player = PlayerId::for_connection(&ConnectionId::new());
        let err = manager
            .call_bluff(&"ghost".into(), player.clone(), player)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Room(RoomError::NothingToChallenge)
        ));
        assert_eq!(err.client_message(), "Nothing to call");
    }
}
