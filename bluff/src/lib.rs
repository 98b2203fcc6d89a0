//! # Bluff
//!
//! A multiplayer "Cheat"-style bluffing card game engine.
//!
//! Players take turns placing cards face-down on a shared pile while
//! announcing what they played. Any player may challenge the most recent
//! announcement: the cards behind it are revealed, and whoever was wrong
//! picks them up. A round ends when exactly one player still holds cards;
//! that player loses and everyone else wins.
//!
//! ## Core Modules
//!
//! - [`game`]: Deck, room state machine, turn rotation, claims and bluff
//!   resolution, redacted views
//! - [`room`]: One async actor per room, the room registry, and the events
//!   pushed to subscribed connections
//!
//! ## Example
//!
//! ```
//! use bluff::game::{Room, entities::{ClaimDeclaration, ConnectionId, Player, Rank}};
//! use bluff::room::RoomConfig;
//!
//! let host = Player::new(ConnectionId::new(), "alice".to_string(), true);
//! let mut room = Room::new("table".into(), host, RoomConfig::default());
//! room.add_player(Player::new(ConnectionId::new(), "bob".to_string(), false)).unwrap();
//! room.start_game().unwrap();
//!
//! let alice = room.players()[0].id.clone();
//! let card = room.players()[0].hand[0].id;
//! room.play_cards(&alice, &[card], ClaimDeclaration::of_rank(Rank::Ace)).unwrap();
//! assert_eq!(room.pile().len(), 1);
//! ```

/// Core game logic, entities, and rules.
pub mod game;
pub use game::{
    Room, RoomError, RoomResult,
    constants,
    entities::{self, Card, CardId, ClaimDeclaration, ConnectionId, PlayerId, Rank, RoomId, Suit},
};

/// Room actors and the room registry.
pub mod room;
pub use room::{RegistryError, RoomConfig, RoomEvent, RoomManager};
