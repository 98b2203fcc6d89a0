//! Per-room authoritative state and lifecycle.
//!
//! A [`Room`] moves through four phases:
//!
//! - **Lobby**: accepting joins, no cards dealt
//! - **Dealing**: transient, only observable inside [`Room::start_game`]
//! - **Active**: turns proceed, plays and challenges are accepted
//! - **GameOver**: a round ended; players are retained and may join or
//!   start a rematch exactly as in the lobby
//!
//! Turn scheduling lives in [`super::turns`], claim bookkeeping and bluff
//! resolution in [`super::claims`], and the redacted projections in
//! [`super::views`].

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    deck::shuffled_deck,
    entities::{Card, Claim, ConnectionId, Player, PlayerId, RoomId},
    errors::{RoomError, RoomResult},
    views::GameOverView,
};
use crate::room::config::RoomConfig;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Dealing,
    Active,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Dealing => "dealing",
            Self::Active => "active",
            Self::GameOver => "game_over",
        };
        write!(f, "{repr}")
    }
}

/// Result of removing a player from a room.
#[derive(Debug)]
pub struct Departure {
    pub player: Player,
    /// Set if the departure left a single card holder in an active round.
    pub game_over: Option<GameOverView>,
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    pub(super) config: RoomConfig,
    /// Seating order, which is also the turn rotation.
    pub(super) players: Vec<Player>,
    /// Face-down cards in play order. The tail belongs to `last_claim`.
    pub(super) pile: Vec<Card>,
    pub(super) last_claim: Option<Claim>,
    pub(super) turn_index: usize,
    pub(super) phase: Phase,
}

impl Room {
    /// Creates a room in the lobby with `host` as its only player.
    pub fn new(id: RoomId, mut host: Player, config: RoomConfig) -> Self {
        host.is_host = true;
        host.reset();
        info!("Room {id} created by {} ({})", host.name, host.id);
        Self {
            id,
            config,
            players: vec![host],
            pile: Vec::new(),
            last_claim: None,
            turn_index: 0,
            phase: Phase::Lobby,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    pub fn last_claim(&self) -> Option<&Claim> {
        self.last_claim.as_ref()
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *player_id)
    }

    pub fn player_for_connection(&self, connection: &ConnectionId) -> Option<&Player> {
        self.players.iter().find(|p| p.connection == *connection)
    }

    pub(super) fn position_of(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == *player_id)
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Cards currently in hands plus the pile.
    pub fn cards_in_play(&self) -> usize {
        self.pile.len() + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// Seats a new player at the end of the rotation.
    pub fn add_player(&mut self, mut player: Player) -> RoomResult<()> {
        if self.is_started() {
            return Err(RoomError::AlreadyStarted);
        }
        if self.player_for_connection(&player.connection).is_some() {
            return Err(RoomError::AlreadyJoined);
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }

        player.is_host = false;
        player.reset();
        info!("{} ({}) joined room {}", player.name, player.id, self.id);
        self.players.push(player);
        Ok(())
    }

    /// Removes the player bound to `connection`, if seated here.
    ///
    /// The turn pointer keeps pointing at the same player when someone
    /// seated before them leaves, and wraps to the first seat when it falls
    /// off the end. In an active round it then skips finished players.
    pub fn remove_connection(&mut self, connection: &ConnectionId) -> Option<Departure> {
        let idx = self
            .players
            .iter()
            .position(|p| p.connection == *connection)?;
        let player = self.players.remove(idx);
        info!("{} ({}) left room {}", player.name, player.id, self.id);

        if self.players.is_empty() {
            self.turn_index = 0;
            return Some(Departure {
                player,
                game_over: None,
            });
        }

        if idx < self.turn_index {
            self.turn_index -= 1;
        }
        if self.turn_index >= self.players.len() {
            self.turn_index = 0;
        }

        let mut game_over = None;
        if self.is_started() {
            self.settle_turn();
            game_over = self.check_game_over();
        }

        Some(Departure { player, game_over })
    }

    /// Deals a freshly shuffled deck and moves the room to Active.
    pub fn start_game(&mut self) -> RoomResult<()> {
        if self.is_started() {
            return Err(RoomError::AlreadyStarted);
        }
        let deck = shuffled_deck(&self.config.deck);
        self.start_game_with_deck(deck)
    }

    /// Like [`Room::start_game`], dealing `deck` in the given order.
    pub fn start_game_with_deck(&mut self, deck: Vec<Card>) -> RoomResult<()> {
        if self.is_started() {
            return Err(RoomError::AlreadyStarted);
        }

        self.phase = Phase::Dealing;
        self.pile.clear();
        self.last_claim = None;
        self.turn_index = 0;
        for player in &mut self.players {
            player.reset();
        }

        let seats = self.players.len();
        if seats > 0 {
            for (i, card) in deck.into_iter().enumerate() {
                self.players[i % seats].hand.push(card);
            }
        }
        for player in &mut self.players {
            if player.hand.is_empty() {
                player.finished = true;
            }
        }

        self.phase = Phase::Active;
        self.settle_turn();
        info!(
            "Room {} started with {} players, {} cards dealt",
            self.id,
            seats,
            self.cards_in_play()
        );
        Ok(())
    }

    /// Ends the round if exactly one player still holds cards.
    ///
    /// That player is the loser and everyone else a winner. A round in which
    /// nobody holds cards any more also ends, without an announcement.
    pub fn check_game_over(&mut self) -> Option<GameOverView> {
        if !self.is_started() {
            return None;
        }

        let announcement = {
            let mut active = self.players.iter().filter(|p| p.is_active());
            match (active.next(), active.next()) {
                (Some(loser), None) => Some(GameOverView::new(&self.id, loser, &self.players)),
                (Some(_), Some(_)) => return None,
                (None, _) => None,
            }
        };

        self.phase = Phase::GameOver;
        match &announcement {
            Some(game_over) => info!(
                "Room {} game over, {} ({}) loses",
                self.id, game_over.loser_name, game_over.loser_id
            ),
            None => info!("Room {} round ended with no cards left in hand", self.id),
        }
        announcement
    }
}
