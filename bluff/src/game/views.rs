//! Redacted projections of room state.
//!
//! [`RoomView`] is safe to broadcast to everyone in a room: it carries hand
//! sizes, never hand contents. Each player's cards only leave through
//! [`Room::hand_views`], addressed to that player's own connection.

use serde::{Deserialize, Serialize};

use super::{
    entities::{Card, Claim, ConnectionId, Player, PlayerId, RoomId},
    state::{Phase, Room},
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub count: usize,
    pub is_host: bool,
    pub finished: bool,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            count: player.hand.len(),
            is_host: player.is_host,
            finished: player.finished,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub room_id: RoomId,
    pub players: Vec<PlayerSummary>,
    pub pile_count: usize,
    pub last_claim: Option<Claim>,
    pub turn_index: usize,
    pub started: bool,
    pub phase: Phase,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Winner {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverView {
    pub room_id: RoomId,
    pub loser_id: PlayerId,
    pub loser_name: String,
    pub winners: Vec<Winner>,
}

impl GameOverView {
    /// Everyone seated other than `loser` is a winner, in seating order.
    pub fn new(room_id: &RoomId, loser: &Player, players: &[Player]) -> Self {
        Self {
            room_id: room_id.clone(),
            loser_id: loser.id.clone(),
            loser_name: loser.name.clone(),
            winners: players
                .iter()
                .filter(|p| p.id != loser.id)
                .map(|p| Winner {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
        }
    }
}

/// A player's private view of their own cards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandView {
    pub connection: ConnectionId,
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
}

impl Room {
    pub fn public_view(&self) -> RoomView {
        RoomView {
            room_id: self.id().clone(),
            players: self.players.iter().map(PlayerSummary::from).collect(),
            pile_count: self.pile.len(),
            last_claim: self.last_claim.clone(),
            turn_index: self.turn_index,
            started: self.is_started(),
            phase: self.phase,
        }
    }

    pub fn hand_view(&self, player_id: &PlayerId) -> Option<Vec<Card>> {
        self.player(player_id).map(|p| p.hand.clone())
    }

    pub fn hand_views(&self) -> Vec<HandView> {
        self.players
            .iter()
            .map(|p| HandView {
                connection: p.connection,
                player_id: p.id.clone(),
                cards: p.hand.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::game::state::tests::room_with;
    use crate::room::config::RoomConfig;

    #[test]
    fn test_public_view_redacts_hands() {
        let (mut room, ids) = room_with(&["alice", "bob"], RoomConfig::default());
        room.start_game().unwrap();
        let view = room.public_view();
        assert_eq!(view.players.len(), 2);
        assert_eq!(view.players[0].count, 26);
        assert!(view.players[0].is_host);
        assert!(!view.players[1].is_host);
        assert_eq!(view.players[1].id, ids[1]);
        assert!(view.started);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["players"][0].get("hand").is_none());
        assert_eq!(json["pileCount"], 0);
        assert_eq!(json["turnIndex"], 0);
        assert!(json["lastClaim"].is_null());
        assert_eq!(json["players"][0]["isHost"], true);
    }

    #[test]
    fn test_hand_views_are_per_player() {
        let (mut room, ids) = room_with(&["alice", "bob"], RoomConfig::default());
        room.start_game().unwrap();
        let hands = room.hand_views();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[1].player_id, ids[1]);
        assert_eq!(hands[1].cards, room.players()[1].hand);
        assert_eq!(room.hand_view(&ids[0]).unwrap().len(), 26);
        assert!(room.hand_view(&"p_ghost".into()).is_none());
    }

    #[test]
    fn test_game_over_serializes_camel_case() {
        let (room, ids) = room_with(&["alice", "bob", "carol"], RoomConfig::default());
        let view = super::GameOverView::new(room.id(), &room.players()[1], room.players());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["loserId"], ids[1].as_str());
        assert_eq!(json["loserName"], "bob");
        assert_eq!(json["roomId"], "test");
        assert_eq!(json["winners"].as_array().unwrap().len(), 2);
        assert_eq!(json["winners"][0]["name"], "alice");
    }
}
