use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spade,
    #[serde(rename = "♥")]
    Heart,
    #[serde(rename = "♦")]
    Diamond,
    #[serde(rename = "♣")]
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
        };
        write!(f, "{repr}")
    }
}

/// Card rank. Ordering follows the conventional A, 2..10, J, Q, K sequence.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier distinguishing one physical card from another within a deck.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CardId(pub u16);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub id: CardId,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit, id: CardId) -> Self {
        Self { rank, suit, id }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{}{}", self.rank, self.suit);
        write!(f, "{repr:>3}")
    }
}

/// Key a room is registered under.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    /// Generates a short lowercase base-36 identifier.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let id: String = (0..constants::ROOM_ID_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..constants::ROOM_ID_ALPHABET.len());
                constants::ROOM_ID_ALPHABET[idx] as char
            })
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of one live transport connection.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Player identifier as seen by clients. Derived from the owning connection,
/// so a dropped connection can never reclaim it.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn for_connection(connection: &ConnectionId) -> Self {
        let simple = connection.0.simple().to_string();
        Self(format!("{}{}", constants::PLAYER_ID_PREFIX, &simple[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Normalizes a client-supplied display name.
pub fn display_name(name: Option<&str>) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return constants::DEFAULT_PLAYER_NAME.to_string();
    }
    name.chars()
        .filter(|c| !c.is_control())
        .take(constants::MAX_NAME_LENGTH)
        .collect()
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub connection: ConnectionId,
    pub name: String,
    pub hand: Vec<Card>,
    pub is_host: bool,
    /// Set while the player holds no cards and is skipped by the rotation.
    pub finished: bool,
}

impl Player {
    pub fn new(connection: ConnectionId, name: String, is_host: bool) -> Self {
        Self {
            id: PlayerId::for_connection(&connection),
            connection,
            name,
            hand: Vec::new(),
            is_host,
            finished: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.finished
    }

    pub fn reset(&mut self) {
        self.hand.clear();
        self.finished = false;
    }

    /// Adds cards to the hand, clearing `finished` if the hand is now non-empty.
    pub fn pick_up(&mut self, cards: Vec<Card>) {
        self.hand.extend(cards);
        if !self.hand.is_empty() {
            self.finished = false;
        }
    }

    /// Removes the given cards from the hand, in request order. Ids not held
    /// are skipped.
    pub fn take_cards(&mut self, card_ids: &[CardId]) -> Vec<Card> {
        let mut taken = Vec::with_capacity(card_ids.len());
        for card_id in card_ids {
            if let Some(idx) = self.hand.iter().position(|c| c.id == *card_id) {
                taken.push(self.hand.remove(idx));
            }
        }
        taken
    }
}

/// What a player declares alongside a play.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDeclaration {
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub claim_text: Option<String>,
}

impl ClaimDeclaration {
    pub fn of_rank(rank: Rank) -> Self {
        Self {
            rank: Some(rank),
            claim_text: None,
        }
    }

    pub fn unranked() -> Self {
        Self::default()
    }
}

/// The most recent play, pending a possible challenge.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub player_id: PlayerId,
    pub rank: Option<Rank>,
    /// Number of cards the play appended to the pile.
    pub count: usize,
    pub claim_text: String,
}

impl Claim {
    pub fn new(player_id: PlayerId, declaration: ClaimDeclaration, count: usize) -> Self {
        let claim_text = declaration.claim_text.unwrap_or_else(|| {
            let rank = declaration.rank.map_or("?", |r| r.as_str());
            format!("{count} x {rank}")
        });
        Self {
            player_id,
            rank: declaration.rank,
            count,
            claim_text,
        }
    }
}
