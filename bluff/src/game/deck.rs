//! Deck construction and shuffling.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::entities::{Card, CardId, Rank, Suit};

/// Rank and suit sets a deck is built from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeckConfig {
    pub ranks: Vec<Rank>,
    pub suits: Vec<Suit>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DeckConfig {
    /// Full 52-card deck.
    pub fn standard() -> Self {
        Self {
            ranks: Rank::ALL.to_vec(),
            suits: Suit::ALL.to_vec(),
        }
    }

    /// 16-card deck of aces and court cards.
    pub fn court() -> Self {
        Self {
            ranks: vec![Rank::Ace, Rank::Jack, Rank::Queen, Rank::King],
            suits: Suit::ALL.to_vec(),
        }
    }

    pub fn size(&self) -> usize {
        self.ranks.len() * self.suits.len()
    }
}

/// Builds one card per rank/suit combination. Ids are positional, so the
/// same configuration always yields the same id for the same card.
pub fn make_deck(config: &DeckConfig) -> Vec<Card> {
    config
        .suits
        .iter()
        .flat_map(|suit| config.ranks.iter().map(move |rank| (*rank, *suit)))
        .enumerate()
        .map(|(idx, (rank, suit))| Card::new(rank, suit, CardId(idx as u16)))
        .collect()
}

/// Uniform in-place shuffle.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}

/// Builds and shuffles a deck using the thread-local generator.
pub fn shuffled_deck(config: &DeckConfig) -> Vec<Card> {
    let mut cards = make_deck(config);
    shuffle(&mut cards, &mut rand::rng());
    cards
}
