//! Room configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{claims::ChallengePolicy, constants::DEFAULT_MAX_PLAYERS, deck::DeckConfig};

/// Deck presets selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckPreset {
    Standard,
    Court,
}

impl std::fmt::Display for DeckPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckPreset::Standard => write!(f, "standard"),
            DeckPreset::Court => write!(f, "court"),
        }
    }
}

impl std::str::FromStr for DeckPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "full" => Ok(DeckPreset::Standard),
            "court" | "reduced" => Ok(DeckPreset::Court),
            other => Err(format!("unknown deck preset '{other}'")),
        }
    }
}

impl From<DeckPreset> for DeckConfig {
    fn from(preset: DeckPreset) -> Self {
        match preset {
            DeckPreset::Standard => DeckConfig::standard(),
            DeckPreset::Court => DeckConfig::court(),
        }
    }
}

/// Room configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Ranks and suits dealt at the start of each game
    pub deck: DeckConfig,

    /// Maximum number of seated players (default: 12)
    pub max_players: usize,

    /// Whether a challenge must name the last claimant
    pub challenge_policy: ChallengePolicy,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            deck: DeckConfig::standard(),
            max_players: DEFAULT_MAX_PLAYERS,
            challenge_policy: ChallengePolicy::Lenient,
        }
    }
}

impl RoomConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.deck.ranks.is_empty() {
            return Err("Deck must have at least one rank".to_string());
        }

        if self.deck.suits.is_empty() {
            return Err("Deck must have at least one suit".to_string());
        }

        if self.deck.size() > u16::MAX as usize {
            return Err("Deck is too large".to_string());
        }

        if self.max_players == 0 {
            return Err("Max players must be at least 1".to_string());
        }

        Ok(())
    }
}
