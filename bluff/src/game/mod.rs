//! Bluffing card game engine - room state and rules.
//!
//! This module provides the single-room game implementation:
//! - Deck construction and shuffling
//! - Room lifecycle (lobby, dealing, active, game over)
//! - Turn rotation over players who still hold cards
//! - Claims and bluff resolution over the tail of the pile
//! - Redacted public views and private hand views

pub mod claims;
pub mod constants;
pub mod deck;
pub mod entities;
pub mod errors;
pub mod state;
pub mod turns;
pub mod views;

pub use claims::{BluffResolution, ChallengeOutcome, ChallengePolicy, PlayOutcome, Verdict};
pub use deck::DeckConfig;
pub use errors::{RoomError, RoomResult};
pub use state::{Departure, Phase, Room};
pub use views::{GameOverView, HandView, PlayerSummary, RoomView, Winner};
