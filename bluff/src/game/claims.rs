//! Plays, claims and bluff resolution.
//!
//! A play pushes cards face-down onto the pile and records a [`Claim`]
//! covering exactly those cards. A challenge reveals only that tail of the
//! pile, never cards from earlier claims, and hands it to whoever was wrong.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::{CardId, Claim, ClaimDeclaration, PlayerId},
    errors::{RoomError, RoomResult},
    state::Room,
    views::GameOverView,
};

/// Whether a challenge must name the author of the last claim.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengePolicy {
    /// Any seated player may be named as the challenged party.
    #[default]
    Lenient,
    /// The challenged party must be the player who made the last claim.
    Strict,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The claim was false; the claimant picks up the revealed cards.
    Liar,
    /// The claim held up; the challenger picks up the revealed cards.
    Wrong,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Liar => write!(f, "liar"),
            Verdict::Wrong => write!(f, "wrong"),
        }
    }
}

/// What a challenge decided, as reported back to the challenger.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BluffResolution {
    pub result: Verdict,
    /// Player who received the revealed cards.
    pub who: PlayerId,
    /// How many cards they received.
    pub picked: usize,
}

#[derive(Debug)]
pub struct PlayOutcome {
    pub played: usize,
    pub game_over: Option<GameOverView>,
}

#[derive(Debug)]
pub struct ChallengeOutcome {
    pub resolution: BluffResolution,
    pub game_over: Option<GameOverView>,
}

impl Room {
    /// Moves the named cards from the player's hand onto the pile and records
    /// the accompanying claim.
    ///
    /// Ids the player doesn't hold are skipped; the claim counts only the
    /// cards actually moved.
    pub fn play_cards(
        &mut self,
        player_id: &PlayerId,
        card_ids: &[CardId],
        declaration: ClaimDeclaration,
    ) -> RoomResult<PlayOutcome> {
        if !self.is_started() {
            return Err(RoomError::NotStarted);
        }
        let idx = self
            .position_of(player_id)
            .ok_or(RoomError::PlayerNotFound)?;
        if idx != self.turn_index {
            return Err(RoomError::OutOfTurn);
        }

        let player = &mut self.players[idx];
        let played = player.take_cards(card_ids);
        if player.hand.is_empty() {
            player.finished = true;
        }

        let count = played.len();
        self.pile.extend(played);
        let claim = Claim::new(player_id.clone(), declaration, count);
        debug!(
            "Room {}: {} claims {} (pile {})",
            self.id(),
            player_id,
            claim.claim_text,
            self.pile.len()
        );
        self.last_claim = Some(claim);

        self.next_turn();
        let game_over = self.check_game_over();
        Ok(PlayOutcome {
            played: count,
            game_over,
        })
    }

    /// Challenges the pending claim.
    ///
    /// The claim is a bluff iff it named a rank and at least one revealed
    /// card has a different rank; an unranked claim can never be a bluff.
    /// The loser of the challenge picks up the revealed cards, the turn
    /// pointer jumps to them and then advances past them.
    pub fn call_bluff(
        &mut self,
        caller_id: &PlayerId,
        claimed_id: &PlayerId,
    ) -> RoomResult<ChallengeOutcome> {
        if !self.is_started() {
            return Err(RoomError::NothingToChallenge);
        }
        let (claim_rank, claim_count, claimant) = match &self.last_claim {
            Some(claim) => (claim.rank, claim.count, claim.player_id.clone()),
            None => return Err(RoomError::NothingToChallenge),
        };
        let (Some(caller_idx), Some(claimed_idx)) =
            (self.position_of(caller_id), self.position_of(claimed_id))
        else {
            return Err(RoomError::InvalidPlayers);
        };
        if self.config.challenge_policy == ChallengePolicy::Strict && claimant != *claimed_id {
            return Err(RoomError::NotClaimant);
        }

        let count = claim_count.min(self.pile.len());
        let revealed = self.pile.split_off(self.pile.len() - count);
        let liar = claim_rank.is_some_and(|rank| revealed.iter().any(|c| c.rank != rank));
        self.last_claim = None;

        let (result, recipient) = if liar {
            (Verdict::Liar, claimed_idx)
        } else {
            (Verdict::Wrong, caller_idx)
        };
        let picked = revealed.len();
        self.players[recipient].pick_up(revealed);
        let who = self.players[recipient].id.clone();
        debug!(
            "Room {}: {} called {} -> {}, {} picks up {}",
            self.id(),
            caller_id,
            claimed_id,
            result,
            who,
            picked
        );

        self.turn_index = recipient;
        self.next_turn();
        let game_over = self.check_game_over();
        Ok(ChallengeOutcome {
            resolution: BluffResolution {
                result,
                who,
                picked,
            },
            game_over,
        })
    }
}
