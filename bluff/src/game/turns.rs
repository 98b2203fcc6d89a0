//! Turn rotation over active players.

use super::state::Room;

impl Room {
    /// Advances the turn to the next active player after the current one,
    /// in seating order.
    ///
    /// Does nothing when one or no players are active; ending the round in
    /// that case is [`Room::check_game_over`]'s job.
    pub fn next_turn(&mut self) {
        let seats = self.players.len();
        if seats == 0 || self.active_count() <= 1 {
            return;
        }

        for step in 1..=seats {
            let candidate = (self.turn_index + step) % seats;
            if self.players[candidate].is_active() {
                self.turn_index = candidate;
                return;
            }
        }
    }

    /// Moves the pointer off a finished player, leaving it alone otherwise.
    pub(super) fn settle_turn(&mut self) {
        let on_active = self
            .players
            .get(self.turn_index)
            .is_some_and(|p| p.is_active());
        if !on_active {
            self.next_turn();
        }
    }
}
