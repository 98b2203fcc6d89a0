/// Property-based tests for room rules using proptest
///
/// Random sequences of plays and challenges are driven through a room and
/// the card accounting and turn rotation are checked after every step.
use bluff::{
    Room, RoomConfig,
    entities::{ClaimDeclaration, ConnectionId, PlayerId, Rank},
    game::{
        Phase,
        deck::{DeckConfig, make_deck, shuffle},
        entities::Player,
    },
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Step {
    /// Current player plays up to `count` cards from the front of their hand
    Play { count: usize, rank: Option<usize> },
    /// Seat `caller` challenges seat `claimed`, or the last claimant
    Challenge { caller: usize, claimed: Option<usize> },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0usize..=4, prop::option::of(0usize..13))
            .prop_map(|(count, rank)| Step::Play { count, rank }),
        1 => (0usize..8, prop::option::of(0usize..8))
            .prop_map(|(caller, claimed)| Step::Challenge { caller, claimed }),
    ]
}

fn deck_strategy() -> impl Strategy<Value = DeckConfig> {
    prop_oneof![Just(DeckConfig::standard()), Just(DeckConfig::court())]
}

fn build_room(players: usize, deck: DeckConfig) -> (Room, Vec<PlayerId>) {
    let host = Player::new(ConnectionId::new(), "p0".to_string(), true);
    let mut ids = vec![host.id.clone()];
    let config = RoomConfig {
        deck,
        ..RoomConfig::default()
    };
    let mut room = Room::new("prop".into(), host, config);
    for i in 1..players {
        let player = Player::new(ConnectionId::new(), format!("p{i}"), false);
        ids.push(player.id.clone());
        room.add_player(player).unwrap();
    }
    (room, ids)
}

fn assert_consistent(room: &Room, deck_size: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(room.cards_in_play(), deck_size, "cards were created or lost");

    let mut seen = BTreeSet::new();
    for card in room.pile().iter().chain(room.players().iter().flat_map(|p| p.hand.iter())) {
        prop_assert!(seen.insert(card.id), "card {} appears twice", card.id);
    }

    for player in room.players() {
        prop_assert_eq!(player.finished, player.hand.is_empty() && room.phase() != Phase::Lobby);
    }

    if room.is_started() {
        prop_assert!(room.active_count() >= 2, "active round with a single card holder");
        prop_assert!(
            room.players()[room.turn_index()].is_active(),
            "turn points at a finished player"
        );
    }

    let view = room.public_view();
    prop_assert_eq!(view.pile_count, room.pile().len());
    for (summary, player) in view.players.iter().zip(room.players()) {
        prop_assert_eq!(summary.count, player.hand.len());
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_random_games_conserve_cards(
        players in 2usize..=6,
        deck in deck_strategy(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..120),
    ) {
        let deck_size = deck.size();
        let mut cards = make_deck(&deck);
        shuffle(&mut cards, &mut StdRng::seed_from_u64(seed));

        let (mut room, ids) = build_room(players, deck);
        room.start_game_with_deck(cards).unwrap();
        assert_consistent(&room, deck_size)?;

        let mut game_overs = 0;
        for step in steps {
            if !room.is_started() {
                break;
            }
            match step {
                Step::Play { count, rank } => {
                    let turn = room.turn_index();
                    let player_id = room.players()[turn].id.clone();
                    let card_ids: Vec<_> =
                        room.players()[turn].hand.iter().take(count).map(|c| c.id).collect();
                    let declaration = match rank {
                        Some(idx) => ClaimDeclaration::of_rank(Rank::ALL[idx]),
                        None => ClaimDeclaration::unranked(),
                    };
                    let pile_before = room.pile().len();

                    let outcome = room.play_cards(&player_id, &card_ids, declaration).unwrap();
                    prop_assert_eq!(outcome.played, card_ids.len());
                    prop_assert_eq!(room.pile().len(), pile_before + card_ids.len());
                    prop_assert_eq!(room.last_claim().map(|c| c.count), Some(card_ids.len()));
                    if outcome.game_over.is_some() {
                        game_overs += 1;
                    }
                }
                Step::Challenge { caller, claimed } => {
                    let caller_id = ids[caller % ids.len()].clone();
                    let claimed_id = match (claimed, room.last_claim()) {
                        (Some(idx), _) => ids[idx % ids.len()].clone(),
                        (None, Some(claim)) => claim.player_id.clone(),
                        (None, None) => caller_id.clone(),
                    };
                    let Some(claim) = room.last_claim().cloned() else {
                        prop_assert!(room.call_bluff(&caller_id, &claimed_id).is_err());
                        continue;
                    };

                    let pile_before = room.pile().to_vec();
                    let tail = claim.count.min(pile_before.len());
                    let outcome = room.call_bluff(&caller_id, &claimed_id).unwrap();

                    // Only the cards behind the last claim are revealed.
                    prop_assert_eq!(outcome.resolution.picked, tail);
                    prop_assert_eq!(room.pile(), &pile_before[..pile_before.len() - tail]);
                    prop_assert!(room.last_claim().is_none());

                    let revealed = &pile_before[pile_before.len() - tail..];
                    let lie = claim
                        .rank
                        .is_some_and(|rank| revealed.iter().any(|c| c.rank != rank));
                    let expected = if lie { &claimed_id } else { &caller_id };
                    prop_assert_eq!(&outcome.resolution.who, expected);

                    if outcome.game_over.is_some() {
                        game_overs += 1;
                    }
                }
            }
            assert_consistent(&room, deck_size)?;
        }

        prop_assert!(game_overs <= 1);
        if game_overs == 1 {
            prop_assert_eq!(room.phase(), Phase::GameOver);
            prop_assert_eq!(room.active_count(), 1);
        }
    }

    #[test]
    fn test_deal_is_balanced(players in 1usize..=12, seed in any::<u64>()) {
        let deck = DeckConfig::standard();
        let mut cards = make_deck(&deck);
        shuffle(&mut cards, &mut StdRng::seed_from_u64(seed));

        let (mut room, _) = build_room(players, deck);
        room.start_game_with_deck(cards).unwrap();

        let sizes: Vec<usize> = room.players().iter().map(|p| p.hand.len()).collect();
        let min = sizes.iter().copied().min().unwrap();
        let max = sizes.iter().copied().max().unwrap();
        prop_assert!(max - min <= 1, "uneven deal {:?}", sizes);
        prop_assert_eq!(sizes.iter().sum::<usize>(), 52);
        // Earlier seats get the extra cards.
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }
}
