/// Property-based tests for pile engine invariants
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{CardColour, PileEngine, Reaction, DECK_SIZE};

#[derive(Debug, Clone)]
enum Op {
    Draw { seat: usize },
    Play { seat: usize, pick: usize, colour: Option<usize> },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(|seat| Op::Draw { seat }),
        (0usize..4, 0usize..32, proptest::option::of(0usize..4))
            .prop_map(|(seat, pick, colour)| Op::Play { seat, pick, colour }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: Card conservation
    /// No sequence of draws and plays (legal or not) creates or destroys cards.
    #[test]
    fn prop_cards_conserved(
        seed in any::<u64>(),
        players in 2usize..=4,
        ops in proptest::collection::vec(op(), 0..200),
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut engine = PileEngine::initialize(players, &mut rng);
        prop_assert_eq!(engine.total_cards(), DECK_SIZE);

        for op in ops {
            match op {
                Op::Draw { seat } => {
                    let reactions = engine.draw(seat % players);
                    prop_assert_eq!(reactions, vec![Reaction::AdvanceTurn]);
                }
                Op::Play { seat, pick, colour } => {
                    let seat = seat % players;
                    let hand = engine.hand(seat);
                    if hand.is_empty() {
                        continue;
                    }
                    let card = hand[pick % hand.len()].clone();
                    let colour = colour.map(|i| CardColour::ALL[i]);
                    let placeable = engine.is_placeable(&card);
                    match engine.play(seat, card.id, colour) {
                        Ok(_) => {
                            prop_assert!(placeable);
                            prop_assert_eq!(engine.active_card().map(|c| c.id), Some(card.id));
                            if card.is_wild() {
                                prop_assert_eq!(engine.active_card().and_then(|c| c.colour), colour);
                            }
                        }
                        Err(_) => {
                            prop_assert!(!placeable || (card.is_wild() && colour.is_none()));
                        }
                    }
                }
            }
            prop_assert_eq!(engine.total_cards(), DECK_SIZE);
            prop_assert!(engine.pile_len() >= 1, "the active card never leaves the pile");
        }
    }
}
