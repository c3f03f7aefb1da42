//! Deck generation, shuffling and dealing.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::{Builder, Uuid};

use crate::domain::{Card, CardAbility, CardColour, CardFace};

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 108;

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Generate the full 108-card deck in a fixed order.
///
/// Per colour: one 0, two each of 1..=9, two each of reverse/skip/draw-two.
/// Then two colourless wilds and two colourless wild-draw-fours.
/// Card ids come from `rng` so a seeded generator yields a reproducible deck.
pub fn full_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for colour in CardColour::ALL {
        for number in 0..=9u8 {
            let copies = if number == 0 { 1 } else { 2 };
            for _ in 0..copies {
                deck.push(Card {
                    id: random_id(rng),
                    colour: Some(colour),
                    face: CardFace::Number(number),
                });
            }
        }

        for ability in CardAbility::COLOURED {
            for _ in 0..2 {
                deck.push(Card {
                    id: random_id(rng),
                    colour: Some(colour),
                    face: CardFace::Ability(ability),
                });
            }
        }
    }

    for ability in CardAbility::WILD {
        for _ in 0..2 {
            deck.push(Card {
                id: random_id(rng),
                colour: None,
                face: CardFace::Ability(ability),
            });
        }
    }

    deck
}

/// Uniform Fisher-Yates shuffle.
pub fn shuffle<R: Rng + ?Sized>(deck: &mut [Card], rng: &mut R) {
    deck.shuffle(rng);
}

/// Deal `hand_size` cards to each of `player_count` hands.
///
/// Cards are taken from the tail of `deck`, one hand at a time. Whatever
/// remains in `deck` becomes the shared pile.
pub fn deal_hands(deck: &mut Vec<Card>, player_count: usize, hand_size: usize) -> Vec<Vec<Card>> {
    let mut hands = Vec::with_capacity(player_count);
    for _ in 0..player_count {
        let mut hand = Vec::with_capacity(hand_size);
        for _ in 0..hand_size {
            if let Some(card) = deck.pop() {
                hand.push(card);
            }
        }
        hands.push(hand);
    }
    hands
}
