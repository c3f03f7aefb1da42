//! The pile engine: shared pile, hands, legality and card effects.
//!
//! A single sequence serves as both draw source (head) and discard history
//! (tail). The tail card is the active card. Draws stop once only the
//! active card remains; there is no reshuffle.

use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::domain::cards_logic;
use crate::domain::dealing::{deal_hands, full_deck, shuffle};
use crate::domain::{Card, CardAbility, CardColour, CardFace, CardId, Reaction};
use crate::errors::domain::{DomainError, ValidationKind};

/// Cards dealt to each player at round start.
pub const HAND_SIZE: usize = 7;

#[derive(Debug, Clone)]
pub struct PileEngine {
    pile: VecDeque<Card>,
    hands: Vec<Vec<Card>>,
}

impl PileEngine {
    /// Build, shuffle and deal a fresh deck for `player_count` players.
    pub fn initialize<R: Rng + ?Sized>(player_count: usize, rng: &mut R) -> Self {
        Self::initialize_with_hand_size(player_count, HAND_SIZE, rng)
    }

    pub fn initialize_with_hand_size<R: Rng + ?Sized>(
        player_count: usize,
        hand_size: usize,
        rng: &mut R,
    ) -> Self {
        debug_assert!(player_count >= 2, "a round needs at least two players");
        let mut deck = full_deck(rng);
        shuffle(&mut deck, rng);
        let hands = deal_hands(&mut deck, player_count, hand_size);
        debug!(
            player_count,
            hand_size,
            pile = deck.len(),
            "pile initialized"
        );
        Self {
            pile: deck.into(),
            hands,
        }
    }

    /// Assemble an engine from an explicit layout. `pile` is head-first, so
    /// its last element is the active card.
    pub fn from_parts(pile: Vec<Card>, hands: Vec<Vec<Card>>) -> Self {
        Self {
            pile: pile.into(),
            hands,
        }
    }

    pub fn active_card(&self) -> Option<&Card> {
        self.pile.back()
    }

    pub fn is_placeable(&self, card: &Card) -> bool {
        cards_logic::is_placeable(self.active_card(), card)
    }

    pub fn pile(&self) -> impl Iterator<Item = &Card> {
        self.pile.iter()
    }

    pub fn pile_len(&self) -> usize {
        self.pile.len()
    }

    pub fn hands(&self) -> &[Vec<Card>] {
        &self.hands
    }

    pub fn hand(&self, position: usize) -> &[Card] {
        self.hands.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    /// Cards across the pile and every hand.
    pub fn total_cards(&self) -> usize {
        self.pile.len() + self.hands.iter().map(Vec::len).sum::<usize>()
    }

    /// Deal the head card to `position`, unless only the active card is left.
    pub fn draw(&mut self, position: usize) -> Vec<Reaction> {
        if self.pile.len() > 1 {
            if let Some(hand) = self.hands.get_mut(position) {
                if let Some(mut card) = self.pile.pop_front() {
                    if card.is_wild() {
                        card.colour = None;
                    }
                    hand.push(card);
                }
            }
        } else {
            debug!(position, "draw refused: only the active card remains");
        }
        vec![Reaction::AdvanceTurn]
    }

    pub fn play(
        &mut self,
        position: usize,
        card_id: CardId,
        chosen_colour: Option<CardColour>,
    ) -> Result<Vec<Reaction>, DomainError> {
        let Some(hand) = self.hands.get(position) else {
            return Err(card_not_found());
        };
        let Some(card) = hand.iter().find(|c| c.id == card_id) else {
            return Err(card_not_found());
        };

        if !self.is_placeable(card) {
            return Err(DomainError::validation(
                ValidationKind::CardNotPlaceable,
                "Card not placeable.",
            ));
        }

        if card.is_wild() && chosen_colour.is_none() {
            return Err(DomainError::validation(
                ValidationKind::ColourRequired,
                "Colour not selected.",
            ));
        }

        let hand = &mut self.hands[position];
        let index = hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(card_not_found)?;
        let mut card = hand.remove(index);
        let face = card.face;
        if card.is_wild() {
            card.colour = chosen_colour;
        }
        self.pile.push_back(card);

        use Reaction::{AdvanceTurn as Advance, ForceDraw, ReverseDirection as Reverse};
        let reactions = match face {
            CardFace::Number(_) => vec![Advance],
            CardFace::Ability(CardAbility::DrawTwo) => vec![Advance, ForceDraw, ForceDraw, Advance],
            CardFace::Ability(CardAbility::Skip) => vec![Advance, Advance],
            CardFace::Ability(CardAbility::Reverse) => {
                if self.hands.len() > 2 {
                    vec![Reverse, Advance]
                } else {
                    vec![Reverse, Advance, Advance]
                }
            }
            CardFace::Ability(CardAbility::Wild) => vec![Advance],
            CardFace::Ability(CardAbility::WildDrawFour) => {
                vec![Advance, ForceDraw, ForceDraw, ForceDraw, ForceDraw, Advance]
            }
        };
        Ok(reactions)
    }
}

fn card_not_found() -> DomainError {
    DomainError::validation(ValidationKind::CardNotInHand, "Card not found.")
}
