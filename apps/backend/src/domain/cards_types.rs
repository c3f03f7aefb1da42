//! Core card-related types: Card, CardColour, CardAbility, CardFace

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColour {
    Red,
    Green,
    Blue,
    Yellow,
}

impl CardColour {
    pub const ALL: [CardColour; 4] = [
        CardColour::Red,
        CardColour::Green,
        CardColour::Blue,
        CardColour::Yellow,
    ];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAbility {
    Reverse,
    Skip,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl CardAbility {
    /// Abilities printed on coloured cards.
    pub const COLOURED: [CardAbility; 3] =
        [CardAbility::Reverse, CardAbility::Skip, CardAbility::DrawTwo];

    /// Abilities on colourless cards; a colour is chosen when played.
    pub const WILD: [CardAbility; 2] = [CardAbility::Wild, CardAbility::WildDrawFour];

    pub fn is_wild(self) -> bool {
        matches!(self, CardAbility::Wild | CardAbility::WildDrawFour)
    }
}

/// What is printed on a card: exactly one of a number or an ability.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    Number(u8),
    Ability(CardAbility),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// `None` only for wild-type cards awaiting a colour choice.
    pub colour: Option<CardColour>,
    #[serde(flatten)]
    pub face: CardFace,
}

impl Card {
    pub fn number(colour: CardColour, number: u8) -> Self {
        debug_assert!(number <= 9, "card numbers run 0..=9");
        Self {
            id: Uuid::new_v4(),
            colour: Some(colour),
            face: CardFace::Number(number),
        }
    }

    pub fn ability(colour: CardColour, ability: CardAbility) -> Self {
        Self {
            id: Uuid::new_v4(),
            colour: Some(colour),
            face: CardFace::Ability(ability),
        }
    }

    pub fn wild(ability: CardAbility) -> Self {
        debug_assert!(ability.is_wild());
        Self {
            id: Uuid::new_v4(),
            colour: None,
            face: CardFace::Ability(ability),
        }
    }

    pub fn ability_kind(&self) -> Option<CardAbility> {
        match self.face {
            CardFace::Ability(ability) => Some(ability),
            CardFace::Number(_) => None,
        }
    }

    pub fn number_value(&self) -> Option<u8> {
        match self.face {
            CardFace::Number(n) => Some(n),
            CardFace::Ability(_) => None,
        }
    }

    pub fn is_wild(&self) -> bool {
        self.ability_kind().is_some_and(CardAbility::is_wild)
    }

    /// A wild-type card on the pile whose colour has not been chosen.
    pub fn is_colour_pending(&self) -> bool {
        self.is_wild() && self.colour.is_none()
    }
}
