//! Domain layer: pure game logic types and helpers.

pub mod cards_logic;
pub mod cards_types;
pub mod dealing;
pub mod pile;
pub mod reaction;
pub mod turn;

#[cfg(test)]
mod tests_props_pile;

// Re-exports for ergonomics
pub use cards_logic::is_placeable;
pub use cards_types::{Card, CardAbility, CardColour, CardFace, CardId};
pub use dealing::{deal_hands, full_deck, DECK_SIZE};
pub use pile::{PileEngine, HAND_SIZE};
pub use reaction::Reaction;
pub use turn::{next_position, Direction};
