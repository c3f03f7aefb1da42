//! Placement legality: can a candidate card go on top of the active card.
//!
//! Kept free of pile state so a client preview and the server agree.

use super::cards_types::Card;

pub fn is_placeable(active: Option<&Card>, candidate: &Card) -> bool {
    let Some(active) = active else {
        return true;
    };

    if active.is_colour_pending() {
        return true;
    }

    if candidate.colour.is_some() && candidate.colour == active.colour {
        return true;
    }
    if candidate.number_value().is_some() && candidate.number_value() == active.number_value() {
        return true;
    }
    if candidate.ability_kind().is_some() && candidate.ability_kind() == active.ability_kind() {
        return true;
    }

    candidate.is_wild()
}
