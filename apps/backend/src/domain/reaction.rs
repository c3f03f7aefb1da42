//! Reactions: the turn-level effects of a draw or a play.

/// One instruction for the round interpreter, consumed in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Move the turn one seat in the current direction.
    AdvanceTurn,
    /// Flip the direction of play without moving.
    ReverseDirection,
    /// Deal one card to the player holding the turn, keeping the turn.
    ForceDraw,
    /// Notify the originating connection (or everyone) of a problem.
    Error(String),
}
