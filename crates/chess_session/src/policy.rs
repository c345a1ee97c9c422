//! Move-selection policy for the automated side

use crate::rules::MoveRecord;

/// Picks the automated reply from the legal move list.
///
/// This allows swapping the random mover for an evaluating engine without
/// touching the session controller.
pub trait MovePolicy {
    /// Choose one of `legal_moves`. Returns `None` only when the list is empty.
    fn select_move(&mut self, legal_moves: &[MoveRecord]) -> Option<MoveRecord>;

    /// Returns the policy's name for logs
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
