//! Captured-piece trays

use serde::Serialize;

use crate::types::{Piece, PieceKind, Side};

/// Pieces removed from the board, keyed by the colour of the removed piece.
///
/// `white` holds White pieces taken by Black and vice versa. Each list is a
/// stack in move order, so undo pops the most recent capture of that colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapturedPieces {
    white: Vec<PieceKind>,
    black: Vec<PieceKind>,
}

impl CapturedPieces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, piece: Piece) {
        self.list_mut(piece.side).push(piece.kind);
    }

    pub fn pop(&mut self, side: Side) -> Option<PieceKind> {
        self.list_mut(side).pop()
    }

    /// Captured pieces of one colour, oldest first
    pub fn of(&self, side: Side) -> &[PieceKind] {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    /// Captured pieces of one colour with the colour attached
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Piece> + '_ {
        self.of(side).iter().map(move |&kind| Piece::new(side, kind))
    }

    pub fn total(&self) -> usize {
        self.white.len() + self.black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.white.clear();
        self.black.clear();
    }

    fn list_mut(&mut self, side: Side) -> &mut Vec<PieceKind> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}
