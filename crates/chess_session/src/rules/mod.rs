//! Rules-engine collaborator
//!
//! The controller never validates chess moves itself. Everything it needs to
//! know about the game (whose turn it is, what sits on a square, which moves
//! are legal, whether the game is over) goes through [`RulesEngine`].

mod cozy;

pub use cozy::CozyRules;

use serde::Serialize;
use std::fmt;

use crate::types::{Piece, PieceKind, Side, Square};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A move as submitted by the controller: squares plus an optional promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    /// Ignored for moves that do not promote. Promotions default to a queen.
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }
}

/// A fully detailed move, as found in the legal move list and in history.
///
/// Castling is always reported with the king's real destination (`e1g1`),
/// whatever encoding the underlying engine uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    /// The side that made the move
    pub side: Side,
    /// Kind of the piece removed by this move, including en passant
    pub captured: Option<PieceKind>,
}

impl MoveRecord {
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// The captured piece with its colour, always the opponent of the mover
    pub fn captured_piece(&self) -> Option<Piece> {
        self.captured.map(|kind| Piece::new(self.side.other(), kind))
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Narrow contract the session needs from a chess rules implementation.
pub trait RulesEngine {
    /// Start over from the engine's starting position with an empty history.
    fn reset(&mut self);

    fn side_to_move(&self) -> Side;

    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Apply a move if it is legal.
    ///
    /// Returns `None` and leaves the position untouched when it is not.
    fn submit(&mut self, request: MoveRequest) -> Option<MoveRecord>;

    /// All legal moves for the side to move, one entry per promotion choice.
    fn legal_moves(&self) -> Vec<MoveRecord>;

    /// Applied moves, oldest first
    fn history(&self) -> &[MoveRecord];

    fn is_checkmate(&self) -> bool;

    /// Stalemate, fifty-move rule, threefold repetition or insufficient material
    fn is_draw(&self) -> bool;

    fn in_check(&self) -> bool;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// Current position as FEN
    fn fen(&self) -> String;

    /// Take back exactly one half-move. Returns `None` with an empty history.
    fn undo(&mut self) -> Option<MoveRecord>;
}
