//! [`RulesEngine`] backed by the `cozy-chess` move generator

use cozy_chess::{
    Board, Color, File, GameStatus, Move, Piece as CozyPiece, Square as CozySquare,
};

use super::{MoveRecord, MoveRequest, RulesEngine};
use crate::error::RulesError;
use crate::types::{Piece, PieceKind, Side, Square};

/// Standard chess on top of a `cozy_chess::Board`.
///
/// cozy-chess has no undo and no repetition tracking, so the adapter keeps a
/// board snapshot and a position hash per applied move.
#[derive(Debug, Clone)]
pub struct CozyRules {
    /// Position restored by `reset`
    start: Board,
    board: Board,
    history: Vec<MoveRecord>,
    /// Board before each entry of `history`
    snapshots: Vec<Board>,
    /// Hash of every position reached, starting position included
    hashes: Vec<u64>,
}

impl Default for CozyRules {
    fn default() -> Self {
        Self::new()
    }
}

impl CozyRules {
    pub fn new() -> Self {
        Self::with_start(Board::default())
    }

    /// Start (and reset) from a custom position
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board = Board::from_fen(fen.trim(), false).map_err(|e| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self::with_start(board))
    }

    fn with_start(start: Board) -> Self {
        let hashes = vec![start.hash()];
        Self {
            board: start.clone(),
            start,
            history: Vec::new(),
            snapshots: Vec::new(),
            hashes,
        }
    }

    fn cozy_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves);
            false
        });
        moves
    }

    /// Find the engine move matching a request, translating castling.
    fn resolve(&self, request: MoveRequest) -> Option<Move> {
        let from = to_cozy_square(request.from);
        let to = to_cozy_square(request.to);
        let to = match self.castling_rook_square(from, to) {
            Some(rook) => rook,
            // A drop onto an own piece is never a move, even where the engine
            // would read it as castling.
            None if self.board.color_on(to) == Some(self.board.side_to_move()) => return None,
            None => to,
        };
        let promotion = to_cozy_piece(request.promotion.unwrap_or(PieceKind::Queen));

        self.cozy_moves().into_iter().find(|mv| {
            mv.from == from
                && mv.to == to
                && (mv.promotion.is_none() || mv.promotion == Some(promotion))
        })
    }

    /// cozy-chess encodes castling as the king capturing its own rook.
    ///
    /// Maps a two-file king step onto the rook square the engine expects.
    fn castling_rook_square(&self, from: CozySquare, to: CozySquare) -> Option<CozySquare> {
        let color = self.board.side_to_move();
        if self.board.king(color) != from || from.rank() != to.rank() {
            return None;
        }
        let rights = self.board.castle_rights(color);
        let rook_file = match to.file() as i8 - from.file() as i8 {
            2 => rights.short?,
            -2 => rights.long?,
            _ => return None,
        };
        Some(CozySquare::new(rook_file, from.rank()))
    }

    /// Describe an engine move in the current position.
    fn record_for(&self, mv: Move) -> MoveRecord {
        let side = from_cozy_color(self.board.side_to_move());
        let mover = self.board.piece_on(mv.from);
        let target_side = self.board.color_on(mv.to).map(from_cozy_color);

        let is_castle = mover == Some(CozyPiece::King) && target_side == Some(side);
        let to = if is_castle {
            let file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
                File::G
            } else {
                File::C
            };
            CozySquare::new(file, mv.from.rank())
        } else {
            mv.to
        };

        let captured = if target_side == Some(side.other()) {
            self.board.piece_on(mv.to)
        } else if mover == Some(CozyPiece::Pawn) && mv.from.file() != mv.to.file() {
            // en passant: the target square is empty
            Some(CozyPiece::Pawn)
        } else {
            None
        };

        MoveRecord {
            from: from_cozy_square(mv.from),
            to: from_cozy_square(to),
            promotion: mv.promotion.map(from_cozy_piece),
            side,
            captured: captured.map(from_cozy_piece),
        }
    }

    fn play(&mut self, mv: Move) -> MoveRecord {
        let record = self.record_for(mv);
        self.snapshots.push(self.board.clone());
        self.board.play_unchecked(mv);
        self.hashes.push(self.board.hash());
        self.history.push(record);
        record
    }

    fn is_threefold_repetition(&self) -> bool {
        let current = self.board.hash();
        self.hashes.iter().filter(|&&h| h == current).count() >= 3
    }

    /// K v K, K+minor v K, or only bishops that all stand on one square colour
    fn is_insufficient_material(&self) -> bool {
        let others = self.board.occupied() ^ self.board.pieces(CozyPiece::King);
        if others.is_empty() {
            return true;
        }

        let lone_minor = others.len() == 1;
        let mut bishop_colours = Vec::new();
        for sq in others {
            match self.board.piece_on(sq) {
                Some(CozyPiece::Bishop) => {
                    bishop_colours.push((sq.file() as u8 + sq.rank() as u8) % 2);
                }
                Some(CozyPiece::Knight) if lone_minor => return true,
                _ => return false,
            }
        }
        bishop_colours.windows(2).all(|w| w[0] == w[1])
    }
}

impl RulesEngine for CozyRules {
    fn reset(&mut self) {
        *self = Self::with_start(self.start.clone());
    }

    fn side_to_move(&self) -> Side {
        from_cozy_color(self.board.side_to_move())
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        let sq = to_cozy_square(square);
        let kind = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some(Piece::new(from_cozy_color(color), from_cozy_piece(kind)))
    }

    fn submit(&mut self, request: MoveRequest) -> Option<MoveRecord> {
        let mv = self.resolve(request)?;
        Some(self.play(mv))
    }

    fn legal_moves(&self) -> Vec<MoveRecord> {
        self.cozy_moves()
            .into_iter()
            .map(|mv| self.record_for(mv))
            .collect()
    }

    fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    fn is_checkmate(&self) -> bool {
        self.board.status() == GameStatus::Won
    }

    fn is_draw(&self) -> bool {
        self.board.status() == GameStatus::Drawn
            || self.is_threefold_repetition()
            || self.is_insufficient_material()
    }

    fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    fn fen(&self) -> String {
        self.board.to_string()
    }

    fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        if let Some(previous) = self.snapshots.pop() {
            self.board = previous;
        }
        self.hashes.pop();
        Some(record)
    }
}

fn to_cozy_square(sq: Square) -> CozySquare {
    CozySquare::index(sq.index() as usize)
}

fn from_cozy_square(sq: CozySquare) -> Square {
    Square(sq as u8)
}

fn from_cozy_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn to_cozy_piece(kind: PieceKind) -> CozyPiece {
    match kind {
        PieceKind::Pawn => CozyPiece::Pawn,
        PieceKind::Knight => CozyPiece::Knight,
        PieceKind::Bishop => CozyPiece::Bishop,
        PieceKind::Rook => CozyPiece::Rook,
        PieceKind::Queen => CozyPiece::Queen,
        PieceKind::King => CozyPiece::King,
    }
}

fn from_cozy_piece(piece: CozyPiece) -> PieceKind {
    match piece {
        CozyPiece::Pawn => PieceKind::Pawn,
        CozyPiece::Knight => PieceKind::Knight,
        CozyPiece::Bishop => PieceKind::Bishop,
        CozyPiece::Rook => PieceKind::Rook,
        CozyPiece::Queen => PieceKind::Queen,
        CozyPiece::King => PieceKind::King,
    }
}

#[cfg(test)]
#[path = "cozy_tests.rs"]
mod cozy_tests;
