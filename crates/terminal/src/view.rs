//! Board renderer that draws to stdout

use chess_session::{BoardConfig, BoardView, CapturedPieces, Piece, PieceKind, Side, START_FEN};
use std::io::Write;

use crate::glyphs::{piece_char, EMPTY_SQUARE};

/// Redraws the whole frame whenever the status line changes or the terminal
/// is resized. Position and tray updates are only stored, since the session
/// always finishes a transition by publishing the status.
pub struct TerminalView {
    config: BoardConfig,
    fen: String,
    captured: CapturedPieces,
    status: String,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            config: BoardConfig::default(),
            fen: START_FEN.to_string(),
            captured: CapturedPieces::new(),
            status: String::new(),
        }
    }

    /// Create the full frame: board, trays and status line
    pub fn render(&self) -> String {
        let squares = parse_placement(&self.fen);
        let flipped = self.config.orientation == Side::Black;
        let mut frame = String::new();

        for row in 0..8 {
            let rank = if flipped { row } else { 7 - row };
            if self.config.show_notation {
                frame.push_str(&format!("{} ", rank + 1));
            }
            let cells: Vec<String> = (0..8)
                .map(|col| {
                    let file = if flipped { 7 - col } else { col };
                    squares[rank][file]
                        .map(|p| piece_char(p.side, p.kind))
                        .unwrap_or(EMPTY_SQUARE)
                        .to_string()
                })
                .collect();
            frame.push_str(&cells.join(" "));
            frame.push('\n');
        }

        if self.config.show_notation {
            let files: Vec<String> = (0..8)
                .map(|col| {
                    let file = if flipped { 7 - col } else { col };
                    ((b'a' + file as u8) as char).to_string()
                })
                .collect();
            frame.push_str(&format!("  {}\n", files.join(" ")));
        }

        for side in [Side::White, Side::Black] {
            let tray: String = self
                .captured
                .pieces(side)
                .map(|p| piece_char(p.side, p.kind))
                .collect();
            frame.push_str(&format!("Captured {side}: {tray}\n"));
        }
        frame.push_str(&format!("{}\n", self.status));
        frame
    }

    fn draw(&self) {
        let mut stdout = std::io::stdout();
        write!(stdout, "\n{}", self.render()).ok();
        stdout.flush().ok();
    }
}

impl BoardView for TerminalView {
    fn init(&mut self, config: &BoardConfig) {
        self.config = config.clone();
        self.fen = if config.position == "start" {
            START_FEN.to_string()
        } else {
            config.position.clone()
        };
    }

    fn set_position(&mut self, fen: &str) {
        self.fen = fen.to_string();
    }

    fn start(&mut self) {
        self.fen = START_FEN.to_string();
    }

    fn resize(&mut self) {
        self.draw();
    }

    fn show_captured(&mut self, captured: &CapturedPieces) {
        self.captured = captured.clone();
    }

    fn show_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.draw();
    }
}

/// Piece placement from the first FEN field, indexed `[rank][file]`
fn parse_placement(fen: &str) -> [[Option<Piece>; 8]; 8] {
    let mut squares = [[None; 8]; 8];
    let placement = fen.split_whitespace().next().unwrap_or("");

    for (row, rank_text) in placement.split('/').take(8).enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
            } else if let Some(kind) = PieceKind::from_letter(c) {
                if file < 8 {
                    let side = if c.is_ascii_uppercase() {
                        Side::White
                    } else {
                        Side::Black
                    };
                    squares[rank][file] = Some(Piece::new(side, kind));
                }
                file += 1;
            }
        }
    }
    squares
}
