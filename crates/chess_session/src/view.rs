//! Board-renderer collaborator

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::captured::CapturedPieces;
use crate::types::{Piece, Side};

/// Result of a drop gesture, returned to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Move applied; the piece stays where it was dropped
    Accept,
    /// Move rejected; the renderer returns the piece to its origin square
    Snapback,
}

/// Configuration bag handed to the renderer on `init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub draggable: bool,
    /// "start" or a FEN
    pub position: String,
    pub orientation: Side,
    /// Image URL template, `{piece}` is replaced with a label like "wP"
    pub piece_theme: String,
    pub show_notation: bool,
    pub move_speed_ms: u32,
    pub snap_speed_ms: u32,
    pub spare_pieces: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            draggable: true,
            position: "start".to_string(),
            orientation: Side::White,
            piece_theme: "https://chessboardjs.com/img/chesspieces/wikipedia/{piece}.png"
                .to_string(),
            show_notation: true,
            move_speed_ms: 200,
            snap_speed_ms: 100,
            spare_pieces: false,
        }
    }
}

impl BoardConfig {
    /// Image URL for a piece, used for board squares and captured trays alike
    pub fn piece_image(&self, piece: Piece) -> String {
        self.piece_theme.replace("{piece}", &piece.code())
    }
}

/// Commands the session sends to whatever draws the board.
///
/// The renderer calls back into the session through
/// `Session::on_drag_start`, `Session::on_drop` and `Session::on_snap_end`.
pub trait BoardView {
    fn init(&mut self, config: &BoardConfig);

    /// Show a position given as FEN
    fn set_position(&mut self, fen: &str);

    /// Show the standard starting layout
    fn start(&mut self);

    /// The container changed size
    fn resize(&mut self);

    /// Rebuild both captured-piece trays from scratch
    fn show_captured(&mut self, captured: &CapturedPieces);

    fn show_status(&mut self, status: &str);
}

/// Everything a [`HeadlessView`] has been told so far
#[derive(Debug, Clone, Default)]
pub struct ViewLog {
    pub config: Option<BoardConfig>,
    /// Last FEN passed to `set_position`
    pub position: Option<String>,
    pub starts: usize,
    pub resizes: usize,
    pub captured: CapturedPieces,
    pub status: String,
    /// Every status line published, oldest first
    pub status_history: Vec<String>,
}

/// Renderer that draws nothing and records every command.
///
/// Clones share one log, so a caller can keep a handle after boxing the view
/// into a session.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    log: Rc<RefCell<ViewLog>>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the log as it stands
    pub fn log(&self) -> ViewLog {
        self.log.borrow().clone()
    }
}

impl BoardView for HeadlessView {
    fn init(&mut self, config: &BoardConfig) {
        self.log.borrow_mut().config = Some(config.clone());
    }

    fn set_position(&mut self, fen: &str) {
        self.log.borrow_mut().position = Some(fen.to_string());
    }

    fn start(&mut self) {
        let mut log = self.log.borrow_mut();
        log.starts += 1;
        log.position = None;
    }

    fn resize(&mut self) {
        self.log.borrow_mut().resizes += 1;
    }

    fn show_captured(&mut self, captured: &CapturedPieces) {
        self.log.borrow_mut().captured = captured.clone();
    }

    fn show_status(&mut self, status: &str) {
        let mut log = self.log.borrow_mut();
        log.status = status.to_string();
        log.status_history.push(status.to_string());
    }
}
