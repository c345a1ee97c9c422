//! Game session controller
//!
//! Owns the captured-piece trays, the busy flag and the reply generation, and
//! is the only place that drives the rules engine and the board view. Every
//! handler runs to completion; the only deferred work is the automated reply,
//! which goes through a [`ReplyScheduler`] and comes back via
//! [`Session::fire_reply`].

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::captured::CapturedPieces;
use crate::config::SessionConfig;
use crate::error::ConfigError;
use crate::policy::MovePolicy;
use crate::rules::{MoveRecord, MoveRequest, RulesEngine};
use crate::schedule::{ReplyScheduler, ReplyTicket};
use crate::status::{GameStatus, StatusLocale};
use crate::types::{Piece, PieceKind, Side, Square};
use crate::view::{BoardView, DropOutcome};

/// The collaborators a session drives
pub struct Collaborators {
    pub rules: Box<dyn RulesEngine>,
    pub view: Box<dyn BoardView>,
    pub policy: Box<dyn MovePolicy>,
    pub scheduler: Box<dyn ReplyScheduler>,
}

/// An automated move that has been chosen but not yet applied.
///
/// The session stays busy until it is passed to
/// [`Session::complete_automated_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    generation: u64,
    chosen: MoveRecord,
}

impl PendingMove {
    pub fn chosen(&self) -> MoveRecord {
        self.chosen
    }
}

/// Serializable view of the session for hosts and debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub fen: String,
    pub status: GameStatus,
    pub status_text: String,
    pub captured: CapturedPieces,
    pub history: Vec<String>,
    pub busy: bool,
    pub generation: u64,
    pub reply_pending: bool,
}

/// A human-versus-computer game session
pub struct Session {
    rules: Box<dyn RulesEngine>,
    view: Box<dyn BoardView>,
    policy: Box<dyn MovePolicy>,
    scheduler: Box<dyn ReplyScheduler>,
    locale: StatusLocale,
    human_side: Side,
    reply_delay: Duration,
    /// Whether the rules engine starts from something other than the standard layout
    custom_start: bool,
    captured: CapturedPieces,
    /// True while an automated move is between selection and application
    busy: bool,
    /// Bumped on every reset and undo; stale reply tickets carry an older value
    generation: u64,
    next_serial: u64,
    pending_reply: Option<ReplyTicket>,
}

impl Session {
    /// Build a session, initialize the view and publish the opening state.
    ///
    /// If the human plays Black the opening automated move is scheduled here.
    pub fn new(config: &SessionConfig, parts: Collaborators) -> Result<Self, ConfigError> {
        let locale = config.status_locale()?;
        let Collaborators {
            rules,
            view,
            policy,
            scheduler,
        } = parts;

        let mut session = Self {
            rules,
            view,
            policy,
            scheduler,
            locale,
            human_side: config.human_side,
            reply_delay: config.reply_delay(),
            custom_start: config.start_fen.is_some(),
            captured: CapturedPieces::new(),
            busy: false,
            generation: 0,
            next_serial: 0,
            pending_reply: None,
        };

        session.view.init(&config.board_config());
        session.view.show_captured(&session.captured);
        session.publish_status();
        info!(
            human = %session.human_side,
            policy = session.policy.name(),
            "session started"
        );
        session.maybe_schedule_reply();
        Ok(session)
    }

    // =========================================================================
    // Renderer hooks
    // =========================================================================

    /// Whether the renderer may let the user pick up `piece_label` from `square`
    pub fn on_drag_start(&self, square: Square, piece_label: &str) -> bool {
        if self.busy || self.rules.is_game_over() {
            return false;
        }

        let piece: Piece = match piece_label.parse() {
            Ok(piece) => piece,
            Err(err) => {
                debug!(%err, "refusing drag of unknown piece");
                return false;
            }
        };

        let to_move = self.rules.side_to_move();
        piece.side == to_move
            && to_move == self.human_side
            && self.rules.piece_at(square) == Some(piece)
    }

    pub fn on_drop(&mut self, from: Square, to: Square) -> DropOutcome {
        self.attempt_user_move(from, to)
    }

    /// The drop animation finished; make sure the board shows the real position.
    pub fn on_snap_end(&mut self) {
        let fen = self.rules.fen();
        self.view.set_position(&fen);
    }

    // =========================================================================
    // Moves
    // =========================================================================

    /// Apply a human move, promoting to a queen where relevant.
    ///
    /// Anything the rules engine rejects snaps back without touching state.
    pub fn attempt_user_move(&mut self, from: Square, to: Square) -> DropOutcome {
        if self.busy {
            debug!(%from, %to, "automated move in flight, snapping back");
            return DropOutcome::Snapback;
        }
        if self.rules.is_game_over() || self.rules.side_to_move() != self.human_side {
            debug!(%from, %to, "not the human's turn, snapping back");
            return DropOutcome::Snapback;
        }

        // Read the target before moving; the engine clears it when the move lands.
        let candidate = self.rules.piece_at(to);
        let request = MoveRequest::new(from, to).with_promotion(PieceKind::Queen);
        let Some(record) = self.rules.submit(request) else {
            debug!(%from, %to, "illegal move, snapping back");
            return DropOutcome::Snapback;
        };

        debug!(mv = %record, "user move applied");
        self.record_capture(candidate, &record);
        self.publish_position();
        self.publish_status();
        self.maybe_schedule_reply();
        DropOutcome::Accept
    }

    /// Play the scheduled automated reply if `ticket` is still current.
    ///
    /// Returns the applied move, or `None` for stale tickets and when no move
    /// could be made.
    pub fn fire_reply(&mut self, ticket: ReplyTicket) -> Option<MoveRecord> {
        if self.pending_reply != Some(ticket) {
            warn!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "dropping stale automated reply"
            );
            return None;
        }
        self.pending_reply = None;
        self.make_automated_move()
    }

    /// Choose and apply one automated move right away.
    pub fn make_automated_move(&mut self) -> Option<MoveRecord> {
        let pending = self.begin_automated_move()?;
        self.complete_automated_move(pending)
    }

    /// Mark the session busy and choose the automated move.
    ///
    /// Returns `None` (and clears busy again) if there is nothing to play.
    pub fn begin_automated_move(&mut self) -> Option<PendingMove> {
        if self.busy {
            return None;
        }
        self.busy = true;
        // Moving now consumes any scheduled reply.
        self.pending_reply = None;

        let legal_moves = self.rules.legal_moves();
        match self.policy.select_move(&legal_moves) {
            Some(chosen) => {
                debug!(mv = %chosen, candidates = legal_moves.len(), "automated move chosen");
                Some(PendingMove {
                    generation: self.generation,
                    chosen,
                })
            }
            None => {
                self.busy = false;
                None
            }
        }
    }

    /// Apply a move chosen by [`Session::begin_automated_move`] and clear busy.
    ///
    /// A move chosen before a reset is discarded.
    pub fn complete_automated_move(&mut self, pending: PendingMove) -> Option<MoveRecord> {
        if pending.generation != self.generation {
            warn!(mv = %pending.chosen, "discarding automated move chosen before a reset");
            return None;
        }

        let candidate = self.rules.piece_at(pending.chosen.to);
        let applied = self.rules.submit(pending.chosen.request());
        match applied {
            Some(record) => {
                debug!(mv = %record, "automated move applied");
                self.record_capture(candidate, &record);
                self.publish_position();
            }
            None => warn!(mv = %pending.chosen, "policy chose a move the rules engine rejected"),
        }

        self.busy = false;
        self.publish_status();
        applied
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Take back the last human move and the automated reply to it.
    ///
    /// Returns false when busy or with fewer than two half-moves played.
    pub fn undo_last_exchange(&mut self) -> bool {
        if self.busy {
            debug!("automated move in flight, ignoring undo");
            return false;
        }

        let history = self.rules.history();
        if history.len() < 2 {
            return false;
        }
        let undone: Vec<MoveRecord> = history.iter().rev().take(2).copied().collect();

        for record in &undone {
            if let Some(piece) = record.captured_piece() {
                self.captured.pop(piece.side);
            }
            self.rules.undo();
        }

        self.invalidate_replies();
        debug!(generation = self.generation, "undid last exchange");
        self.publish_position();
        self.view.show_captured(&self.captured);
        self.publish_status();
        // Undo during the reply delay leaves the automated side to move.
        self.maybe_schedule_reply();
        true
    }

    /// Start a new game from the configured starting position.
    pub fn reset(&mut self) {
        self.rules.reset();
        self.policy.new_game();
        self.captured.clear();
        self.busy = false;
        self.invalidate_replies();

        if self.custom_start {
            let fen = self.rules.fen();
            self.view.set_position(&fen);
        } else {
            self.view.start();
        }
        self.view.show_captured(&self.captured);
        self.publish_status();
        info!(generation = self.generation, "new game");
        self.maybe_schedule_reply();
    }

    pub fn resize(&mut self) {
        self.view.resize();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn status(&self) -> GameStatus {
        GameStatus::of(&*self.rules)
    }

    pub fn status_text(&self) -> String {
        self.locale.render(self.status())
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_reply(&self) -> Option<ReplyTicket> {
        self.pending_reply
    }

    pub fn human_side(&self) -> Side {
        self.human_side
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    pub fn history(&self) -> &[MoveRecord] {
        self.rules.history()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.rules.piece_at(square)
    }

    /// Legal moves for the side to move, e.g. for move hints
    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        self.rules.legal_moves()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            fen: self.fen(),
            status: self.status(),
            status_text: self.status_text(),
            captured: self.captured.clone(),
            history: self.history().iter().map(|mv| mv.to_string()).collect(),
            busy: self.busy,
            generation: self.generation,
            reply_pending: self.pending_reply.is_some(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Push the removed piece onto the tray of its own colour.
    ///
    /// The target-square read cannot see an en passant pawn, so the move
    /// record fills that in.
    fn record_capture(&mut self, candidate: Option<Piece>, record: &MoveRecord) {
        let captured = candidate
            .filter(|piece| piece.side != record.side)
            .or_else(|| record.captured_piece());

        if let Some(piece) = captured {
            debug!(piece = %piece, "piece captured");
            self.captured.push(piece);
            self.view.show_captured(&self.captured);
        }
    }

    fn publish_position(&mut self) {
        let fen = self.rules.fen();
        self.view.set_position(&fen);
    }

    fn publish_status(&mut self) {
        let status = self.status();
        let text = self.locale.render(status);
        self.view.show_status(&text);
        if status.is_over() {
            info!(?status, "game over");
        }
    }

    fn invalidate_replies(&mut self) {
        self.generation += 1;
        self.pending_reply = None;
    }

    /// Schedule the automated reply if it is the automated side's turn.
    fn maybe_schedule_reply(&mut self) {
        if self.pending_reply.is_some()
            || self.rules.is_game_over()
            || self.rules.side_to_move() == self.human_side
        {
            return;
        }

        let ticket = ReplyTicket {
            generation: self.generation,
            serial: self.next_serial,
            delay: self.reply_delay,
        };
        self.next_serial += 1;
        self.pending_reply = Some(ticket);
        debug!(?ticket, "automated reply scheduled");
        self.scheduler.schedule(ticket);
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
