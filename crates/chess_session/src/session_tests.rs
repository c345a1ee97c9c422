use super::*;
use crate::rules::{CozyRules, START_FEN};
use crate::schedule::QueuedReplies;
use crate::view::{HeadlessView, ViewLog};
use std::collections::VecDeque;

/// Plays scripted replies in order, then falls back to the first legal move.
struct ScriptedPolicy {
    script: VecDeque<&'static str>,
}

impl ScriptedPolicy {
    fn new(script: &[&'static str]) -> Self {
        Self {
            script: script.iter().copied().collect(),
        }
    }
}

impl MovePolicy for ScriptedPolicy {
    fn select_move(&mut self, legal_moves: &[MoveRecord]) -> Option<MoveRecord> {
        if let Some(next) = self.script.pop_front() {
            if let Some(mv) = legal_moves.iter().find(|m| m.to_string() == next) {
                return Some(*mv);
            }
        }
        legal_moves.first().copied()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct Harness {
    session: Session,
    view: HeadlessView,
    replies: QueuedReplies,
}

impl Harness {
    fn new(script: &[&'static str]) -> Self {
        Self::with_config(&SessionConfig::default(), script)
    }

    fn with_config(config: &SessionConfig, script: &[&'static str]) -> Self {
        let view = HeadlessView::new();
        let replies = QueuedReplies::new();
        let session = Session::new(
            config,
            Collaborators {
                rules: Box::new(config.rules().unwrap()),
                view: Box::new(view.clone()),
                policy: Box::new(ScriptedPolicy::new(script)),
                scheduler: Box::new(replies.clone()),
            },
        )
        .unwrap();
        Self {
            session,
            view,
            replies,
        }
    }

    fn drop_piece(&mut self, from: &str, to: &str) -> DropOutcome {
        self.session.on_drop(sq(from), sq(to))
    }

    /// Fire the oldest queued reply
    fn fire(&mut self) -> Option<MoveRecord> {
        let ticket = self.replies.pop().expect("a reply should be scheduled");
        self.session.fire_reply(ticket)
    }

    fn log(&self) -> ViewLog {
        self.view.log()
    }
}

fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

// =============================================================================
// Startup and reset
// =============================================================================

#[test]
fn test_new_session_publishes_start() {
    let h = Harness::new(&[]);
    let log = h.log();

    assert_eq!(h.session.fen(), START_FEN);
    assert!(h.session.captured().is_empty());
    assert!(!h.session.is_busy());
    assert_eq!(log.status, "White to move");
    assert_eq!(log.config.unwrap().position, "start");
    assert!(h.replies.is_empty(), "white opens, nothing to schedule");
}

#[test]
fn test_reset_restores_initial_state() {
    let mut h = Harness::new(&["d7d5"]);
    assert_eq!(h.drop_piece("e2", "e4"), DropOutcome::Accept);
    h.fire();
    h.drop_piece("e4", "d5");
    assert_eq!(h.session.captured().total(), 1);
    let generation = h.session.generation();

    h.session.reset();

    let log = h.log();
    assert_eq!(h.session.fen(), START_FEN);
    assert!(h.session.history().is_empty());
    assert!(h.session.captured().is_empty());
    assert!(log.captured.is_empty());
    assert!(!h.session.is_busy());
    assert_eq!(log.starts, 1);
    assert_eq!(log.status, "White to move");
    assert!(h.session.generation() > generation);
    assert!(h.session.pending_reply().is_none());
}

#[test]
fn test_reset_with_custom_start_sets_position() {
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    let config = SessionConfig {
        start_fen: Some(fen.to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &[]);
    h.drop_piece("e2", "e4");
    h.fire();

    h.session.reset();

    let log = h.log();
    assert_eq!(log.starts, 0);
    assert_eq!(log.position.as_deref(), Some(fen));
    assert_eq!(log.config.unwrap().position, fen);
}

// =============================================================================
// User moves
// =============================================================================

#[test]
fn test_opening_move_schedules_one_reply() {
    let mut h = Harness::new(&["e7e5"]);

    assert_eq!(h.drop_piece("e2", "e4"), DropOutcome::Accept);
    assert!(h.session.captured().is_empty());
    assert_eq!(h.replies.len(), 1);
    assert_eq!(h.log().status, "Black to move");

    let ticket = h.session.pending_reply().unwrap();
    assert_eq!(ticket.delay, Duration::from_millis(250));

    let reply = h.fire().unwrap();
    assert_eq!(reply.to_string(), "e7e5");
    assert_eq!(h.session.history().len(), 2);
    assert_eq!(h.log().status, "White to move");
    assert!(!h.session.is_busy());
    assert!(h.replies.is_empty());
    assert!(h.session.pending_reply().is_none());
}

#[test]
fn test_capture_keyed_by_captured_colour() {
    let mut h = Harness::new(&["d7d5", "d8d5"]);
    h.drop_piece("e2", "e4");
    h.fire();

    assert_eq!(h.drop_piece("e4", "d5"), DropOutcome::Accept);
    assert_eq!(h.session.captured().of(Side::Black), &[PieceKind::Pawn]);
    assert!(h.session.captured().of(Side::White).is_empty());

    let reply = h.fire().unwrap();
    assert_eq!(reply.to_string(), "d8d5");
    assert_eq!(h.session.captured().of(Side::White), &[PieceKind::Pawn]);
    assert_eq!(h.log().captured, *h.session.captured());
}

#[test]
fn test_en_passant_capture_reaches_tray() {
    let config = SessionConfig {
        start_fen: Some("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2".to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &[]);

    assert_eq!(h.drop_piece("e5", "d6"), DropOutcome::Accept);
    assert_eq!(h.session.captured().of(Side::Black), &[PieceKind::Pawn]);
}

#[test]
fn test_user_promotion_is_queen() {
    let config = SessionConfig {
        start_fen: Some("4k3/P7/8/8/8/8/8/4K3 w - - 0 1".to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &[]);

    assert_eq!(h.drop_piece("a7", "a8"), DropOutcome::Accept);
    assert_eq!(
        h.session.piece_at(sq("a8")),
        Some(Piece::new(Side::White, PieceKind::Queen))
    );
    assert_eq!(h.log().status, "Black to move, Black is in check");
}

#[test]
fn test_illegal_move_snaps_back_without_mutation() {
    let mut h = Harness::new(&[]);
    let before = h.session.snapshot();

    assert_eq!(h.drop_piece("e2", "e5"), DropOutcome::Snapback);
    assert_eq!(h.drop_piece("g1", "g3"), DropOutcome::Snapback);
    assert_eq!(h.drop_piece("e7", "e5"), DropOutcome::Snapback);

    assert_eq!(h.session.snapshot(), before);
    assert!(h.replies.is_empty());
}

#[test]
fn test_user_cannot_move_during_reply_delay() {
    let mut h = Harness::new(&[]);
    h.drop_piece("e2", "e4");

    // Black to move, reply pending: black pieces belong to the automated side
    assert_eq!(h.drop_piece("e7", "e5"), DropOutcome::Snapback);
    assert!(!h.session.on_drag_start(sq("e7"), "bP"));
    assert_eq!(h.session.history().len(), 1);
}

// =============================================================================
// Busy flag
// =============================================================================

#[test]
fn test_busy_rejects_moves_and_undo() {
    let mut h = Harness::new(&["e7e5", "b8c6"]);
    h.drop_piece("e2", "e4");
    h.fire();
    h.drop_piece("g1", "f3");
    h.replies.pop();

    let pending = h.session.begin_automated_move().unwrap();
    assert!(h.session.is_busy());
    let before = h.session.snapshot();

    assert_eq!(h.drop_piece("d2", "d4"), DropOutcome::Snapback);
    assert!(!h.session.undo_last_exchange());
    assert!(!h.session.on_drag_start(sq("d2"), "wP"));
    assert!(h.session.begin_automated_move().is_none());
    assert_eq!(h.session.snapshot(), before);

    let applied = h.session.complete_automated_move(pending).unwrap();
    assert_eq!(applied.to_string(), "b8c6");
    assert!(!h.session.is_busy());
}

#[test]
fn test_no_legal_moves_clears_busy() {
    let config = SessionConfig {
        start_fen: Some("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1".to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &[]);

    assert!(h.replies.is_empty(), "stalemate, nothing scheduled");
    assert!(h.session.make_automated_move().is_none());
    assert!(!h.session.is_busy());
}

// =============================================================================
// Stale replies
// =============================================================================

#[test]
fn test_reply_dropped_after_reset() {
    let mut h = Harness::new(&[]);
    h.drop_piece("e2", "e4");
    let ticket = h.replies.pop().unwrap();

    h.session.reset();

    assert!(h.session.fire_reply(ticket).is_none());
    assert_eq!(h.session.fen(), START_FEN);
    assert!(h.session.history().is_empty());
}

#[test]
fn test_chosen_move_discarded_after_reset() {
    let mut h = Harness::new(&[]);
    h.drop_piece("e2", "e4");
    h.replies.pop();

    let pending = h.session.begin_automated_move().unwrap();
    h.session.reset();

    assert!(h.session.complete_automated_move(pending).is_none());
    assert!(!h.session.is_busy());
    assert_eq!(h.session.fen(), START_FEN);
}

#[test]
fn test_undo_during_delay_reschedules() {
    let mut h = Harness::new(&["e7e5", "b8c6", "g8f6"]);
    h.drop_piece("e2", "e4");
    h.fire();
    h.drop_piece("d2", "d4");
    let stale = h.replies.pop().unwrap();

    // Takes back d2d4 and e7e5, leaving black to move
    assert!(h.session.undo_last_exchange());
    assert_eq!(h.session.history().len(), 1);
    assert_eq!(h.replies.len(), 1);

    assert!(h.session.fire_reply(stale).is_none());
    assert_eq!(h.session.history().len(), 1);

    assert!(h.fire().is_some());
    assert_eq!(h.session.history().len(), 2);
    assert_eq!(h.log().status, "White to move");
}

#[test]
fn test_ticket_cannot_fire_twice() {
    let mut h = Harness::new(&[]);
    h.drop_piece("e2", "e4");
    let ticket = h.replies.pop().unwrap();

    assert!(h.session.fire_reply(ticket).is_some());
    assert!(h.session.fire_reply(ticket).is_none());
    assert_eq!(h.session.history().len(), 2);
}

// =============================================================================
// Undo
// =============================================================================

#[test]
fn test_undo_restores_position_and_trays() {
    let mut h = Harness::new(&["d7d5", "d8d5"]);
    h.drop_piece("e2", "e4");
    h.fire();
    let before = h.session.snapshot();

    h.drop_piece("e4", "d5");
    h.fire();
    assert_eq!(h.session.captured().total(), 2);

    assert!(h.session.undo_last_exchange());

    assert_eq!(h.session.fen(), before.fen);
    assert_eq!(*h.session.captured(), before.captured);
    assert_eq!(h.log().captured, before.captured);
    assert_eq!(h.log().position.as_deref(), Some(before.fen.as_str()));
    assert_eq!(h.log().status, "White to move");
    assert!(h.replies.is_empty());
}

#[test]
fn test_undo_needs_two_half_moves() {
    let mut h = Harness::new(&[]);
    assert!(!h.session.undo_last_exchange());

    h.drop_piece("e2", "e4");
    assert!(!h.session.undo_last_exchange());
    assert_eq!(h.session.history().len(), 1);
}

// =============================================================================
// Game end and renderer hooks
// =============================================================================

#[test]
fn test_checkmate_stops_replies() {
    let mut h = Harness::new(&["e7e5", "b8c6", "g8f6"]);
    for (from, to) in [("e2", "e4"), ("f1", "c4"), ("d1", "h5")] {
        assert_eq!(h.drop_piece(from, to), DropOutcome::Accept);
        h.fire();
    }

    assert_eq!(h.drop_piece("h5", "f7"), DropOutcome::Accept);

    assert_eq!(h.session.status(), GameStatus::Checkmate { side: Side::Black });
    assert_eq!(h.log().status, "Game over, Black is checkmated");
    assert!(h.replies.is_empty());
    assert!(h.session.pending_reply().is_none());
    assert!(!h.session.on_drag_start(sq("e1"), "wK"));
    assert_eq!(h.session.captured().of(Side::Black), &[PieceKind::Pawn]);
}

#[test]
fn test_drag_start_rules() {
    let h = Harness::new(&[]);

    assert!(h.session.on_drag_start(sq("e2"), "wP"));
    assert!(h.session.on_drag_start(sq("g1"), "wN"));
    assert!(!h.session.on_drag_start(sq("e7"), "bP"));
    assert!(!h.session.on_drag_start(sq("e2"), "wQ"), "label must match the square");
    assert!(!h.session.on_drag_start(sq("e4"), "wP"));
    assert!(!h.session.on_drag_start(sq("e2"), "pawn"));
}

#[test]
fn test_human_black_gets_opening_reply() {
    let config = SessionConfig {
        human_side: Side::Black,
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &["e2e4"]);

    assert_eq!(h.replies.len(), 1);
    assert!(!h.session.on_drag_start(sq("e2"), "wP"));
    h.fire();

    assert!(h.session.on_drag_start(sq("e7"), "bP"));
    assert_eq!(h.drop_piece("e7", "e5"), DropOutcome::Accept);
    assert_eq!(h.replies.len(), 1);

    h.session.reset();
    assert_eq!(h.replies.len(), 2, "reset schedules a fresh opening reply");
}

#[test]
fn test_snap_end_and_resize_reach_view() {
    let mut h = Harness::new(&[]);
    h.session.on_snap_end();
    h.session.resize();

    let log = h.log();
    assert_eq!(log.position.as_deref(), Some(START_FEN));
    assert_eq!(log.resizes, 1);
}

#[test]
fn test_snapshot_tracks_reply_and_history() {
    let mut h = Harness::new(&["d7d5"]);
    h.drop_piece("e2", "e4");

    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.history, vec!["e2e4"]);
    assert_eq!(snapshot.status_text, "Black to move");
    assert!(snapshot.reply_pending);
    assert!(!snapshot.busy);

    h.fire();
    h.drop_piece("e4", "d5");
    let snapshot = h.session.snapshot();
    assert_eq!(snapshot.history, vec!["e2e4", "d7d5", "e4d5"]);
    assert_eq!(snapshot.captured.of(Side::Black), &[PieceKind::Pawn]);
    assert_eq!(snapshot.fen, h.session.fen());
    assert_eq!(
        snapshot.status,
        GameStatus::ToMove {
            side: Side::Black,
            in_check: false
        }
    );
}

#[test]
fn test_king_dropped_on_own_rook_snaps_back() {
    let config = SessionConfig {
        start_fen: Some("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".to_string()),
        ..Default::default()
    };
    let mut h = Harness::with_config(&config, &[]);
    let before = h.session.fen();

    assert_eq!(h.drop_piece("e1", "h1"), DropOutcome::Snapback);
    assert_eq!(h.session.fen(), before);
    assert!(h.session.history().is_empty());
    assert!(h.replies.is_empty());

    assert_eq!(h.drop_piece("e1", "g1"), DropOutcome::Accept);
    assert_eq!(h.session.history()[0].to_string(), "e1g1");
}
