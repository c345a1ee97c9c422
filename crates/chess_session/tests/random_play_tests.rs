//! Whole-game properties of the session under random play
//!
//! Both sides play random legal moves: the "human" through drops, the
//! automated side through the random policy and the reply queue.

use chess_session::{
    Collaborators, CozyRules, DropOutcome, HeadlessView, MoveRecord, PieceKind, QueuedReplies,
    Session, SessionConfig, Side,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use random_policy::RandomPolicy;

const GAMES: u64 = 12;
const MAX_EXCHANGES: usize = 60;

fn new_session(seed: u64) -> (Session, QueuedReplies, HeadlessView) {
    let view = HeadlessView::new();
    let replies = QueuedReplies::new();
    let config = SessionConfig {
        reply_delay_ms: 0,
        ..Default::default()
    };
    let session = Session::new(
        &config,
        Collaborators {
            rules: Box::new(CozyRules::new()),
            view: Box::new(view.clone()),
            policy: Box::new(RandomPolicy::seeded(seed)),
            scheduler: Box::new(replies.clone()),
        },
    )
    .unwrap();
    (session, replies, view)
}

/// Random human move; drops always promote to a queen
fn pick_user_move(session: &Session, rng: &mut StdRng) -> Option<MoveRecord> {
    let moves: Vec<MoveRecord> = session
        .legal_moves()
        .into_iter()
        .filter(|m| m.promotion.is_none() || m.promotion == Some(PieceKind::Queen))
        .collect();
    moves.choose(rng).copied()
}

/// Drop a random legal move and fire the reply it schedules.
///
/// Returns false once the game is over.
fn play_exchange(session: &mut Session, replies: &QueuedReplies, rng: &mut StdRng) -> bool {
    if session.status().is_over() {
        return false;
    }
    let Some(mv) = pick_user_move(session, rng) else {
        return false;
    };
    assert_eq!(session.on_drop(mv.from, mv.to), DropOutcome::Accept);

    match replies.pop() {
        Some(ticket) => {
            assert!(session.fire_reply(ticket).is_some());
            true
        }
        None => {
            assert!(session.status().is_over(), "only a finished game skips the reply");
            false
        }
    }
}

/// Captured kinds per colour, rebuilt from history
fn captures_in_history(history: &[MoveRecord], side: Side) -> Vec<PieceKind> {
    history
        .iter()
        .filter_map(|mv| mv.captured_piece())
        .filter(|piece| piece.side == side)
        .map(|piece| piece.kind)
        .collect()
}

fn assert_trays_match_history(session: &Session) {
    let history = session.history();
    let capturing = history.iter().filter(|mv| mv.is_capture()).count();

    assert_eq!(session.captured().total(), capturing);
    for side in [Side::White, Side::Black] {
        assert_eq!(
            session.captured().of(side),
            captures_in_history(history, side).as_slice(),
            "{side} tray out of step with history"
        );
    }
}

#[test]
fn test_trays_track_history_through_random_games() {
    for seed in 0..GAMES {
        let (mut session, replies, view) = new_session(seed);
        let mut rng = StdRng::seed_from_u64(seed + 1000);

        for _ in 0..MAX_EXCHANGES {
            if !play_exchange(&mut session, &replies, &mut rng) {
                break;
            }
            assert_trays_match_history(&session);
            assert!(!session.is_busy());
            assert_eq!(view.log().captured, *session.captured());
            assert_eq!(view.log().position, Some(session.fen()));
        }
    }
}

#[test]
fn test_undo_inverts_every_exchange() {
    for seed in 0..GAMES {
        let (mut session, replies, _view) = new_session(seed);
        let mut rng = StdRng::seed_from_u64(seed + 2000);

        for _ in 0..MAX_EXCHANGES {
            let before = session.snapshot();
            if !play_exchange(&mut session, &replies, &mut rng) {
                break;
            }

            assert!(session.undo_last_exchange());
            assert_eq!(session.fen(), before.fen, "seed {seed}");
            assert_eq!(*session.captured(), before.captured, "seed {seed}");
            assert_eq!(session.history().len(), before.history.len());
            assert!(replies.is_empty());

            // Play on from the restored position
            if !play_exchange(&mut session, &replies, &mut rng) {
                break;
            }
            assert_trays_match_history(&session);
        }
    }
}

#[test]
fn test_rejected_drops_never_mutate() {
    let (mut session, replies, _view) = new_session(3);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..20 {
        if !play_exchange(&mut session, &replies, &mut rng) || session.status().is_over() {
            break;
        }

        let before = session.snapshot();
        let legal = session.legal_moves();
        let from = legal[0].from;
        for to in (0..64).filter_map(chess_session::Square::new) {
            if legal.iter().any(|m| m.from == from && m.to == to) {
                continue;
            }
            assert_eq!(session.on_drop(from, to), DropOutcome::Snapback);
        }
        assert_eq!(session.snapshot(), before);
        assert!(replies.is_empty());
    }
}
