//! Random Move Policy
//!
//! Selects the automated reply uniformly at random from all legal moves.
//! There is no evaluation and no search; any real engine should easily beat
//! it. Plugs into a session through [`MovePolicy`].

use chess_session::{MoveRecord, MovePolicy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;


/// A policy that plays random legal moves.
///
/// Seed it with [`RandomPolicy::seeded`] to replay a session exactly.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
    seed: Option<u64>,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }
}

impl MovePolicy for RandomPolicy {
    fn select_move(&mut self, legal_moves: &[MoveRecord]) -> Option<MoveRecord> {
        legal_moves.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        // A seeded policy replays the same game after every reset.
        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
    }
}
