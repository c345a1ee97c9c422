//! Chess game session controller
//!
//! Glue between a rules engine and a board renderer for a human-versus-computer
//! game:
//! - drag-and-drop move handling with snapback on illegal moves
//! - captured-piece trays kept in lockstep with moves and undo
//! - status text derived from the rules engine
//! - new game / undo controls and a deferred automated reply
//!
//! The controller talks to its collaborators only through the traits in
//! [`rules`], [`view`], [`policy`] and [`schedule`], so any of them can be
//! swapped for a fake in tests or a different front end in production.

pub mod captured;
pub mod config;
pub mod error;
pub mod policy;
pub mod rules;
pub mod schedule;
pub mod session;
pub mod status;
pub mod types;
pub mod view;

pub use captured::CapturedPieces;
pub use config::SessionConfig;
pub use error::{ConfigError, ParseError, RulesError};
pub use policy::MovePolicy;
pub use rules::{CozyRules, MoveRecord, MoveRequest, RulesEngine, START_FEN};
pub use schedule::{QueuedReplies, ReplyScheduler, ReplyTicket};
pub use session::{Collaborators, PendingMove, Session, SessionSnapshot};
pub use status::{GameStatus, StatusLocale};
pub use types::*;
pub use view::{BoardConfig, BoardView, DropOutcome, HeadlessView, ViewLog};
