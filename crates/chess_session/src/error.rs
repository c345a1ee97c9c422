//! Error types for the session crate

use std::path::PathBuf;

/// Failure to parse one of the board vocabulary types from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid square {0:?}, expected a1..h8")]
    Square(String),

    #[error("invalid piece label {0:?}, expected a side and a piece letter like \"wP\"")]
    Piece(String),

    #[error("invalid side {0:?}, expected white or black")]
    Side(String),
}

/// Errors raised while setting up a rules engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Errors raised while loading or resolving session configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown locale preset {0:?}")]
    UnknownLocale(String),

    #[error(transparent)]
    Rules(#[from] RulesError),
}
