//! Session configuration, loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::rules::CozyRules;
use crate::status::StatusLocale;
use crate::types::Side;
use crate::view::BoardConfig;

/// Everything about a session that is not game state.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause before the automated reply is played
    pub reply_delay_ms: u64,
    /// Side the human plays; the other side is automated
    pub human_side: Side,
    /// Custom starting position (None = standard start)
    pub start_fen: Option<String>,
    /// Built-in locale to use instead of `[locale]` ("en", "ar")
    pub locale_preset: Option<String>,
    pub board: BoardConfig,
    pub locale: StatusLocale,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 250,
            human_side: Side::White,
            start_fen: None,
            locale_preset: None,
            board: BoardConfig::default(),
            locale: StatusLocale::default(),
        }
    }
}

impl SessionConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Status strings after applying `locale_preset`
    pub fn status_locale(&self) -> Result<StatusLocale, ConfigError> {
        match &self.locale_preset {
            Some(name) => StatusLocale::preset(name),
            None => Ok(self.locale.clone()),
        }
    }

    /// Board config with `position` matching the configured start
    pub fn board_config(&self) -> BoardConfig {
        let mut board = self.board.clone();
        if let Some(fen) = &self.start_fen {
            board.position = fen.clone();
        }
        board
    }

    /// Rules engine starting from the configured position
    pub fn rules(&self) -> Result<CozyRules, ConfigError> {
        match &self.start_fen {
            Some(fen) => Ok(CozyRules::from_fen(fen)?),
            None => Ok(CozyRules::new()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
