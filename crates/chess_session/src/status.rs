//! Status line derivation and its locale strings

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::RulesEngine;
use crate::types::Side;

/// What the status line reports, independent of wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum GameStatus {
    /// The given side is to move and has been mated
    Checkmate { side: Side },
    Draw,
    ToMove { side: Side, in_check: bool },
}

impl GameStatus {
    /// Derive the status from rules-engine queries alone.
    pub fn of(rules: &dyn RulesEngine) -> Self {
        let side = rules.side_to_move();
        if rules.is_checkmate() {
            GameStatus::Checkmate { side }
        } else if rules.is_draw() {
            GameStatus::Draw
        } else {
            GameStatus::ToMove {
                side,
                in_check: rules.in_check(),
            }
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::ToMove { .. })
    }
}

/// Presentation strings for the status line.
///
/// Templates substitute `{side}` with the localized side name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLocale {
    pub white: String,
    pub black: String,
    pub to_move: String,
    /// Appended to `to_move` while the side to move is in check
    pub check: String,
    pub checkmate: String,
    pub draw: String,
}

impl Default for StatusLocale {
    fn default() -> Self {
        Self::english()
    }
}

impl StatusLocale {
    pub fn english() -> Self {
        Self {
            white: "White".to_string(),
            black: "Black".to_string(),
            to_move: "{side} to move".to_string(),
            check: ", {side} is in check".to_string(),
            checkmate: "Game over, {side} is checkmated".to_string(),
            draw: "Game over, drawn game".to_string(),
        }
    }

    pub fn arabic() -> Self {
        Self {
            white: "الأبيض".to_string(),
            black: "الأسود".to_string(),
            to_move: "{side} يلعب".to_string(),
            check: "، {side} في وضع الكش".to_string(),
            checkmate: "انتهت اللعبة، {side} في وضع الكش مات!".to_string(),
            draw: "انتهت اللعبة، تعادل!".to_string(),
        }
    }

    /// Look up a built-in locale by name ("en", "ar")
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::english()),
            "ar" | "arabic" => Ok(Self::arabic()),
            _ => Err(ConfigError::UnknownLocale(name.to_string())),
        }
    }

    pub fn side_name(&self, side: Side) -> &str {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn render(&self, status: GameStatus) -> String {
        match status {
            GameStatus::Checkmate { side } => self.fill(&self.checkmate, side),
            GameStatus::Draw => self.draw.clone(),
            GameStatus::ToMove { side, in_check } => {
                let mut text = self.fill(&self.to_move, side);
                if in_check {
                    text.push_str(&self.fill(&self.check, side));
                }
                text
            }
        }
    }

    fn fill(&self, template: &str, side: Side) -> String {
        template.replace("{side}", self.side_name(side))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
