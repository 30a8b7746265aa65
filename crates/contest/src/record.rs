//! Serializable account of a finished run.

use std::path::Path;

use chess_rules::{Color, GameStatus};
use serde::{Deserialize, Serialize};

use crate::error::ContestError;

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Termination {
    /// The game reached a terminal status.
    GameOver,
    PlyLimit,
    /// A side without an engine is to move.
    AwaitingMove { side: Color },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub ply: usize,
    pub side: Color,
    /// Coordinate form, e.g. `e7e8q`.
    pub uci: String,
    /// Long algebraic form, e.g. `e7-e8=Q`.
    pub notation: String,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRecord {
    pub side: Color,
    pub uci: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub white: Option<String>,
    pub black: Option<String>,
    pub start_fen: String,
    pub final_fen: String,
    pub status: GameStatus,
    /// "1-0", "0-1", "1/2-1/2" or "*".
    pub result: String,
    pub termination: Termination,
    pub move_list: String,
    pub moves: Vec<MoveRecord>,
    pub hint: Option<HintRecord>,
}

impl ContestRecord {
    pub fn save(&self, path: &Path) -> Result<(), ContestError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ContestError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ContestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Short text summary for the terminal.
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "White: {}\nBlack: {}\n",
            self.white.as_deref().unwrap_or("human"),
            self.black.as_deref().unwrap_or("human"),
        ));
        report.push_str(&format!("Moves: {}\n", self.move_list));
        report.push_str(&format!("Result: {} ({})\n", self.result, self.status));
        match self.termination {
            Termination::GameOver => {}
            Termination::PlyLimit => report.push_str("Stopped at the ply limit\n"),
            Termination::AwaitingMove { side } => {
                report.push_str(&format!("Waiting for {side} to move\n"));
            }
        }
        if let Some(hint) = &self.hint {
            report.push_str(&format!("Hint for {}: {} ({})\n", hint.side, hint.uci, hint.score));
        }
        report.push_str(&format!("Final position: {}\n", self.final_fen));
        report
    }
}
