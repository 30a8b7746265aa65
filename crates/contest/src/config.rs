//! Contest description, read from TOML.

use std::path::{Path, PathBuf};

use search_engine::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::ContestError;

/// Where the finished game is written. Every path is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub fen: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub result: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestConfig {
    /// Engine for white. A missing `[white]` table leaves white to a human
    /// and the run stops when it is white's turn.
    pub white: Option<SearchConfig>,
    pub black: Option<SearchConfig>,
    /// Engine used to suggest a move to a human side when the run stops.
    pub hint: Option<SearchConfig>,
    pub start_fen: Option<String>,
    /// Board snapshot file, used when no FEN is given.
    pub start_snapshot: Option<PathBuf>,
    pub max_plies: u32,
    pub output: OutputPaths,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            white: None,
            black: None,
            hint: None,
            start_fen: None,
            start_snapshot: None,
            max_plies: 200,
            output: OutputPaths::default(),
        }
    }
}

impl ContestConfig {
    /// Both sides played by the same engine configuration.
    pub fn self_play(engine: SearchConfig) -> Self {
        Self {
            white: Some(engine.clone()),
            black: Some(engine),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContestError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ContestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
