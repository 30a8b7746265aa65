//! Error type shared by every fallible operation in the rules crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game::GameStatus;
use crate::types::Move;

/// Everything that can go wrong while building, querying or driving a game.
///
/// Every variant is recoverable: a rejected operation never leaves a board or
/// game half-mutated.
#[derive(Debug, Error)]
pub enum ChessError {
    #[error("square index {index} is outside the board (expected 0-63)")]
    OutOfBounds { index: i32 },

    #[error("'{text}' is not a square coordinate")]
    InvalidSquare { text: String },

    #[error("illegal move {mv}")]
    IllegalMove { mv: Move },

    #[error("'{text}' does not name a legal move in this position")]
    UnknownMove { text: String },

    #[error("the game is already over ({status})")]
    GameOver { status: GameStatus },

    #[error("malformed FEN: {reason}")]
    MalformedFen { reason: String },

    #[error("malformed board snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },

    #[error("failed to load {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("there is no move to undo")]
    NothingToUndo,

    #[error("there is no move to redo")]
    NothingToRedo,
}

/// Convenience alias used throughout the crate.
pub type ChessResult<T> = Result<T, ChessError>;
