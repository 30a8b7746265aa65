//! Move search over `chess_rules` positions.
//!
//! Three engines share one contract: minimax, alpha-beta (same answers as
//! minimax, fewer nodes) and Monte-Carlo tree search. Each scores leaves with
//! a configurable [`Evaluator`] and works on cloned positions only.

mod alphabeta;
pub mod config;
pub mod error;
pub mod eval;
mod mcts;
mod minimax;
pub mod solver;
pub mod time_control;
mod tree;

use chess_rules::{Move, Position};
use serde::{Deserialize, Serialize};

pub use alphabeta::AlphaBeta;
pub use config::{Algorithm, SearchConfig};
pub use error::SearchError;
pub use eval::{Evaluator, HeuristicKind, HeuristicSpec, Preset, WeightedTerm};
pub use mcts::Mcts;
pub use minimax::Minimax;
pub use solver::{Hint, Solver, build_engine};
pub use time_control::{SearchLimits, TimeControl};
pub use tree::MATE_SCORE;

// =============================================================================
// Engine trait
// =============================================================================

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_move: Move,
    /// From the side to move's point of view. Depth searches report
    /// centipawns (mates beyond [`MATE_SCORE`]); MCTS reports the mean
    /// rollout value scaled to -1000..=1000.
    pub score: i32,
    /// Deepest completed iteration (deepest tree node for MCTS).
    pub depth_reached: u8,
    pub nodes: u64,
    /// The time budget ran out before the requested depth or iteration count.
    pub stopped: bool,
}

impl SearchResult {
    /// The `(move, score)` pair callers feed back into the game.
    pub fn ai_move(&self) -> (Move, i32) {
        (self.best_move, self.score)
    }

    pub fn is_mate_score(&self) -> bool {
        self.score.abs() >= MATE_SCORE
    }
}

/// Common interface of every search algorithm.
pub trait Engine: Send {
    /// Pick a move for the side to move in `pos`.
    ///
    /// Fails with [`SearchError::NoLegalMoves`] when `pos` is checkmate or
    /// stalemate.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, SearchError>;

    fn name(&self) -> &str;

    /// Drop anything carried between searches.
    fn new_game(&mut self) {}
}

/// One-shot search with a fresh engine built from `config`.
pub fn best_move(pos: &Position, config: &SearchConfig) -> Result<SearchResult, SearchError> {
    build_engine(config).search(pos, config.limits())
}
