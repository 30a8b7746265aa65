//! Ties a [`SearchConfig`] to a concrete engine and to the game controller.

use chess_rules::{ChessError, Game, GameStatus, Position};
use tracing::debug;

use crate::config::{Algorithm, SearchConfig};
use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::{AlphaBeta, Engine, Mcts, Minimax, SearchResult};

/// Build the engine a configuration asks for.
pub fn build_engine(config: &SearchConfig) -> Box<dyn Engine> {
    let evaluator = Evaluator::from_spec(&config.heuristic);
    match config.algorithm {
        Algorithm::Minimax => Box::new(Minimax::new(evaluator).parallel(config.parallel)),
        Algorithm::AlphaBeta => Box::new(AlphaBeta::new(evaluator).parallel(config.parallel)),
        Algorithm::Mcts => {
            let engine = Mcts::new(
                evaluator,
                config.mcts_iterations,
                config.exploration,
                config.rollout_depth,
            );
            match config.seed {
                Some(seed) => Box::new(engine.with_seed(seed)),
                None => Box::new(engine),
            }
        }
    }
}

/// A suggested move and what the game would look like after it.
#[derive(Debug, Clone)]
pub struct Hint {
    pub result: SearchResult,
    pub status_after: GameStatus,
}

pub struct Solver {
    config: SearchConfig,
    engine: Box<dyn Engine>,
}

impl Solver {
    pub fn new(config: SearchConfig) -> Self {
        let engine = build_engine(&config);
        Self { config, engine }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Search `pos` for its side to move. Errors on a position with no
    /// legal moves.
    pub fn best_move(&mut self, pos: &Position) -> Result<SearchResult, SearchError> {
        self.engine.search(pos, self.config.limits())
    }

    /// Search the live position and submit the answer to `game`, which
    /// validates it like any other move and notifies its observers.
    pub fn play_ai_move(&mut self, game: &mut Game) -> Result<(SearchResult, GameStatus), SearchError> {
        if game.is_over() {
            return Err(ChessError::GameOver {
                status: game.status(),
            }
            .into());
        }
        let result = self.best_move(game.position())?;
        let status = game.play_move(result.best_move)?;
        debug!(mv = %result.best_move, score = result.score, %status, "ai move played");
        Ok((result, status))
    }

    /// Suggest a move without touching `game` or waking its observers.
    pub fn hint(&mut self, game: &Game) -> Result<Hint, SearchError> {
        if game.is_over() {
            return Err(ChessError::GameOver {
                status: game.status(),
            }
            .into());
        }
        let mut scratch = game.exploration_copy();
        let result = self.best_move(scratch.position())?;
        let status_after = scratch.play_move(result.best_move)?;
        Ok(Hint {
            result,
            status_after,
        })
    }

    pub fn new_game(&mut self) {
        self.engine.new_game();
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("config", &self.config)
            .field("engine", &self.engine.name())
            .finish()
    }
}
