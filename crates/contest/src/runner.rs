//! Plays one game between the configured engines.

use std::fs;
use std::path::Path;

use chess_rules::{Color, Game};
use search_engine::{SearchConfig, Solver};
use tracing::{debug, info};

use crate::config::ContestConfig;
use crate::error::ContestError;
use crate::observer::TracingObserver;
use crate::record::{ContestRecord, HintRecord, MoveRecord, Termination};

fn describe(config: &SearchConfig) -> String {
    format!("{:?} depth {}", config.algorithm, config.depth)
}

pub struct Contest {
    config: ContestConfig,
    game: Game,
    white: Option<Solver>,
    black: Option<Solver>,
}

impl Contest {
    /// Set up the starting game: the FEN if given, else the snapshot file,
    /// else the standard position.
    pub fn new(config: ContestConfig) -> Result<Self, ContestError> {
        let mut game = match (&config.start_fen, &config.start_snapshot) {
            (Some(fen), _) => Game::from_fen(fen)?,
            (None, Some(path)) => Game::load(path)?,
            (None, None) => Game::new(),
        };
        game.subscribe(Box::new(TracingObserver));
        let white = config.white.clone().map(Solver::new);
        let black = config.black.clone().map(Solver::new);
        Ok(Self {
            config,
            game,
            white,
            black,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Play until the game ends, the ply limit is hit, or a side without
    /// an engine is to move.
    pub fn run(&mut self) -> Result<ContestRecord, ContestError> {
        let start_fen = self.game.to_fen();
        let mut moves = Vec::new();

        let termination = loop {
            if self.game.is_over() {
                break Termination::GameOver;
            }
            if moves.len() as u32 >= self.config.max_plies {
                break Termination::PlyLimit;
            }
            let side = self.game.side_to_move();
            let ply = self.game.ply_count() + 1;
            let solver = match side {
                Color::White => self.white.as_mut(),
                Color::Black => self.black.as_mut(),
            };
            let Some(solver) = solver else {
                break Termination::AwaitingMove { side };
            };
            let (result, status) = solver.play_ai_move(&mut self.game)?;
            debug!(ply, %side, %status, nodes = result.nodes, "ply complete");
            moves.push(MoveRecord {
                ply,
                side,
                uci: result.best_move.to_string(),
                notation: result.best_move.long_algebraic(),
                score: result.score,
                depth: result.depth_reached,
                nodes: result.nodes,
            });
        };

        let hint = match (termination, &self.config.hint) {
            (Termination::AwaitingMove { side }, Some(hint_config)) => {
                let hint = Solver::new(hint_config.clone()).hint(&self.game)?;
                Some(HintRecord {
                    side,
                    uci: hint.result.best_move.to_string(),
                    score: hint.result.score,
                })
            }
            _ => None,
        };

        let status = self.game.status();
        info!(%status, plies = moves.len(), ?termination, "contest finished");
        Ok(ContestRecord {
            white: self.config.white.as_ref().map(describe),
            black: self.config.black.as_ref().map(describe),
            start_fen,
            final_fen: self.game.to_fen(),
            status,
            result: status.result().to_string(),
            termination,
            move_list: self.game.move_list(),
            moves,
            hint,
        })
    }

    /// Write whichever outputs the configuration names.
    pub fn save_outputs(&self, record: &ContestRecord) -> Result<(), ContestError> {
        let output = &self.config.output;
        if let Some(path) = &output.fen {
            create_parent(path)?;
            self.game.save_fen(path)?;
        }
        if let Some(path) = &output.snapshot {
            create_parent(path)?;
            self.game.save_snapshot(path)?;
        }
        if let Some(path) = &output.result {
            create_parent(path)?;
            record.save(path)?;
        }
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<(), ContestError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| ContestError::Write {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
