use chess_rules::{ChessError, GameEvent, GameObserver};
use tracing::{info, warn};

/// Forwards every game notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl GameObserver for TracingObserver {
    fn on_game_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MovePlayed { mv, status } => {
                info!(mv = %mv.long_algebraic(), %status, "move played")
            }
            GameEvent::MoveUndone { mv } => info!(%mv, "move undone"),
            GameEvent::MoveRedone { mv, status } => info!(%mv, %status, "move redone"),
            GameEvent::DrawOffered { by } => info!(%by, "draw offered"),
            GameEvent::GameEnded { status } => info!(%status, "game ended"),
        }
    }

    fn on_error(&mut self, error: &ChessError) {
        warn!(%error, "game rejected an operation");
    }
}
