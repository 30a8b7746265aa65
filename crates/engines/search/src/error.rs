use chess_rules::ChessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The position is terminal; `in_check` tells checkmate from stalemate.
    #[error("no legal moves ({})", terminal_kind(.in_check))]
    NoLegalMoves { in_check: bool },

    #[error("invalid search configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Rules(#[from] ChessError),
}

fn terminal_kind(in_check: &bool) -> &'static str {
    if *in_check { "checkmate" } else { "stalemate" }
}
