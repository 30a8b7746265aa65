//! Plain minimax: every node is expanded, no pruning.

use chess_rules::Position;

use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::time_control::SearchLimits;
use crate::tree::{self, SearchContext};
use crate::{Engine, SearchResult};

/// Maximizes on the root side's plies, minimizes on the opponent's.
/// The window arguments are ignored.
pub(crate) fn node(
    ctx: &mut SearchContext<'_>,
    pos: &Position,
    depth: u8,
    _alpha: i32,
    _beta: i32,
) -> Option<i32> {
    if ctx.enter_node() {
        return None;
    }
    let moves = pos.legal_moves();
    if let Some(score) = ctx.terminal(pos, &moves, depth) {
        return Some(score);
    }
    if depth == 0 {
        return Some(ctx.leaf(pos));
    }

    let maximizing = pos.side_to_move() == ctx.root();
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for mv in &moves {
        let score = node(ctx, &pos.after(mv), depth - 1, 0, 0)?;
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    Some(best)
}

#[derive(Debug, Clone, Default)]
pub struct Minimax {
    evaluator: Evaluator,
    parallel: bool,
}

impl Minimax {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Engine for Minimax {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, SearchError> {
        tree::run(pos, &self.evaluator, limits, self.parallel, node)
    }

    fn name(&self) -> &str {
        "minimax"
    }
}
