//! Fail-soft alpha-beta over the same tree minimax walks.
//!
//! Children are visited in generation order and leaves are scored the same
//! way, so with a full window at the root the returned value equals the
//! minimax value. Pruned subtrees only ever return bounds that cannot beat
//! the move already held.

use chess_rules::Position;

use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::time_control::SearchLimits;
use crate::tree::{self, SearchContext};
use crate::{Engine, SearchResult};

pub(crate) fn node(
    ctx: &mut SearchContext<'_>,
    pos: &Position,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
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

    if pos.side_to_move() == ctx.root() {
        let mut best = i32::MIN;
        for mv in &moves {
            let score = node(ctx, &pos.after(mv), depth - 1, alpha, beta)?;
            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }
        Some(best)
    } else {
        let mut best = i32::MAX;
        for mv in &moves {
            let score = node(ctx, &pos.after(mv), depth - 1, alpha, beta)?;
            best = best.min(score);
            beta = beta.min(best);
            if alpha >= beta {
                break;
            }
        }
        Some(best)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlphaBeta {
    evaluator: Evaluator,
    parallel: bool,
}

impl AlphaBeta {
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

impl Engine for AlphaBeta {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, SearchError> {
        tree::run(pos, &self.evaluator, limits, self.parallel, node)
    }

    fn name(&self) -> &str {
        "alpha-beta"
    }
}
