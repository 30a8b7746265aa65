//! Shared machinery for the depth-limited searches: per-invocation context,
//! terminal and leaf scoring, and the root driver with optional rayon
//! root-splitting and iterative deepening under a time budget.
//!
//! Scores are always from the root mover's point of view. Both minimax and
//! alpha-beta plug into [`run`] through a [`NodeSearch`] function, so they
//! share move order, leaf scoring and root tie-breaking exactly.

use std::collections::HashMap;

use chess_rules::{Color, FIFTY_MOVE_PLIES, Move, Position};
use rayon::prelude::*;
use tracing::{info, trace};

use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::time_control::{SearchLimits, TimeControl};
use crate::SearchResult;

/// Base score of a checkmate. Any heuristic output stays far below it.
pub const MATE_SCORE: i32 = 1_000_000;

/// Wider than any reachable score, including depth-adjusted mates.
pub(crate) const INFINITY: i32 = 2 * MATE_SCORE;

/// Scores `pos` with `depth` plies left inside the `(alpha, beta)` window.
/// `None` means the search was stopped and the value is unusable.
pub(crate) type NodeSearch = fn(&mut SearchContext<'_>, &Position, u8, i32, i32) -> Option<i32>;

/// State owned by one search invocation (or one root worker).
pub(crate) struct SearchContext<'a> {
    evaluator: &'a Evaluator,
    root: Color,
    /// White-relative static evaluations keyed by Zobrist hash.
    cache: HashMap<u64, i32>,
    nodes: u64,
    time_control: TimeControl,
    enforce_deadline: bool,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(
        evaluator: &'a Evaluator,
        root: Color,
        time_control: TimeControl,
        enforce_deadline: bool,
    ) -> Self {
        Self {
            evaluator,
            root,
            cache: HashMap::new(),
            nodes: 0,
            time_control,
            enforce_deadline,
        }
    }

    /// A sibling context for a rayon worker. Shares the stop flag, not the cache.
    fn fork(&self) -> Self {
        Self::new(
            self.evaluator,
            self.root,
            self.time_control.clone(),
            self.enforce_deadline,
        )
    }

    #[inline]
    pub(crate) fn root(&self) -> Color {
        self.root
    }

    pub(crate) fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Count a node and report whether the search must unwind.
    #[inline]
    pub(crate) fn enter_node(&mut self) -> bool {
        self.nodes += 1;
        if !self.enforce_deadline {
            return false;
        }
        if self.time_control.is_stopped() {
            return true;
        }
        TimeControl::poll_due(self.nodes) && self.time_control.expired()
    }

    /// Score of a node that ends the game, or `None` if play goes on.
    /// Mates found with more plies left score further from zero, so the
    /// quickest mate wins and the slowest loss is preferred.
    pub(crate) fn terminal(&self, pos: &Position, moves: &[Move], depth_left: u8) -> Option<i32> {
        if moves.is_empty() {
            if !pos.is_check() {
                return Some(0);
            }
            let mate = MATE_SCORE + i32::from(depth_left);
            return Some(if pos.side_to_move() == self.root { -mate } else { mate });
        }
        if pos.board.is_draw_by_insufficient_material()
            || pos.header.halfmove_clock >= FIFTY_MOVE_PLIES
        {
            return Some(0);
        }
        None
    }

    /// Static evaluation from the root's side.
    pub(crate) fn leaf(&mut self, pos: &Position) -> i32 {
        let key = pos.key();
        let white = match self.cache.get(&key) {
            Some(&score) => score,
            None => {
                let score = self.evaluator.evaluate(pos, Color::White);
                self.cache.insert(key, score);
                score
            }
        };
        match self.root {
            Color::White => white,
            Color::Black => -white,
        }
    }
}

/// Best root move at a fixed depth. Ties keep the earliest move in
/// generation order.
fn search_depth(
    ctx: &mut SearchContext<'_>,
    pos: &Position,
    moves: &[Move],
    depth: u8,
    node: NodeSearch,
    parallel: bool,
) -> Option<(Move, i32)> {
    let scores: Vec<i32> = if parallel {
        let template = &*ctx;
        let results: Vec<(Option<i32>, u64)> = moves
            .par_iter()
            .map(|mv| {
                let mut worker = template.fork();
                let score = node(&mut worker, &pos.after(mv), depth - 1, -INFINITY, INFINITY);
                (score, worker.nodes())
            })
            .collect();
        ctx.nodes += results.iter().map(|(_, n)| n).sum::<u64>();
        results.into_iter().map(|(s, _)| s).collect::<Option<Vec<_>>>()?
    } else {
        let mut scores = Vec::with_capacity(moves.len());
        let mut alpha = -INFINITY;
        for mv in moves {
            let score = node(ctx, &pos.after(mv), depth - 1, alpha, INFINITY)?;
            alpha = alpha.max(score);
            scores.push(score);
        }
        scores
    };

    let mut best: Option<(Move, i32)> = None;
    for (mv, score) in moves.iter().zip(scores) {
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((*mv, score));
        }
    }
    best
}

/// Drive a depth-limited search from the root.
///
/// Without a time budget this is one pass at `limits.depth`. With one, it
/// deepens from 1; the first iteration always completes and an iteration
/// cut short by the deadline is thrown away.
pub(crate) fn run(
    pos: &Position,
    evaluator: &Evaluator,
    limits: SearchLimits,
    parallel: bool,
    node: NodeSearch,
) -> Result<SearchResult, SearchError> {
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves {
            in_check: pos.is_check(),
        });
    }

    let tc = limits.start_clock();
    let target = limits.depth.max(1);
    let timed = tc.is_timed();
    let first = if timed { 1 } else { target };

    let mut completed: Option<(Move, i32, u8)> = None;
    let mut nodes = 0;
    let mut stopped = false;

    for depth in first..=target {
        if depth > first && tc.expired() {
            stopped = true;
            break;
        }
        let mut ctx = SearchContext::new(evaluator, pos.side_to_move(), tc.clone(), timed && depth > 1);
        let outcome = search_depth(&mut ctx, pos, &moves, depth, node, parallel);
        nodes += ctx.nodes();
        match outcome {
            Some((mv, score)) => {
                trace!(depth, %mv, score, nodes, "iteration complete");
                completed = Some((mv, score, depth));
            }
            None => {
                trace!(depth, "iteration aborted");
                stopped = true;
                break;
            }
        }
    }

    // Depth 1 never checks the deadline, so something always completes.
    let (best_move, score, depth_reached) = completed.unwrap_or((moves[0], 0, 0));
    info!(
        %best_move,
        score,
        depth_reached,
        nodes,
        stopped,
        elapsed_ms = tc.elapsed().as_millis() as u64,
        "search complete"
    );
    Ok(SearchResult {
        best_move,
        score,
        depth_reached,
        nodes,
        stopped,
    })
}
