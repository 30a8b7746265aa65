//! Monte-Carlo tree search with UCB1 selection and uniform random rollouts.
//!
//! Nodes live in an arena and refer to each other by index. Every node
//! stores the value it has accumulated from the point of view of the side
//! that moved into it, which is exactly what its parent wants to maximize.

use chess_rules::{Color, FIFTY_MOVE_PLIES, Move, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::time_control::SearchLimits;
use crate::{Engine, SearchResult};

/// Centipawns that map to tanh(1) when squashing a cut-off rollout.
const ROLLOUT_SCALE: f64 = 600.0;

#[derive(Debug)]
struct Node {
    mv: Option<Move>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u32,
    value: f64,
    position: Position,
    depth: u8,
}

impl Node {
    fn new(
        position: Position,
        mv: Option<Move>,
        parent: Option<usize>,
        depth: u8,
        rng: &mut StdRng,
    ) -> Self {
        let mut untried = position.legal_moves();
        untried.shuffle(rng);
        Self {
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            value: 0.0,
            position,
            depth,
        }
    }

    /// The side that played `mv` into this node.
    fn mover(&self) -> Color {
        self.position.side_to_move().other()
    }

    fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value / f64::from(self.visits)
        }
    }
}

/// Outcome of a finished game from white's side, or `None` while it goes on.
fn decided(pos: &Position, moves: &[Move]) -> Option<f64> {
    if moves.is_empty() {
        if !pos.is_check() {
            return Some(0.0);
        }
        return Some(match pos.side_to_move() {
            Color::White => -1.0,
            Color::Black => 1.0,
        });
    }
    if pos.board.is_draw_by_insufficient_material() || pos.header.halfmove_clock >= FIFTY_MOVE_PLIES {
        return Some(0.0);
    }
    None
}

#[derive(Debug, Clone)]
pub struct Mcts {
    evaluator: Evaluator,
    iterations: u32,
    exploration: f64,
    rollout_depth: u16,
    rng: StdRng,
}

impl Mcts {
    pub fn new(evaluator: Evaluator, iterations: u32, exploration: f64, rollout_depth: u16) -> Self {
        Self {
            evaluator,
            iterations,
            exploration,
            rollout_depth,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible rollouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn ucb(&self, parent_visits: u32, child: &Node) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let explore = (f64::from(parent_visits).ln() / f64::from(child.visits)).sqrt();
        child.mean() + self.exploration * explore
    }

    fn select(&self, tree: &[Node]) -> usize {
        let mut idx = 0;
        while tree[idx].untried.is_empty() && !tree[idx].children.is_empty() {
            let parent_visits = tree[idx].visits;
            let mut best = tree[idx].children[0];
            let mut best_ucb = f64::NEG_INFINITY;
            for &c in &tree[idx].children {
                let u = self.ucb(parent_visits, &tree[c]);
                if u > best_ucb {
                    best_ucb = u;
                    best = c;
                }
            }
            idx = best;
        }
        idx
    }

    fn expand(&mut self, tree: &mut Vec<Node>, idx: usize) -> usize {
        let Some(mv) = tree[idx].untried.pop() else {
            return idx;
        };
        let position = tree[idx].position.after(&mv);
        let depth = tree[idx].depth.saturating_add(1);
        let child = Node::new(position, Some(mv), Some(idx), depth, &mut self.rng);
        tree.push(child);
        let child_idx = tree.len() - 1;
        tree[idx].children.push(child_idx);
        child_idx
    }

    /// Random playout from `start`, scored from white's side in [-1, 1].
    fn rollout(&mut self, start: &Position) -> f64 {
        let mut pos = start.clone();
        for _ in 0..self.rollout_depth {
            let moves = pos.legal_moves();
            if let Some(result) = decided(&pos, &moves) {
                return result;
            }
            let Some(mv) = moves.choose(&mut self.rng) else {
                return 0.0;
            };
            pos.play(mv);
        }
        let moves = pos.legal_moves();
        if let Some(result) = decided(&pos, &moves) {
            return result;
        }
        let cp = self.evaluator.evaluate(&pos, Color::White);
        (f64::from(cp) / ROLLOUT_SCALE).tanh()
    }

    fn backpropagate(tree: &mut [Node], leaf: usize, white_result: f64) {
        let mut cursor = Some(leaf);
        while let Some(idx) = cursor {
            let node = &mut tree[idx];
            node.visits += 1;
            node.value += match node.mover() {
                Color::White => white_result,
                Color::Black => -white_result,
            };
            cursor = node.parent;
        }
    }
}

impl Default for Mcts {
    fn default() -> Self {
        Self::new(Evaluator::default(), 1000, std::f64::consts::SQRT_2, 40)
    }
}

impl Engine for Mcts {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, SearchError> {
        let root = Node::new(pos.clone(), None, None, 0, &mut self.rng);
        if root.untried.is_empty() {
            return Err(SearchError::NoLegalMoves {
                in_check: pos.is_check(),
            });
        }

        let tc = limits.start_clock();
        let mut tree = vec![root];
        let mut stopped = false;
        let mut max_depth = 0;
        let iterations = self.iterations.max(1);

        for i in 0..iterations {
            if i > 0 && tc.expired() {
                stopped = true;
                break;
            }
            let selected = self.select(&tree);
            let leaf = self.expand(&mut tree, selected);
            max_depth = max_depth.max(tree[leaf].depth);
            let position = tree[leaf].position.clone();
            let result = self.rollout(&position);
            Self::backpropagate(&mut tree, leaf, result);
        }

        // Robust child: most visits, earliest expansion on ties.
        let mut best: Option<&Node> = None;
        for &c in &tree[0].children {
            let child = &tree[c];
            if best.is_none_or(|b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        let Some((best_move, mean)) = best.and_then(|n| n.mv.map(|mv| (mv, n.mean()))) else {
            return Err(SearchError::NoLegalMoves {
                in_check: pos.is_check(),
            });
        };

        debug!(
            children = tree[0].children.len(),
            root_visits = tree[0].visits,
            "mcts tree built"
        );
        let score = (mean * 1000.0).round() as i32;
        let nodes = tree.len() as u64;
        info!(%best_move, score, nodes, stopped, "search complete");
        Ok(SearchResult {
            best_move,
            score,
            depth_reached: max_depth,
            nodes,
            stopped,
        })
    }

    fn name(&self) -> &str {
        "mcts"
    }
}

#[cfg(test)]
#[path = "mcts_tests.rs"]
mod mcts_tests;
