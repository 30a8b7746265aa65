//! Heuristic evaluation of positions.
//!
//! Every term is written as "mine minus theirs", so a term evaluated for
//! black is exactly the negation of the same term for white. The search
//! relies on this to cache a single white-relative score per position.

mod activity;
mod king;
mod pawns;
mod pst;

use chess_rules::{Color, PieceKind, Position};
use serde::{Deserialize, Serialize};

/// Centipawn value of each piece kind, indexed by `PieceKind::idx()`.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Score the game-status term gives a checkmate.
pub const STATUS_WIN: i32 = 10_000;

/// Bound on any weighted evaluation, so no choice of weights can reach
/// [`MATE_SCORE`](crate::MATE_SCORE).
pub const EVAL_LIMIT: i32 = crate::MATE_SCORE / 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Sum of piece values.
    Material,
    /// Piece-square tables.
    Positional,
    /// Pawn shield, attacked squares around the king, exposed central king.
    KingSafety,
    /// Squares controlled, weighted toward the center and enemy half.
    SpaceControl,
    /// Doubled, isolated, passed and chained pawns.
    PawnStructure,
    /// Number of squares the pieces can reach.
    Mobility,
    /// King centralization and passed pawns, scaled up as material leaves.
    Endgame,
    /// Giving or being in check.
    Check,
    /// Minor pieces off their home squares and a castled king.
    Development,
    /// Pawns close to promotion.
    Promotion,
    /// Holding the opposition in king-and-pawn endings.
    KingOpposition,
    /// Bishop pair and bishops in open endgames.
    BishopEndgame,
    /// Checkmate and drawn positions.
    GameStatus,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 13] = [
        HeuristicKind::Material,
        HeuristicKind::Positional,
        HeuristicKind::KingSafety,
        HeuristicKind::SpaceControl,
        HeuristicKind::PawnStructure,
        HeuristicKind::Mobility,
        HeuristicKind::Endgame,
        HeuristicKind::Check,
        HeuristicKind::Development,
        HeuristicKind::Promotion,
        HeuristicKind::KingOpposition,
        HeuristicKind::BishopEndgame,
        HeuristicKind::GameStatus,
    ];

    /// Score `pos` for `side`; positive favors `side`.
    pub fn score(self, pos: &Position, side: Color) -> i32 {
        match self {
            HeuristicKind::Material => material(pos, side),
            HeuristicKind::Positional => pst::positional(pos, side),
            HeuristicKind::KingSafety => king::safety(pos, side),
            HeuristicKind::SpaceControl => activity::space_control(pos, side),
            HeuristicKind::PawnStructure => pawns::structure(pos, side),
            HeuristicKind::Mobility => activity::mobility(pos, side),
            HeuristicKind::Endgame => king::endgame(pos, side),
            HeuristicKind::Check => activity::check(pos, side),
            HeuristicKind::Development => activity::development(pos, side),
            HeuristicKind::Promotion => pawns::promotion(pos, side),
            HeuristicKind::KingOpposition => king::opposition(pos, side),
            HeuristicKind::BishopEndgame => activity::bishops(pos, side),
            HeuristicKind::GameStatus => game_status(pos, side),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub kind: HeuristicKind,
    #[serde(default = "unit_weight")]
    pub weight: i32,
}

fn unit_weight() -> i32 {
    1
}

/// Named combinations of terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Material, tables, mobility, pawns, king safety, development, status.
    Standard,
    /// Material, pawn structure and mobility.
    Shannon,
    /// Material plus the terms that matter once pieces come off.
    Ending,
}

impl Preset {
    pub fn terms(self) -> Vec<WeightedTerm> {
        use HeuristicKind::*;
        let pairs: &[(HeuristicKind, i32)] = match self {
            Preset::Standard => &[
                (Material, 1),
                (Positional, 1),
                (Mobility, 1),
                (PawnStructure, 1),
                (KingSafety, 1),
                (Development, 1),
                (GameStatus, 1),
            ],
            Preset::Shannon => &[(Material, 1), (PawnStructure, 1), (Mobility, 1)],
            Preset::Ending => &[
                (Material, 1),
                (Endgame, 1),
                (Promotion, 1),
                (KingOpposition, 1),
                (BishopEndgame, 1),
                (PawnStructure, 1),
            ],
        };
        pairs
            .iter()
            .map(|&(kind, weight)| WeightedTerm { kind, weight })
            .collect()
    }
}

/// How a configuration names its heuristic: a single term, a preset, or an
/// explicit weighted list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeuristicSpec {
    Kind(HeuristicKind),
    Preset(Preset),
    Weighted(Vec<WeightedTerm>),
}

impl Default for HeuristicSpec {
    fn default() -> Self {
        HeuristicSpec::Preset(Preset::Standard)
    }
}

/// A weighted sum of heuristic terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluator {
    terms: Vec<WeightedTerm>,
}

impl Evaluator {
    pub fn new(terms: Vec<WeightedTerm>) -> Self {
        Self { terms }
    }

    pub fn single(kind: HeuristicKind) -> Self {
        Self::new(vec![WeightedTerm { kind, weight: 1 }])
    }

    pub fn from_spec(spec: &HeuristicSpec) -> Self {
        match spec {
            HeuristicSpec::Kind(kind) => Self::single(*kind),
            HeuristicSpec::Preset(preset) => Self::new(preset.terms()),
            HeuristicSpec::Weighted(terms) => Self::new(terms.clone()),
        }
    }

    pub fn terms(&self) -> &[WeightedTerm] {
        &self.terms
    }

    /// Score `pos` from `perspective`; positive favors `perspective`.
    /// The sum is clamped to `±EVAL_LIMIT`.
    pub fn evaluate(&self, pos: &Position, perspective: Color) -> i32 {
        let sum: i64 = self
            .terms
            .iter()
            .filter(|t| t.weight != 0)
            .map(|t| i64::from(t.weight) * i64::from(t.kind.score(pos, perspective)))
            .sum();
        sum.clamp(-i64::from(EVAL_LIMIT), i64::from(EVAL_LIMIT)) as i32
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::from_spec(&HeuristicSpec::default())
    }
}

// =============================================================================
// Terms simple enough to live here
// =============================================================================

fn side_material(pos: &Position, side: Color) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&k| pos.board.pieces(side, k).popcount() as i32 * PIECE_VALUES[k.idx()])
        .sum()
}

/// Material without pawns or king.
pub(crate) fn non_pawn_material(pos: &Position, side: Color) -> i32 {
    side_material(pos, side) - pos.board.pieces(side, PieceKind::Pawn).popcount() as i32 * PIECE_VALUES[0]
}

fn material(pos: &Position, side: Color) -> i32 {
    side_material(pos, side) - side_material(pos, side.other())
}

fn game_status(pos: &Position, side: Color) -> i32 {
    match pos.status() {
        chess_rules::GameStatus::Checkmate { loser } if loser == side => -STATUS_WIN,
        chess_rules::GameStatus::Checkmate { .. } => STATUS_WIN,
        _ => 0,
    }
}

/// 0 with all pieces on the board, 256 with only kings and pawns left.
pub(crate) fn endgame_phase(pos: &Position) -> i32 {
    const FULL: i32 = 2 * (2 * 320 + 2 * 330 + 2 * 500 + 900);
    let remaining = (non_pawn_material(pos, Color::White) + non_pawn_material(pos, Color::Black)).min(FULL);
    (FULL - remaining) * 256 / FULL
}
