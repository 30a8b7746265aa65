//! The game controller: one position, its history and the lifecycle state
//! machine around it.
//!
//! Every mutation is validated first and applied whole, so a rejected call
//! leaves the game exactly as it was. Each accepted transition publishes one
//! [`GameEvent`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::clock::ChessClock;
use crate::error::{ChessError, ChessResult};
use crate::events::{EventBus, GameEvent, GameObserver, SubscriptionId};
use crate::header::GameHeader;
use crate::notation::{self, Snapshot};
use crate::position::Position;
use crate::types::{Color, Move, PieceKind, Square};

/// Occurrences of one position that end the game.
pub const REPETITION_LIMIT: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
    Agreement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Checkmate { loser: Color },
    Stalemate,
    Draw(DrawReason),
    Resigned { loser: Color },
    TimeForfeit { loser: Color },
}

impl GameStatus {
    /// Every status except `InProgress` is absorbing.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { loser }
            | GameStatus::Resigned { loser }
            | GameStatus::TimeForfeit { loser } => Some(loser.other()),
            _ => None,
        }
    }

    /// PGN-style result token.
    pub fn result(&self) -> &'static str {
        match (self, self.winner()) {
            (GameStatus::InProgress, _) => "*",
            (_, Some(Color::White)) => "1-0",
            (_, Some(Color::Black)) => "0-1",
            (_, None) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => f.write_str("in progress"),
            GameStatus::Checkmate { loser } => write!(f, "{loser} is checkmated"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                f.write_str("draw by insufficient material")
            }
            GameStatus::Draw(DrawReason::FiftyMoveRule) => f.write_str("draw by the fifty-move rule"),
            GameStatus::Draw(DrawReason::ThreefoldRepetition) => {
                f.write_str("draw by threefold repetition")
            }
            GameStatus::Draw(DrawReason::Agreement) => f.write_str("draw by agreement"),
            GameStatus::Resigned { loser } => write!(f, "{loser} resigned"),
            GameStatus::TimeForfeit { loser } => write!(f, "{loser} lost on time"),
        }
    }
}

/// One accepted move and what is needed to take it back.
#[derive(Clone, Debug)]
struct Ply {
    mv: Move,
    before: Position,
    status_before: GameStatus,
    notation: String,
}

#[derive(Debug)]
pub struct Game {
    start: Position,
    position: Position,
    status: GameStatus,
    history: Vec<Ply>,
    redo: Vec<Move>,
    repetitions: HashMap<u64, u32>,
    draw_offers: [bool; 2],
    clock: Option<ChessClock>,
    bus: EventBus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game from the standard initial position.
    pub fn new() -> Self {
        Self::with_bus(Position::startpos(), EventBus::new())
    }

    /// A game starting from `position`, which must be reachable-looking:
    /// one king per side and the waiting side not in check.
    pub fn from_position(position: Position) -> ChessResult<Self> {
        position.validate()?;
        Ok(Self::with_bus(position, EventBus::new()))
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Self::from_position(Position::from_fen(fen)?)
    }

    /// A game from a snapshot. A trailing move list is replayed, so the
    /// moves come back as undoable history.
    pub fn from_snapshot(text: &str) -> ChessResult<Self> {
        let snapshot = Snapshot::parse(text)?;
        let start = snapshot.position();
        match &snapshot.history {
            Some(moves) => Self::from_history(start, moves),
            None => Self::from_position(start),
        }
    }

    /// Replay a numbered move list (`1. e2-e4 e7-e5 2. Ng1-f3`) from
    /// `start`. Fails on the first move that is not legal where it stands.
    pub fn from_history(start: Position, moves: &str) -> ChessResult<Self> {
        let mut game = Self::from_position(start)?;
        for token in notation::move_tokens(moves) {
            let mv = game.position.parse_long_algebraic(token)?;
            game.play_move(mv)?;
        }
        debug!(plies = game.ply_count(), "history replayed");
        Ok(game)
    }

    /// Replay a move list from the standard initial position.
    pub fn from_move_list(moves: &str) -> ChessResult<Self> {
        Self::from_history(Position::startpos(), moves)
    }

    /// Load a FEN, snapshot or move-list file. FEN placement always contains
    /// `/` rank separators, a move list starts with a move number, anything
    /// else is read as a snapshot. Moves following a FEN line are replayed.
    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ChessError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        let first = lines.next().unwrap_or("");
        let game = if first.contains('/') {
            let rest: Vec<&str> = lines.collect();
            Self::from_history(Position::from_fen(first)?, &rest.join(" "))?
        } else if first.starts_with(|c: char| c.is_ascii_digit()) {
            Self::from_move_list(&text)?
        } else {
            Self::from_snapshot(&text)?
        };
        info!(
            path = %path.display(),
            fen = %game.to_fen(),
            plies = game.ply_count(),
            "loaded game"
        );
        Ok(game)
    }

    /// Play against the clock: each side gets `per_side` for the whole game
    /// and loses on time when it runs out.
    pub fn with_clock(mut self, per_side: Duration) -> Self {
        let mut clock = ChessClock::new(per_side);
        if !self.is_over() {
            clock.start(self.side_to_move());
        }
        self.clock = Some(clock);
        self
    }

    fn with_bus(position: Position, bus: EventBus) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(position.key(), 1);
        let status = position.status();
        Self {
            start: position.clone(),
            position,
            status,
            history: Vec::new(),
            redo: Vec::new(),
            repetitions,
            draw_offers: [false; 2],
            clock: None,
            bus,
        }
    }

    /// Independent copy of the game state whose notifications are muted, for
    /// walking hypothetical lines without disturbing observers of this game.
    /// The copy has no clock.
    pub fn exploration_copy(&self) -> Game {
        Game {
            start: self.start.clone(),
            position: self.position.clone(),
            status: self.status,
            history: self.history.clone(),
            redo: self.redo.clone(),
            repetitions: self.repetitions.clone(),
            draw_offers: self.draw_offers,
            clock: None,
            bus: EventBus::muted(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn header(&self) -> &GameHeader {
        &self.position.header
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.position.legal_moves()
    }

    /// Legal moves of the side-to-move piece on `sq`.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        match self.position.board.piece_at(sq) {
            Some(piece) if piece.color == self.side_to_move() && !self.is_over() => {
                self.position.board.legal_moves(sq, &self.position.header)
            }
            _ => Vec::new(),
        }
    }

    /// Accepted moves, oldest first.
    pub fn moves(&self) -> Vec<Move> {
        self.history.iter().map(|ply| ply.mv).collect()
    }

    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clock time left for `color` (None in untimed games).
    pub fn time_remaining(&self, color: Color) -> Option<Duration> {
        self.clock.as_ref().map(|clock| clock.remaining(color))
    }

    /// Position the game started from, before any recorded move.
    pub fn start_position(&self) -> &Position {
        &self.start
    }

    pub fn draw_offered_by(&self, color: Color) -> bool {
        self.draw_offers[color.idx()]
    }

    /// How often the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.position.key())
            .copied()
            .unwrap_or(0)
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn to_snapshot(&self) -> String {
        self.position.to_snapshot()
    }

    /// Snapshot of the start position followed by the numbered move list.
    /// [`Game::from_snapshot`] rebuilds the game with its history.
    pub fn to_record(&self) -> String {
        let mut out = self.start.to_snapshot();
        if !self.history.is_empty() {
            out.push_str(&self.move_list());
            out.push('\n');
        }
        out
    }

    /// Numbered move list, e.g. `1. e2-e4 e7-e5 2. Ng1-f3`.
    pub fn move_list(&self) -> String {
        let mut out = String::new();
        for (i, ply) in self.history.iter().enumerate() {
            let header = &ply.before.header;
            if !out.is_empty() {
                out.push(' ');
            }
            match header.side_to_move {
                Color::White => out.push_str(&format!("{}. ", header.fullmove_number)),
                Color::Black if i == 0 => out.push_str(&format!("{}... ", header.fullmove_number)),
                Color::Black => {}
            }
            out.push_str(&ply.notation);
        }
        out
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.bus.observer_count()
    }

    pub fn is_exploration(&self) -> bool {
        self.bus.is_muted()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Validate and play `mv`, returning the resulting status.
    pub fn play_move(&mut self, mv: Move) -> ChessResult<GameStatus> {
        self.ensure_in_progress()?;
        if !self.position.is_legal(&mv) {
            return Err(self.reject(ChessError::IllegalMove { mv }));
        }
        self.redo.clear();
        let status = self.apply(mv);
        self.bus.publish(&GameEvent::MovePlayed { mv, status });
        Ok(status)
    }

    /// Play a move given in coordinate notation (`e2e4`, `e7e8q`).
    pub fn play(&mut self, text: &str) -> ChessResult<GameStatus> {
        self.ensure_in_progress()?;
        let mv = self
            .position
            .parse_move(text)
            .map_err(|err| self.reject(err))?;
        self.play_move(mv)
    }

    /// Play the legal move from `from` to `to`; pawns reaching the last rank
    /// promote to `promotion`, or a queen when none is given.
    pub fn play_coords(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<GameStatus> {
        self.ensure_in_progress()?;
        match self.position.find_move(from, to, promotion) {
            Some(mv) => self.play_move(mv),
            None => Err(self.reject(ChessError::UnknownMove {
                text: format!("{from}{to}"),
            })),
        }
    }

    /// Take back the last move. The undone move can be replayed with
    /// [`Game::redo`] until a different move is played.
    pub fn undo(&mut self) -> ChessResult<Move> {
        let Some(ply) = self.history.pop() else {
            return Err(self.reject(ChessError::NothingToUndo));
        };
        let key = self.position.key();
        if let Some(count) = self.repetitions.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&key);
            }
        }
        self.position = ply.before;
        self.status = ply.status_before;
        self.draw_offers = [false; 2];
        self.redo.push(ply.mv);
        if let Some(clock) = &mut self.clock
            && !self.status.is_terminal()
        {
            clock.start(self.position.side_to_move());
        }
        debug!(mv = %ply.mv, "move undone");
        self.bus.publish(&GameEvent::MoveUndone { mv: ply.mv });
        Ok(ply.mv)
    }

    pub fn redo(&mut self) -> ChessResult<GameStatus> {
        let Some(mv) = self.redo.last().copied() else {
            return Err(self.reject(ChessError::NothingToRedo));
        };
        self.ensure_in_progress()?;
        if !self.position.is_legal(&mv) {
            return Err(self.reject(ChessError::IllegalMove { mv }));
        }
        self.redo.pop();
        let status = self.apply(mv);
        self.bus.publish(&GameEvent::MoveRedone { mv, status });
        Ok(status)
    }

    pub fn resign(&mut self, color: Color) -> ChessResult<GameStatus> {
        self.ensure_in_progress()?;
        self.finish(GameStatus::Resigned { loser: color });
        Ok(self.status)
    }

    /// Offer a draw. The game ends in a draw once both sides have offered
    /// since the last move.
    pub fn propose_draw(&mut self, color: Color) -> ChessResult<GameStatus> {
        self.ensure_in_progress()?;
        self.draw_offers[color.idx()] = true;
        if self.draw_offers.iter().all(|&offered| offered) {
            self.finish(GameStatus::Draw(DrawReason::Agreement));
        } else {
            debug!(%color, "draw offered");
            self.bus.publish(&GameEvent::DrawOffered { by: color });
        }
        Ok(self.status)
    }

    pub fn cancel_draw(&mut self, color: Color) {
        self.draw_offers[color.idx()] = false;
    }

    /// End the game if the side to move has run out of time.
    pub fn check_time(&mut self) -> GameStatus {
        if !self.is_over()
            && let Some(loser) = self.clock.as_ref().and_then(ChessClock::flagged)
        {
            self.finish(GameStatus::TimeForfeit { loser });
        }
        self.status
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn save_fen(&self, path: impl AsRef<Path>) -> ChessResult<()> {
        write_file(path.as_ref(), &(self.to_fen() + "\n"))
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> ChessResult<()> {
        write_file(path.as_ref(), &self.to_snapshot())
    }

    /// Save the start position and every move, see [`Game::to_record`].
    pub fn save_record(&self, path: impl AsRef<Path>) -> ChessResult<()> {
        write_file(path.as_ref(), &self.to_record())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_in_progress(&mut self) -> ChessResult<()> {
        self.check_time();
        if self.is_over() {
            let status = self.status;
            return Err(self.reject(ChessError::GameOver { status }));
        }
        Ok(())
    }

    fn reject(&mut self, err: ChessError) -> ChessError {
        debug!(error = %err, "rejected");
        self.bus.publish_error(&err);
        err
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        if let Some(clock) = &mut self.clock {
            clock.stop();
        }
        info!(%status, result = status.result(), "game over");
        self.bus.publish(&GameEvent::GameEnded { status });
    }

    /// Apply an already validated move and settle the new status.
    fn apply(&mut self, mv: Move) -> GameStatus {
        let before = self.position.clone();
        let status_before = self.status;
        self.position.play(&mv);

        let key = self.position.key();
        let seen = self.repetitions.entry(key).or_insert(0);
        *seen += 1;
        let seen = *seen;

        let mut status = self.position.status();
        if status == GameStatus::InProgress && seen >= REPETITION_LIMIT {
            status = GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }

        let mut notation = mv.long_algebraic();
        match status {
            GameStatus::Checkmate { .. } => notation.push('#'),
            _ if self.position.is_check() => notation.push('+'),
            _ => {}
        }

        self.history.push(Ply {
            mv,
            before,
            status_before,
            notation,
        });
        self.status = status;
        self.draw_offers = [false; 2];
        if let Some(clock) = &mut self.clock {
            if status.is_terminal() {
                clock.stop();
            } else {
                clock.start(self.position.side_to_move());
            }
        }

        debug!(mv = %mv, %status, ply = self.history.len(), "move played");
        if status.is_terminal() {
            info!(%status, result = status.result(), "game over");
        }
        status
    }
}

fn write_file(path: &Path, contents: &str) -> ChessResult<()> {
    fs::write(path, contents).map_err(|source| ChessError::Save {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
