//! Chess rules on bitboards.
//!
//! Layers, leaf first: [`Bitboard`] square sets, value types ([`Piece`],
//! [`Square`], [`Move`]), [`Board`] placement with move generation and
//! terminal detection, [`Position`] (board plus [`GameHeader`]), and the
//! [`Game`] controller with its [`EventBus`] notifications.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod clock;
pub mod error;
pub mod events;
pub mod game;
pub mod header;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod position;
pub mod types;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::Board;
pub use clock::ChessClock;
pub use error::{ChessError, ChessResult};
pub use events::{EventBus, GameEvent, GameObserver, SubscriptionId};
pub use game::{DrawReason, Game, GameStatus, REPETITION_LIMIT};
pub use header::{CastlingRights, GameHeader};
pub use notation::{STARTPOS_FEN, Snapshot, bare_fen, move_tokens, parse_snapshot, to_snapshot};
pub use perft::{divide, perft};
pub use position::{FIFTY_MOVE_PLIES, Position};
pub use types::{Color, Move, MoveKind, Piece, PieceKind, Square};
