//! Game lifecycle notifications.
//!
//! Observers implement [`GameObserver`] and are registered on an
//! [`EventBus`], which hands back a [`SubscriptionId`] for later removal.
//! A muted bus drops everything; exploration copies of a game carry one.

use crate::error::ChessError;
use crate::game::GameStatus;
use crate::types::{Color, Move};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A move was accepted; `status` is the state it produced.
    MovePlayed { mv: Move, status: GameStatus },
    MoveUndone { mv: Move },
    MoveRedone { mv: Move, status: GameStatus },
    DrawOffered { by: Color },
    /// The game ended without a move: resignation or agreed draw.
    GameEnded { status: GameStatus },
}

pub trait GameObserver: Send {
    fn on_game_event(&mut self, event: &GameEvent);

    /// Rejected moves, load failures and other recoverable errors.
    fn on_error(&mut self, _error: &ChessError) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, Box<dyn GameObserver>)>,
    next_id: u64,
    muted: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that never delivers anything.
    pub fn muted() -> Self {
        Self {
            muted: true,
            ..Self::default()
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove the observer registered under `id`. Returns false if it was
    /// already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn publish(&mut self, event: &GameEvent) {
        if self.muted {
            return;
        }
        for (_, observer) in &mut self.observers {
            observer.on_game_event(event);
        }
    }

    pub fn publish_error(&mut self, error: &ChessError) {
        if self.muted {
            return;
        }
        for (_, observer) in &mut self.observers {
            observer.on_error(error);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("muted", &self.muted)
            .finish()
    }
}
