//! Bounded per-user conversation history.
//!
//! The store is the only shared mutable state in the relay. The in-memory
//! implementation keys histories in a sharded `DashMap`, so requests for
//! different users never contend on a global lock.

use std::collections::VecDeque;

use chatrelay_types::chat::{Turn, UserId};
use dashmap::DashMap;
use tracing::debug;

/// Capability set for per-user history storage.
///
/// Handlers receive the store explicitly, so a persistent backend can be
/// substituted without touching the routing logic. No method fails for
/// well-formed input.
pub trait ConversationStore: Send + Sync {
    /// Chronological snapshot of the user's history. Empty for unknown users.
    fn get(&self, user: UserId) -> Vec<Turn>;

    /// Append one turn, evicting the oldest pair if the bound would be exceeded.
    fn append(&self, user: UserId, turn: Turn);

    /// Append a completed user/assistant exchange.
    ///
    /// Implementations should insert both turns under a single lock so that
    /// concurrent exchanges for the same user never interleave inside a pair.
    fn append_exchange(&self, user: UserId, user_turn: Turn, assistant_turn: Turn) {
        self.append(user, user_turn);
        self.append(user, assistant_turn);
    }

    /// Drop all history for the user. Idempotent.
    fn clear(&self, user: UserId);
}

/// Process-lifetime history store bounded to `2 × max_turns` turns per user.
#[derive(Debug)]
pub struct InMemoryConversationStore {
    histories: DashMap<UserId, VecDeque<Turn>>,
    capacity: usize,
}

impl InMemoryConversationStore {
    /// Create a store retaining `max_turns` logical turns per user.
    ///
    /// `max_turns` is clamped to at least one.
    pub fn new(max_turns: usize) -> Self {
        Self {
            histories: DashMap::new(),
            capacity: max_turns.max(1) * 2,
        }
    }

    /// Maximum number of turns retained per user.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of users with a live history.
    pub fn user_count(&self) -> usize {
        self.histories.len()
    }

    fn push_bounded(&self, history: &mut VecDeque<Turn>, turn: Turn) {
        history.push_back(turn);
        while history.len() > self.capacity {
            // Evict a whole (user, assistant) pair.
            history.pop_front();
            history.pop_front();
        }
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn get(&self, user: UserId) -> Vec<Turn> {
        self.histories
            .get(&user)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn append(&self, user: UserId, turn: Turn) {
        let mut entry = self
            .histories
            .entry(user)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        self.push_bounded(entry.value_mut(), turn);
    }

    fn append_exchange(&self, user: UserId, user_turn: Turn, assistant_turn: Turn) {
        let mut entry = self
            .histories
            .entry(user)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        let history = entry.value_mut();
        self.push_bounded(history, user_turn);
        self.push_bounded(history, assistant_turn);
        debug!(%user, turns = history.len(), "appended exchange");
    }

    fn clear(&self, user: UserId) {
        if self.histories.remove(&user).is_some() {
            debug!(%user, "cleared history");
        }
    }
}
