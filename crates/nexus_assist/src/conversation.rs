//! Conversation state.
//!
//! An append-only log of turns. Reads take snapshots, so the UI can render
//! the log while operations are in flight. Appends from concurrent
//! operations are serialized by the lock and land in completion order.

use parking_lot::RwLock;

use crate::types::{ConversationWindow, Turn};

/// Assistant turn every new conversation starts with.
pub const GREETING: &str = "👋 I'm Nexus AI. Create a project for smart hints!";

/// Ordered, append-only log of conversation turns.
#[derive(Debug)]
pub struct Conversation {
    turns: RwLock<Vec<Turn>>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A conversation seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            turns: RwLock::new(vec![Turn::assistant(GREETING)]),
        }
    }

    /// A conversation with no turns at all.
    pub fn empty() -> Self {
        Self {
            turns: RwLock::new(Vec::new()),
        }
    }

    pub fn append(&self, turn: Turn) {
        self.turns.write().push(turn);
    }

    /// The last `n` turns, oldest first.
    pub fn window(&self, n: usize) -> Vec<Turn> {
        let turns = self.turns.read();
        let start = turns.len().saturating_sub(n);
        turns[start..].to_vec()
    }

    /// Append a user turn and return the context window that preceded it.
    pub fn push_user(&self, content: impl Into<String>, n: usize) -> ConversationWindow {
        let mut turns = self.turns.write();
        let start = turns.len().saturating_sub(n);
        let window = ConversationWindow::new(turns[start..].to_vec());
        turns.push(Turn::user(content));
        window
    }

    /// Snapshot of the whole log.
    pub fn turns(&self) -> Vec<Turn> {
        self.turns.read().clone()
    }

    pub fn len(&self) -> usize {
        self.turns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.read().is_empty()
    }
}
