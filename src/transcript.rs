use tracing::{debug, warn};

use crate::models::ChatTurn;
use crate::storage::KeyValueStore;

pub const TRANSCRIPT_KEY: &str = "dinnerChatHistory";

/// Ordered chat history mirrored into durable storage.
///
/// Restoration only happens while the live transcript is empty and persistence
/// only happens while it is not, so once a turn exists a visit always writes
/// and never reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
    limit: usize,
}

impl Transcript {
    pub fn new(limit: usize) -> Self {
        Self {
            turns: Vec::new(),
            limit,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn append(&mut self, turn: ChatTurn) -> &Self {
        self.turns.push(turn);
        self
    }

    /// The most recent `limit` turns, oldest first.
    pub fn retained(&self) -> &[ChatTurn] {
        let start = self.turns.len().saturating_sub(self.limit);
        &self.turns[start..]
    }

    /// Returns true when turns were loaded.
    pub fn restore(&mut self, store: &dyn KeyValueStore) -> bool {
        if !self.turns.is_empty() {
            return false;
        }
        let Some(raw) = store.get(TRANSCRIPT_KEY) else {
            return false;
        };

        match serde_json::from_str::<Vec<ChatTurn>>(&raw) {
            Ok(turns) => {
                debug!("restored {} chat turns", turns.len());
                self.turns = turns;
                !self.turns.is_empty()
            }
            Err(err) => {
                warn!("discarding unreadable chat history: {err}");
                false
            }
        }
    }

    pub fn persist(&self, store: &dyn KeyValueStore) {
        if self.turns.is_empty() {
            return;
        }
        let encoded = match serde_json::to_string(self.retained()) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("failed to encode chat history: {err}");
                return;
            }
        };
        if let Err(err) = store.set(TRANSCRIPT_KEY, &encoded) {
            warn!("failed to persist chat history: {err}");
        }
    }
}
