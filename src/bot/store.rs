use std::collections::HashMap;

use crate::nim::{ChatMessage, Role};

/// In-memory conversation history, one chronological transcript per
/// Telegram user. Owned by the dispatch loop, which handles updates one
/// at a time, so no synchronization is needed. Nothing survives a
/// restart.
///
/// Storage is unbounded; callers bound what they read with
/// `context_window`.
#[derive(Default)]
pub struct ConversationStore {
    conversations: HashMap<i64, Vec<ChatMessage>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, user_id: i64, role: Role, text: &str) {
        self.conversations
            .entry(user_id)
            .or_default()
            .push(ChatMessage::new(role, text));
    }

    /// Clear the user's history to empty (and create it if absent).
    pub fn reset(&mut self, user_id: i64) {
        self.conversations.insert(user_id, Vec::new());
    }

    pub fn history(&self, user_id: i64) -> &[ChatMessage] {
        self.conversations
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The most recent `n` turns, oldest first.
    pub fn context_window(&self, user_id: i64, n: usize) -> &[ChatMessage] {
        let history = self.history(user_id);
        &history[history.len().saturating_sub(n)..]
    }
}
