//! Conversation history.

use crate::model::Message;

/// Append-only log of the turns exchanged with the model.
///
/// Replayed in full on every round so the model keeps its context. Turns are
/// never reordered or edited once pushed; the only ways to shrink the log are
/// [`clear`](Self::clear) and [`truncate`](Self::truncate) back to an earlier
/// checkpoint.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Message) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Message> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Drop every turn after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }
}
