use serde::Serialize;
use shared::ChatTurn;

use crate::Mode;

/// The exact message list sent upstream: system directive, prior turns,
/// newest user turn. Order matters to the model and is never changed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AssembledConversation(Vec<ChatTurn>);

impl AssembledConversation {
    pub fn turns(&self) -> &[ChatTurn] {
        &self.0
    }

    pub fn into_turns(self) -> Vec<ChatTurn> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn assemble(message: &str, history: &[ChatTurn], mode: Mode) -> AssembledConversation {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::system(mode.directive()));
    turns.extend_from_slice(history);
    turns.push(ChatTurn::user(message));

    AssembledConversation(turns)
}
