use serde::{Deserialize, Serialize};

use crate::{answers::PartialAnswers, step::StepId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Everything one dialogue instance knows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub current_step: StepId,
    pub transcript: Vec<Message>,
    pub answers: PartialAnswers,
    pub is_terminal: bool,
}

impl ConversationState {
    /// Fresh state at the initial step with `greeting` as the only message
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            current_step: StepId::initial(),
            transcript: vec![Message::bot(greeting)],
            answers: PartialAnswers::default(),
            is_terminal: false,
        }
    }

    pub fn last_bot_message(&self) -> Option<&Message> {
        self.transcript
            .iter()
            .rev()
            .find(|message| message.sender == Sender::Bot)
    }

    pub fn last_messages(&self, n: usize) -> &[Message] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }
}
