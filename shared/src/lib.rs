use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of a `POST /chat-with-rachael` call.
///
/// `history` holds every turn before `message`, oldest first, and never the
/// system turn; the relay injects that itself.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    #[serde(
        rename = "isSummaryRequest",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_summary_request: bool,
}

impl ChatRequest {
    pub fn interview(message: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            message: message.into(),
            history,
            is_summary_request: false,
        }
    }

    pub fn summary(message: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            message: message.into(),
            history,
            is_summary_request: true,
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.message.trim().is_empty() {
            return Err(RequestError::EmptyMessage);
        }

        if let Some(index) = self
            .history
            .iter()
            .position(|turn| turn.role == Role::System)
        {
            return Err(RequestError::SystemTurnInHistory { index });
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("history[{index}] is a system turn; the system turn is added by the relay")]
    #[diagnostic(help("send only user and assistant turns in `history`"))]
    SystemTurnInHistory { index: usize },
}
