//! Rachael: a stateless relay that interviews someone reporting a safety
//! incident and writes up a summary through a hosted chat-completion model.
//!
//! The pieces run in a straight line for every call: [`assemble`] builds the
//! message list from the client's transcript, then [`Gateway::complete`]
//! sends it upstream once and hands the body back untouched.

pub use shared::{ChatRequest, ChatTurn, ErrorBody, RequestError, Role};

pub use crate::error::{GatewayError, RelayError};
pub use crate::gateway::{Gateway, Upstream};
pub use crate::interview::{ChatTransport, HttpTransport, Interview, InterviewError, TransportError};
pub use crate::mode::{GenerationParameters, Mode, Profile};
pub use crate::nvidia::completion::{Completion, CompletionRequest};
pub use crate::nvidia::{Client as NvidiaClient, Config};
pub use crate::transcript::{assemble, AssembledConversation};

mod error;
mod gateway;
pub mod interview;
mod mode;
pub mod nvidia;
mod transcript;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
