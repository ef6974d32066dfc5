//! Client side of a conversation with Rachael.
//!
//! The relay keeps no state between calls, so whoever talks to it has to
//! carry the transcript. [`Interview`] does that bookkeeping and knows how to
//! ask for the final summary.

use async_trait::async_trait;
use miette::Diagnostic;
use shared::{ChatRequest, ChatTurn, ErrorBody};
use thiserror::Error;

use crate::{Completion, Gateway, RelayError, Upstream, APP_USER_AGENT};

pub const GREETING: &str =
    "Hi, I'm Rachael, your safety officer. Please tell me about the incident.";

pub const SUMMARY_INSTRUCTION: &str =
    "Please provide a professional summary of this incident based on our conversation.";

#[derive(Error, Diagnostic, Debug)]
pub enum TransportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Relay(#[from] RelayError),
    #[error("could not reach the relay: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay answered {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("relay sent a body that is not JSON: {0}")]
    MalformedBody(serde_json::Error),
}

#[derive(Error, Diagnostic, Debug)]
pub enum InterviewError {
    #[error("nothing to send")]
    EmptyInput,
    #[error("the interview has already been summarized")]
    Completed,
    #[error("have a conversation first before asking for a summary")]
    #[diagnostic(help("answer at least one of Rachael's questions"))]
    NothingToSummarize,
    #[error("the completion did not contain a reply")]
    MissingReply,
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),
}

/// Anything that can carry one [`ChatRequest`] to the relay and bring back
/// the upstream completion.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<Completion, TransportError>;
}

#[async_trait]
impl<U: Upstream> ChatTransport for Gateway<U> {
    async fn send(&self, request: ChatRequest) -> Result<Completion, TransportError> {
        Ok(self.relay(request).await?)
    }
}

/// Talks to a running relay server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// `url` is the full address of the chat endpoint, e.g.
    /// `http://localhost:3000/chat-with-rachael`.
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: ChatRequest) -> Result<Completion, TransportError> {
        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Completion::parse(body).map_err(TransportError::MalformedBody)
    }
}

pub struct Interview<T> {
    transport: T,
    turns: Vec<ChatTurn>,
    completed: bool,
}

impl<T: ChatTransport> Interview<T> {
    pub fn new(transport: T) -> Self {
        Self::resume(transport, Vec::new())
    }

    /// Picks up from a transcript saved earlier.
    pub fn resume(transport: T, turns: Vec<ChatTurn>) -> Self {
        Self {
            transport,
            turns,
            completed: false,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Sends the reporter's answer and returns Rachael's next question.
    ///
    /// The answer stays in the transcript even when the call fails.
    pub async fn send(&mut self, input: &str) -> Result<String, InterviewError> {
        if self.completed {
            return Err(InterviewError::Completed);
        }
        if input.trim().is_empty() {
            return Err(InterviewError::EmptyInput);
        }

        let history = self.turns.clone();
        self.turns.push(ChatTurn::user(input));

        let completion = self
            .transport
            .send(ChatRequest::interview(input, history))
            .await?;
        let reply = completion.reply().ok_or(InterviewError::MissingReply)?;

        self.turns.push(ChatTurn::assistant(reply.clone()));
        Ok(reply)
    }

    pub async fn summarize(&mut self) -> Result<String, InterviewError> {
        if self.completed {
            return Err(InterviewError::Completed);
        }
        if self.turns.is_empty() {
            return Err(InterviewError::NothingToSummarize);
        }

        let completion = self
            .transport
            .send(ChatRequest::summary(SUMMARY_INSTRUCTION, self.turns.clone()))
            .await?;
        let summary = completion.reply().ok_or(InterviewError::MissingReply)?;

        self.completed = true;
        Ok(summary)
    }
}
