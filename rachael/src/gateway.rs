use async_trait::async_trait;
use shared::ChatRequest;
use tracing::{debug, info, warn};

use crate::{
    assemble, AssembledConversation, Completion, CompletionRequest, Config, GatewayError, Mode,
    RelayError,
};

/// Something that can answer one chat-completion request.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn chat_completion(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Completion, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct Gateway<U = crate::nvidia::Client> {
    model: String,
    upstream: U,
}

impl Gateway {
    pub fn new(config: &Config) -> miette::Result<Self> {
        Ok(Self::with_upstream(config.model(), config.client()?))
    }
}

impl<U: Upstream> Gateway<U> {
    pub fn with_upstream(model: impl Into<String>, upstream: U) -> Self {
        Self {
            model: model.into(),
            upstream,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// One upstream call, no retry. The body comes back exactly as sent.
    pub async fn complete(
        &self,
        conversation: &AssembledConversation,
        mode: Mode,
    ) -> Result<Completion, GatewayError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: conversation,
            parameters: mode.parameters(),
        };

        debug!(?mode, turns = conversation.len(), "sending chat completion");

        match self.upstream.chat_completion(&request).await {
            Ok(completion) => {
                info!(bytes = completion.as_str().len(), "upstream response");
                debug!(response = completion.as_str(), "upstream response body");
                Ok(completion)
            }
            Err(error) => {
                warn!(%error, "upstream call failed");
                Err(error)
            }
        }
    }

    /// Validates, assembles and completes a request from a client.
    ///
    /// Invalid requests are turned away before anything goes over the network.
    pub async fn relay(&self, request: ChatRequest) -> Result<Completion, RelayError> {
        request.validate()?;

        let mode = Mode::from(request.is_summary_request);
        let conversation = assemble(&request.message, &request.history, mode);

        Ok(self.complete(&conversation, mode).await?)
    }
}
