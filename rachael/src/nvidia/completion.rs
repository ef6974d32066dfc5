use async_trait::async_trait;
use serde::{de::IgnoredAny, Deserialize, Serialize};

use super::Client;
use crate::{AssembledConversation, GatewayError, GenerationParameters, Upstream};

#[derive(Serialize, Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a AssembledConversation,
    #[serde(flatten)]
    pub parameters: GenerationParameters,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionMessage {
    pub content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

// Only the part callers read; everything else in the body is relayed untouched.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionResponse {
    pub(crate) choices: Vec<CompletionChoice>,
}

/// Upstream response body, kept exactly as the provider sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion(String);

impl Completion {
    /// Accepts any JSON document. The shape is not checked here.
    pub fn parse(body: impl Into<String>) -> Result<Self, serde_json::Error> {
        let body = body.into();
        serde_json::from_str::<IgnoredAny>(&body)?;
        Ok(Self(body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Text of the first choice, if the body has one.
    pub fn reply(&self) -> Option<String> {
        let response: CompletionResponse = serde_json::from_str(&self.0).ok()?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}

#[async_trait]
impl Upstream for Client {
    async fn chat_completion(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Completion, GatewayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GatewayError::Transport)?;

        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Completion::parse(body).map_err(GatewayError::MalformedBody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, Mode};

    #[test]
    fn request_body_has_the_upstream_shape() {
        let convo = assemble("I was followed home", &[], Mode::Interview);
        let request = CompletionRequest {
            model: "meta/llama-3.1-70b-instruct",
            messages: &convo,
            parameters: Mode::Interview.parameters(),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "meta/llama-3.1-70b-instruct");
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["top_p"], 0.7);
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn reply_reads_first_choice() {
        let completion = Completion::parse(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Are you safe now?"}},{"index":1,"message":{"role":"assistant","content":"other"}}]}"#,
        )
        .unwrap();

        assert_eq!(completion.reply().as_deref(), Some("Are you safe now?"));
    }

    #[test]
    fn reply_is_none_without_choices() {
        let completion = Completion::parse(r#"{"detail":"quota exceeded"}"#).unwrap();

        assert_eq!(completion.reply(), None);
        assert_eq!(completion.as_str(), r#"{"detail":"quota exceeded"}"#);
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(Completion::parse("<html>Bad Gateway</html>").is_err());
    }
}
