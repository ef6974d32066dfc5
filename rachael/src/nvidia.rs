use miette::{Context, IntoDiagnostic, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::APP_USER_AGENT;

pub(crate) mod completion;

pub const DEFAULT_ENDPOINT: &str = "https://integrate.api.nvidia.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta/llama-3.1-70b-instruct";

/// Everything needed to reach the upstream chat-completion service.
///
/// Built once at startup and handed to the [`Gateway`](crate::Gateway), so
/// nothing downstream reads the process environment.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("NVIDIA_API_KEY")
            .into_diagnostic()
            .wrap_err("Could not find NVIDIA_API_KEY env var")?;

        let mut config = Self::new(api_key);
        if let Ok(endpoint) = std::env::var("RACHAEL_UPSTREAM_URL") {
            config = config.with_endpoint(endpoint);
        }
        if let Ok(model) = std::env::var("RACHAEL_MODEL") {
            config = config.with_model(model);
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> Result<Client> {
        let mut headers = reqwest::header::HeaderMap::new();

        let value = format!("Bearer {}", self.api_key);
        let mut value = HeaderValue::from_str(&value)
            .into_diagnostic()
            .wrap_err("Could not create header value")?;
        value.set_sensitive(true);

        headers.insert(AUTHORIZATION, value);

        // No timeout: the upstream call waits as long as the provider takes.
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        Ok(Client {
            http,
            endpoint: self.endpoint.clone(),
        })
    }
}
