use miette::Diagnostic;
use shared::RequestError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum GatewayError {
    #[error("upstream request failed: {0}")]
    #[diagnostic(code(rachael::gateway::transport))]
    Transport(reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    #[diagnostic(code(rachael::gateway::status))]
    UpstreamStatus { status: u16, body: String },
    #[error("upstream returned a body that is not JSON: {0}")]
    #[diagnostic(code(rachael::gateway::malformed))]
    MalformedBody(serde_json::Error),
}

/// Anything that can go wrong between receiving a [`shared::ChatRequest`]
/// and handing back a completion.
#[derive(Error, Diagnostic, Debug)]
pub enum RelayError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] RequestError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Upstream(#[from] GatewayError),
}
