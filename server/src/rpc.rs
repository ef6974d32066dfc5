use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rachael::{Gateway, RelayError, Upstream};
use shared::{ChatRequest, ErrorBody};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

pub(crate) const CHAT_ROUTE: &str = "/chat-with-rachael";

pub(crate) fn app<U: Upstream + 'static>(gateway: Gateway<U>) -> Router {
    // OPTIONS requests are answered by the layer itself with an empty 200.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(CHAT_ROUTE, post(chat_with_rachael::<U>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(gateway))
}

async fn chat_with_rachael<U: Upstream + 'static>(
    State(gateway): State<Arc<Gateway<U>>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let completion = gateway.relay(request).await?;

    Ok(([(CONTENT_TYPE, "application/json")], completion.into_string()).into_response())
}

#[derive(Debug)]
pub(crate) enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(%rejection, "rejected chat request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Invalid(e) => {
                warn!(error = %e, "rejected chat request");
                ApiError::BadRequest(e.to_string())
            }
            RelayError::Upstream(e) => {
                error!(error = %e, "Error in chat-with-rachael");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
