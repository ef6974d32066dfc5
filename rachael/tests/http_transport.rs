use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use rachael::{
    ChatRequest, ChatTransport, ChatTurn, HttpTransport, Interview, InterviewError,
    TransportError,
};

const REPLY: &str = r#"{"choices":[{"message":{"role":"assistant","content":"When did this happen?"}}],  "id":"chat-7"}"#;

#[derive(Clone)]
struct FakeRelay {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<ChatRequest>>>,
}

async fn chat_with_rachael(
    State(relay): State<FakeRelay>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, &'static str) {
    relay.seen.lock().unwrap().push(request);

    (relay.status, relay.body)
}

fn spawn_relay(status: StatusCode, body: &'static str) -> (HttpTransport, FakeRelay) {
    let relay = FakeRelay {
        status,
        body,
        seen: Arc::default(),
    };
    let app = Router::new()
        .route("/chat-with-rachael", post(chat_with_rachael))
        .with_state(relay.clone());

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service()),
    );

    let transport = HttpTransport::new(format!("http://{addr}/chat-with-rachael")).unwrap();
    (transport, relay)
}

#[tokio::test]
async fn success_body_comes_back_verbatim() {
    let (transport, relay) = spawn_relay(StatusCode::OK, REPLY);

    let completion = transport
        .send(ChatRequest::interview("I was followed home", vec![]))
        .await
        .unwrap();

    assert_eq!(completion.as_str(), REPLY);
    assert_eq!(completion.reply().as_deref(), Some("When did this happen?"));
    let seen = relay.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], ChatRequest::interview("I was followed home", vec![]));
}

#[tokio::test]
async fn error_body_is_decoded_into_rejected() {
    let (transport, _relay) = spawn_relay(
        StatusCode::BAD_REQUEST,
        r#"{"error":"message must not be empty"}"#,
    );

    let err = transport
        .send(ChatRequest::interview("hello", vec![]))
        .await
        .unwrap_err();

    match err {
        TransportError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "message must not be empty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_error_body_is_kept_raw() {
    let (transport, _relay) = spawn_relay(StatusCode::INTERNAL_SERVER_ERROR, "relay fell over");

    let err = transport
        .send(ChatRequest::interview("hello", vec![]))
        .await
        .unwrap_err();

    match err {
        TransportError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "relay fell over");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn success_body_that_is_not_json_is_malformed() {
    let (transport, _relay) = spawn_relay(StatusCode::OK, "<html>hello</html>");

    let err = transport
        .send(ChatRequest::interview("hello", vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::MalformedBody(_)));
}

#[tokio::test]
async fn interview_over_http_keeps_the_answer_on_rejection() {
    let (transport, relay) = spawn_relay(StatusCode::BAD_GATEWAY, r#"{"error":"upstream down"}"#);
    let mut interview = Interview::new(transport);

    let err = interview.send("I was followed").await.unwrap_err();

    assert!(matches!(
        err,
        InterviewError::Transport(TransportError::Rejected { status: 502, .. })
    ));
    assert_eq!(interview.turns(), &[ChatTurn::user("I was followed")]);
    assert_eq!(relay.seen.lock().unwrap().len(), 1);
}
