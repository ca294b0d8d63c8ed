//! End-to-end tests for the gateway router against in-process backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures_util::StreamExt;
use futures_util::stream;
use http_body_util::BodyExt;
use infergate_core::{
    ApiKeyError, ApiKeyStore, ChatLogError, ChatLogPort, ChatMessage, ModelEntry, ModelSnapshot,
    SnapshotRegistry,
};
use infergate_proxy::{GatewayContext, create_router};
use infergate_rpc::proto::chat::{
    ChatCompletionChoice, ChatCompletionFinishReason, ChatCompletionRequest,
    ChatCompletionResponse, ChatItem, ChatRole,
};
use infergate_rpc::proto::completion::{
    CompletionChoice, CompletionFinishReason, CompletionRequest, CompletionResponse,
};
use infergate_rpc::proto::embeddings::{Embedding, EmbeddingRequest, EmbeddingResponse};
use infergate_rpc::{BackendConnector, InferenceBackend, ResponseStream, RpcError};
use tower::ServiceExt;

// =============================================================================
// Fakes
// =============================================================================

/// What a fake backend answers with.
#[derive(Debug, Clone, Default)]
struct Script {
    chat_reply: String,
    stream_deltas: Vec<String>,
}

#[derive(Debug, Default)]
struct FakeConnector {
    script: Script,
    connects: AtomicUsize,
    addresses: Mutex<Vec<String>>,
    chat_requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl FakeConnector {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            ..Default::default()
        })
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendConnector for FakeConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn InferenceBackend>, RpcError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().unwrap().push(address.to_string());
        Ok(Box::new(FakeBackend {
            script: self.script.clone(),
            chat_requests: Arc::clone(&self.chat_requests),
        }))
    }
}

struct FakeBackend {
    script: Script,
    chat_requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

fn text_choice(text: &str, finish_reason: CompletionFinishReason) -> CompletionResponse {
    CompletionResponse {
        choices: vec![CompletionChoice {
            text: text.to_string(),
            index: 0,
            finish_reason: finish_reason as i32,
        }],
        usage: None,
    }
}

fn chat_choice(text: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        choices: vec![ChatCompletionChoice {
            index: 0,
            chat_item: Some(ChatItem {
                role: ChatRole::Assistant as i32,
                content: text.to_string(),
            }),
            finish_reason: ChatCompletionFinishReason::None as i32,
        }],
        ..Default::default()
    }
}

#[async_trait]
impl InferenceBackend for FakeBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, RpcError> {
        Ok(text_choice(
            &format!("echo: {}<|im_end|>", request.prompt),
            CompletionFinishReason::Stop,
        ))
    }

    async fn complete_stream(
        &self,
        _request: CompletionRequest,
    ) -> Result<ResponseStream<CompletionResponse>, RpcError> {
        let items: Vec<Result<CompletionResponse, RpcError>> = self
            .script
            .stream_deltas
            .iter()
            .map(|d| Ok(text_choice(d, CompletionFinishReason::None)))
            .collect();
        Ok(stream::iter(items).boxed())
    }

    async fn chat_complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, RpcError> {
        self.chat_requests.lock().unwrap().push(request);
        Ok(chat_choice(&self.script.chat_reply))
    }

    async fn chat_complete_stream(
        &self,
        _request: ChatCompletionRequest,
    ) -> Result<ResponseStream<ChatCompletionResponse>, RpcError> {
        let items: Vec<Result<ChatCompletionResponse, RpcError>> = self
            .script
            .stream_deltas
            .iter()
            .map(|d| Ok(chat_choice(d)))
            .collect();
        Ok(stream::iter(items).boxed())
    }

    async fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, RpcError> {
        Ok(EmbeddingResponse {
            embeddings: request
                .inputs
                .iter()
                .map(|text| Embedding {
                    embedding: vec![text.len() as f32, 0.5],
                })
                .collect(),
        })
    }
}

#[derive(Debug, Default)]
struct RecordingChatLog {
    saved: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ChatLogPort for RecordingChatLog {
    async fn save(
        &self,
        username: &str,
        model_name: &str,
        _messages: &[ChatMessage],
        response: &str,
    ) -> Result<(), ChatLogError> {
        self.saved.lock().unwrap().push((
            username.to_string(),
            model_name.to_string(),
            response.to_string(),
        ));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StaticKeys {
    keys: HashMap<String, String>,
}

#[async_trait]
impl ApiKeyStore for StaticKeys {
    async fn identify(&self, api_key: &str) -> Result<Option<String>, ApiKeyError> {
        Ok(self.keys.get(api_key).cloned())
    }

    async fn register(&self, username: &str, api_key: &str) -> Result<(), ApiKeyError> {
        let _ = (username, api_key);
        Err(ApiKeyError::Database("read-only".into()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn registry() -> Arc<SnapshotRegistry> {
    let entry = |name: &str, address: &str| ModelEntry {
        name: name.to_string(),
        address: address.to_string(),
        owned_by: "infergate".to_string(),
        description: format!("{name} test model"),
        tasks: ["chat".to_string(), "completion".to_string()]
            .into_iter()
            .collect(),
        permission: Vec::new(),
    };
    Arc::new(SnapshotRegistry::new(ModelSnapshot::from_entries([
        entry("llama", "llama.internal:50051"),
        entry("mistral", "mistral.internal:50051"),
    ])))
}

fn gateway(connector: &Arc<FakeConnector>) -> GatewayContext {
    GatewayContext::new(registry(), Arc::clone(connector) as Arc<dyn BackendConnector>)
}

fn router(context: GatewayContext) -> Router {
    create_router(Arc::new(context), "/openai")
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Split an event-stream body into payloads, checking the framing.
fn events(body: &[u8]) -> Vec<String> {
    let text = std::str::from_utf8(body).unwrap();
    assert!(text.ends_with("\n\n"), "unterminated stream: {text:?}");
    text.trim_end_matches("\n\n")
        .split("\n\n")
        .map(|frame| {
            frame
                .strip_prefix("data: ")
                .unwrap_or_else(|| panic!("bad frame: {frame:?}"))
                .to_string()
        })
        .collect()
}

// =============================================================================
// Models
// =============================================================================

#[tokio::test]
async fn test_list_models_sorted() {
    let connector = FakeConnector::new(Script::default());
    let (status, json) = send_json(router(gateway(&connector)), get("/openai/models")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["object"], "list");
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["llama", "mistral"]);
    assert_eq!(json["data"][0]["owned_by"], "infergate");
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_get_unknown_model_is_404() {
    let connector = FakeConnector::new(Script::default());
    let (status, json) = send_json(router(gateway(&connector)), get("/openai/models/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["kind"], "model_not_found");
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_unknown_model_never_dials() {
    let connector = FakeConnector::new(Script::default());
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({"model": "ghost", "messages": [{"role": "user", "content": "hi"}]}),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["kind"], "model_not_found");
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_chat_hello_scenario() {
    let connector = FakeConnector::new(Script {
        chat_reply: "hello<|im_end|>".into(),
        ..Default::default()
    });
    let chat_log = Arc::new(RecordingChatLog::default());
    let context = gateway(&connector).with_chat_log(chat_log.clone());
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({"model": "llama", "messages": [{"role": "user", "content": "hi"}]}),
    );

    let (status, json) = send_json(router(context), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["object"], "chat.completion");
    assert_eq!(json["model"], "llama");
    assert_eq!(json["choices"].as_array().unwrap().len(), 1);
    assert_eq!(json["choices"][0]["index"], 0);
    assert_eq!(json["choices"][0]["message"]["role"], "assistant");
    assert_eq!(json["choices"][0]["message"]["content"], "hello");

    assert_eq!(connector.addresses.lock().unwrap().as_slice(), ["llama.internal:50051"]);
    let sent = connector.chat_requests.lock().unwrap();
    assert_eq!(sent[0].chat_items[0].role, ChatRole::User as i32);
    assert_eq!(sent[0].chat_items[0].content, "hi");

    let saved = chat_log.saved.lock().unwrap();
    assert_eq!(
        saved.as_slice(),
        [("anonymous".to_string(), "llama".to_string(), "hello".to_string())]
    );
}

#[tokio::test]
async fn test_invalid_role_is_rejected_before_dialing() {
    let connector = FakeConnector::new(Script::default());
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({"model": "llama", "messages": [{"role": "chat", "content": "hi"}]}),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["kind"], "invalid_request_shape");
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_chat_accepts_null_content() {
    let connector = FakeConnector::new(Script {
        chat_reply: "ok".into(),
        ..Default::default()
    });
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({
            "model": "llama",
            "messages": [
                {"role": "user", "content": "call it"},
                {"role": "assistant", "content": null},
                {"role": "function", "content": "42"}
            ]
        }),
    );

    let (status, _) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::OK);
    let sent = connector.chat_requests.lock().unwrap();
    assert_eq!(sent[0].chat_items.len(), 3);
    assert_eq!(sent[0].chat_items[1].role, ChatRole::Assistant as i32);
    assert_eq!(sent[0].chat_items[1].content, "");
}

#[tokio::test]
async fn test_chat_n_makes_one_call_per_choice() {
    let connector = FakeConnector::new(Script {
        chat_reply: "ok".into(),
        ..Default::default()
    });
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({
            "model": "llama",
            "n": 3,
            "messages": [{"role": "user", "content": "hi"}]
        }),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::OK);
    let indices: Vec<u64> = json["choices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
    let sent = connector.chat_requests.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|r| r.n.is_none()));
    assert_eq!(connector.connects(), 1);
}

#[tokio::test]
async fn test_chat_stream_relays_content() {
    let connector = FakeConnector::new(Script {
        stream_deltas: vec!["Hel".into(), "lo".into(), "<|im_end|>".into()],
        ..Default::default()
    });
    let request = post_json(
        "/openai/chat/completions",
        serde_json::json!({
            "model": "llama",
            "stream": true,
            "messages": [{"role": "user", "content": "hi"}]
        }),
    );

    let response = router(gateway(&connector)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let events = events(&body);

    assert_eq!(events.len(), 5);
    let opening: serde_json::Value = serde_json::from_str(&events[0]).unwrap();
    assert_eq!(opening["choices"][0]["delta"]["role"], "assistant");
    let terminal: serde_json::Value = serde_json::from_str(&events[3]).unwrap();
    assert_eq!(terminal["generated_text"], "Hello");
    assert_eq!(terminal["choices"][0]["finish_reason"], "stop");
    assert_eq!(events[4], "[DONE]");
}

// =============================================================================
// Completions
// =============================================================================

#[tokio::test]
async fn test_completion_stream_scenario() {
    let connector = FakeConnector::new(Script {
        stream_deltas: vec![
            "The".into(),
            " answer".into(),
            " is 4".into(),
            "<|im_end|>".into(),
        ],
        ..Default::default()
    });
    let request = post_json(
        "/openai/completions",
        serde_json::json!({"model": "llama", "prompt": "2+2?", "stream": true}),
    );

    let (status, body) = send(router(gateway(&connector)), request).await;
    assert_eq!(status, StatusCode::OK);

    let events = events(&body);
    assert_eq!(events.len(), 5);

    let mut streamed = String::new();
    for (event, expected) in events[..3].iter().zip(["The", " answer", " is 4"]) {
        let chunk: serde_json::Value = serde_json::from_str(event).unwrap();
        assert_eq!(chunk["object"], "text_completion");
        assert_eq!(chunk["choices"][0]["text"], expected);
        assert!(chunk.get("generated_text").is_none());
        streamed.push_str(expected);
    }

    let terminal: serde_json::Value = serde_json::from_str(&events[3]).unwrap();
    assert_eq!(terminal["generated_text"], "The answer is 4");
    assert_eq!(terminal["generated_text"], streamed.as_str());
    assert_eq!(events[4], "[DONE]");
    assert!(!String::from_utf8_lossy(&body).contains("<|im_end|>"));
}

#[tokio::test]
async fn test_completion_stream_ends_at_stop_marker() {
    let connector = FakeConnector::new(Script {
        stream_deltas: vec!["Hi".into(), "<|im_end|>".into(), " leaked".into()],
        ..Default::default()
    });
    let request = post_json(
        "/openai/completions",
        serde_json::json!({"model": "llama", "prompt": "hey", "stream": true}),
    );

    let (status, body) = send(router(gateway(&connector)), request).await;
    assert_eq!(status, StatusCode::OK);

    let events = events(&body);
    assert_eq!(events.len(), 3);
    let terminal: serde_json::Value = serde_json::from_str(&events[1]).unwrap();
    assert_eq!(terminal["generated_text"], "Hi");
    assert_eq!(events[2], "[DONE]");
    assert!(!String::from_utf8_lossy(&body).contains("leaked"));
}

#[tokio::test]
async fn test_completion_unary_strips_stop_token() {
    let connector = FakeConnector::new(Script::default());
    let request = post_json(
        "/openai/completions",
        serde_json::json!({"model": "llama", "prompt": "ping", "n": 2}),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["object"], "text_completion");
    let choices = json["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 2);
    assert_eq!(choices[1]["index"], 1);
    assert_eq!(choices[1]["text"], "echo: ping");
    assert_eq!(choices[1]["finish_reason"], "stop");
}

#[tokio::test]
async fn test_non_integer_logit_bias_is_translation_error() {
    let connector = FakeConnector::new(Script::default());
    let request = post_json(
        "/openai/completions",
        serde_json::json!({"model": "llama", "prompt": "x", "logit_bias": {"50256": 1.5}}),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["kind"], "translation_error");
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_request() {
    let connector = FakeConnector::new(Script::default());
    let request = post_json(
        "/openai/completions",
        serde_json::json!({"model": "llama", "prompt": "x", "temperature": "hot"}),
    );

    let (status, json) = send_json(router(gateway(&connector)), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["kind"], "invalid_request_shape");
}

// =============================================================================
// Embeddings
// =============================================================================

#[tokio::test]
async fn test_embeddings_accept_string_and_array() {
    let connector = FakeConnector::new(Script::default());

    let (status, json) = send_json(
        router(gateway(&connector)),
        post_json(
            "/openai/embeddings",
            serde_json::json!({"model": "llama", "input": "abc"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["object"], "embedding");

    let (status, json) = send_json(
        router(gateway(&connector)),
        post_json(
            "/openai/embeddings",
            serde_json::json!({"model": "llama", "input": ["a", "bb"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][1]["index"], 1);
    assert_eq!(json["data"][1]["embedding"][0], 2.0);
}

#[tokio::test]
async fn test_embeddings_reject_other_shapes() {
    let connector = FakeConnector::new(Script::default());

    for input in [
        serde_json::json!(42),
        serde_json::json!([1, 2, 3]),
        serde_json::json!([["a"]]),
        serde_json::json!({"text": "a"}),
    ] {
        let (status, json) = send_json(
            router(gateway(&connector)),
            post_json(
                "/openai/embeddings",
                serde_json::json!({"model": "llama", "input": input}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {input} accepted");
        assert_eq!(json["error"]["kind"], "invalid_request_shape");
    }
    assert_eq!(connector.connects(), 0);
}

#[tokio::test]
async fn test_engine_embeddings_use_path_model() {
    let connector = FakeConnector::new(Script::default());

    let (status, json) = send_json(
        router(gateway(&connector)),
        post_json(
            "/openai/engines/mistral/embeddings",
            serde_json::json!({"model": "llama", "input": "abc"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["model"], "mistral");
    assert_eq!(
        connector.addresses.lock().unwrap().as_slice(),
        ["mistral.internal:50051"]
    );
}

// =============================================================================
// Authentication
// =============================================================================

fn authenticated(connector: &Arc<FakeConnector>, chat_log: Arc<RecordingChatLog>) -> Router {
    let keys = StaticKeys {
        keys: HashMap::from([("good-key".to_string(), "alice".to_string())]),
    };
    router(
        gateway(connector)
            .with_api_keys(Arc::new(keys))
            .with_chat_log(chat_log),
    )
}

#[tokio::test]
async fn test_auth_rejections() {
    let connector = FakeConnector::new(Script::default());
    let cases = [
        (None, "Authorization header missing"),
        (Some("Basic good-key"), "Invalid authorization format"),
        (Some("Bearer wrong-key"), "Invalid API key"),
    ];

    for (header_value, message) in cases {
        let mut builder = Request::builder().uri("/openai/models");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let app = authenticated(&connector, Arc::default());
        let (status, json) = send_json(app, builder.body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["kind"], "unauthorized");
        assert_eq!(json["error"]["message"], message);
    }
}

#[tokio::test]
async fn test_authenticated_user_is_recorded() {
    let connector = FakeConnector::new(Script {
        chat_reply: "hi alice".into(),
        ..Default::default()
    });
    let chat_log = Arc::new(RecordingChatLog::default());
    let mut request = post_json(
        "/openai/chat/completions",
        serde_json::json!({"model": "llama", "messages": [{"role": "user", "content": "hi"}]}),
    );
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer good-key".parse().unwrap());

    let (status, _) = send_json(authenticated(&connector, chat_log.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat_log.saved.lock().unwrap()[0].0, "alice");
}

#[tokio::test]
async fn test_healthz_skips_auth() {
    let connector = FakeConnector::new(Script::default());
    let (status, _) = send(authenticated(&connector, Arc::default()), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
}
