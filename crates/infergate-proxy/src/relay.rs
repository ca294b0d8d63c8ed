//! Streaming relay: backend server stream to HTTP event stream.
//!
//! Each streaming request runs two halves joined by one bounded queue:
//!
//! - the receive task ([`spawn_receiver`]) pulls messages off the backend
//!   stream, decodes them into [`StreamChunk`]s and pushes them in order;
//! - the writer ([`relay_events`]) is the HTTP response body. It pops
//!   chunks, strips the stop token, and frames one event per chunk.
//!
//! When the queue closes, or a chunk marks the end of generation, the
//! writer emits a terminal event carrying the aggregated text, then
//! `[DONE]`. A final chunk also cancels the receive task. Dropping the body (client gone) cancels
//! the receive task, which drops the backend stream and ends the RPC.

use std::collections::VecDeque;
use std::convert::Infallible;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use infergate_core::{FinishReason, GatewayError, RelayState, StopTokenFilter, StreamChunk};
use infergate_rpc::ResponseStream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::models::{
    ChatChunkChoice, ChatCompletionChunk, ChatDelta, CompletionChoiceBody, CompletionChunk,
};

/// Stream terminator.
pub const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

/// What the receive task hands to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayItem {
    Chunk(StreamChunk),
    /// The backend stream failed; nothing follows.
    Failed(GatewayError),
}

/// Spawn the task that drains `stream` into a queue of `capacity` items.
///
/// Responses that `decode` maps to `None` are skipped. The queue closes on
/// backend EOF, after a failure is delivered, or when `cancel` fires.
pub fn spawn_receiver<T, F>(
    stream: ResponseStream<T>,
    decode: F,
    capacity: usize,
    cancel: CancellationToken,
) -> mpsc::Receiver<RelayItem>
where
    T: Send + 'static,
    F: Fn(T) -> Option<StreamChunk> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(receive(stream, decode, tx, cancel));
    rx
}

async fn receive<T, F>(
    mut stream: ResponseStream<T>,
    decode: F,
    tx: mpsc::Sender<RelayItem>,
    cancel: CancellationToken,
) where
    F: Fn(T) -> Option<StreamChunk>,
{
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Relay cancelled, dropping backend stream");
                return;
            }
            next = stream.next() => next,
        };

        let item = match next {
            None => {
                debug!("Backend stream finished");
                return;
            }
            Some(Ok(message)) => match decode(message) {
                Some(chunk) => RelayItem::Chunk(chunk),
                None => {
                    debug!("Skipping empty stream response");
                    continue;
                }
            },
            Some(Err(e)) => RelayItem::Failed(GatewayError::BackendRpc(e.to_string())),
        };

        let failed = matches!(item, RelayItem::Failed(_));
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Relay cancelled while queue was full");
                return;
            }
            sent = tx.send(item) => {
                if sent.is_err() {
                    return;
                }
            }
        }
        if failed {
            return;
        }
    }
}

/// Serializes relay events for one endpoint.
pub trait EventFormatter: Send + 'static {
    /// Event sent before any content, if the endpoint has one.
    fn opening(&self) -> Option<Bytes> {
        None
    }

    fn delta(&self, text: &str) -> Bytes;

    fn terminal(&self, generated_text: &str, finish_reason: FinishReason) -> Bytes;
}

/// Frame a JSON payload as one event.
pub fn frame<T: Serialize>(event: &T) -> Bytes {
    match serde_json::to_string(event) {
        Ok(payload) => Bytes::from(format!("data: {payload}\n\n")),
        Err(e) => {
            warn!(error = %e, "Failed to serialize stream event");
            error_frame(&GatewayError::Internal(e.to_string()))
        }
    }
}

/// Frame a best-effort error event.
pub fn error_frame(err: &GatewayError) -> Bytes {
    let payload = err.payload();
    let body = serde_json::json!({
        "error": {"kind": payload.kind.as_str(), "message": payload.message}
    });
    Bytes::from(format!("data: {body}\n\n"))
}

struct Relay<F> {
    rx: mpsc::Receiver<RelayItem>,
    formatter: F,
    filter: StopTokenFilter,
    state: RelayState,
    pending: VecDeque<Bytes>,
    finish_reason: Option<FinishReason>,
    cancel: CancellationToken,
    _cancel_on_drop: DropGuard,
}

impl<F: EventFormatter> Relay<F> {
    async fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Some(frame);
            }
            match self.state {
                RelayState::Open => {}
                RelayState::Draining => {
                    self.state.close();
                    return None;
                }
                RelayState::Closed => return None,
            }

            match self.rx.recv().await {
                Some(RelayItem::Chunk(chunk)) => self.accept(&chunk),
                Some(RelayItem::Failed(err)) => self.fail(&err),
                None => self.finish(),
            }
        }
    }

    fn accept(&mut self, chunk: &StreamChunk) {
        if let Some(reason) = chunk.finish_reason {
            self.finish_reason = Some(reason);
        }
        let ready = self.filter.push(&chunk.text_delta);
        if !ready.is_empty() {
            self.pending.push_back(self.formatter.delta(&ready));
        }
        if chunk.is_final {
            // Anything the backend sends after its final chunk is dropped.
            self.cancel.cancel();
            self.rx.close();
            self.finish();
        }
    }

    fn finish(&mut self) {
        if self.state.begin_draining() {
            let reason = self.finish_reason.unwrap_or(FinishReason::Stop);
            let text = self.filter.finish();
            debug!(chars = text.len(), finish_reason = %reason, "Relay complete");
            self.pending.push_back(self.formatter.terminal(text, reason));
            self.pending.push_back(Bytes::from_static(DONE_FRAME));
        }
    }

    fn fail(&mut self, err: &GatewayError) {
        if self.state.begin_draining() {
            warn!(error = %err, "Backend stream failed mid-relay");
            self.rx.close();
            self.pending.push_back(error_frame(err));
            self.pending.push_back(Bytes::from_static(DONE_FRAME));
        }
    }
}

/// Writer half of the relay, suitable as an HTTP body stream.
///
/// `cancel` is fired when the returned stream is dropped.
pub fn relay_events<F: EventFormatter>(
    rx: mpsc::Receiver<RelayItem>,
    formatter: F,
    stop_token: &str,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + use<F> {
    let mut pending = VecDeque::new();
    if let Some(opening) = formatter.opening() {
        pending.push_back(opening);
    }

    let relay = Relay {
        rx,
        formatter,
        filter: StopTokenFilter::new(stop_token),
        state: RelayState::Open,
        pending,
        finish_reason: None,
        cancel: cancel.clone(),
        _cancel_on_drop: cancel.drop_guard(),
    };

    futures_util::stream::unfold(relay, |mut relay| async move {
        let frame = relay.next_frame().await?;
        Some((Ok(frame), relay))
    })
}

/// Wrap an event stream in a `text/event-stream` response.
pub fn sse_response<S>(events: S) -> Response
where
    S: Stream<Item = Result<Bytes, Infallible>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .body(Body::from_stream(events))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

// =============================================================================
// Event formatters
// =============================================================================

/// Identity shared by every event of one response.
#[derive(Debug, Clone)]
pub struct EventMeta {
    pub id: String,
    pub created: i64,
    pub model: String,
}

impl EventMeta {
    /// Fresh response identity for `model`.
    pub fn new(model: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.to_string(),
        }
    }
}

/// Events for `POST /completions` with `stream: true`.
#[derive(Debug, Clone)]
pub struct CompletionEvents(pub EventMeta);

impl CompletionEvents {
    fn chunk(&self, text: &str, finish_reason: Option<FinishReason>) -> CompletionChunk {
        CompletionChunk {
            id: self.0.id.clone(),
            object: "text_completion".to_string(),
            created: self.0.created,
            model: self.0.model.clone(),
            choices: vec![CompletionChoiceBody {
                index: 0,
                text: text.to_string(),
                finish_reason: finish_reason.map(|r| r.as_str().to_string()),
            }],
            generated_text: None,
        }
    }
}

impl EventFormatter for CompletionEvents {
    fn delta(&self, text: &str) -> Bytes {
        frame(&self.chunk(text, None))
    }

    fn terminal(&self, generated_text: &str, finish_reason: FinishReason) -> Bytes {
        let mut chunk = self.chunk("", Some(finish_reason));
        chunk.generated_text = Some(generated_text.to_string());
        frame(&chunk)
    }
}

/// Events for `POST /chat/completions` with `stream: true`.
#[derive(Debug, Clone)]
pub struct ChatEvents(pub EventMeta);

impl ChatEvents {
    fn chunk(&self, delta: ChatDelta, finish_reason: Option<FinishReason>) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: self.0.id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: self.0.created,
            model: self.0.model.clone(),
            choices: vec![ChatChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(|r| r.as_str().to_string()),
            }],
            generated_text: None,
        }
    }
}

impl EventFormatter for ChatEvents {
    fn opening(&self) -> Option<Bytes> {
        let delta = ChatDelta {
            role: Some("assistant".to_string()),
            content: None,
        };
        Some(frame(&self.chunk(delta, None)))
    }

    fn delta(&self, text: &str) -> Bytes {
        let delta = ChatDelta {
            role: None,
            content: Some(text.to_string()),
        };
        frame(&self.chunk(delta, None))
    }

    fn terminal(&self, generated_text: &str, finish_reason: FinishReason) -> Bytes {
        let mut chunk = self.chunk(ChatDelta::default(), Some(finish_reason));
        chunk.generated_text = Some(generated_text.to_string());
        frame(&chunk)
    }
}
