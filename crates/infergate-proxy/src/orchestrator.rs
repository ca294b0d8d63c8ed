//! Candidate orchestration for non-streaming requests.
//!
//! A request for `n` choices becomes `n` sequential unary backend calls.
//! Call `i` fills choice `i`. The first failure aborts the request and every
//! choice gathered so far is discarded.

use std::future::Future;

use infergate_core::{CompletionChoice, GatewayError, Usage};
use infergate_rpc::InferenceBackend;
use infergate_rpc::proto::{chat, completion};
use tracing::{debug, warn};

use crate::error::backend_error;
use crate::translate::{
    ChatChoice, decode_chat_choice, decode_chat_usage, decode_completion_choice,
    decode_completion_usage,
};

/// Ordered choices plus usage summed across every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates<C> {
    pub choices: Vec<C>,
    pub usage: Usage,
}

async fn collect_candidates<C, Fut>(
    n: u32,
    mut call: impl FnMut(u32) -> Fut,
) -> Result<Candidates<C>, GatewayError>
where
    Fut: Future<Output = Result<(C, Usage), GatewayError>>,
{
    let mut choices = Vec::with_capacity(n as usize);
    let mut usage = Usage::default();

    for index in 0..n {
        let (choice, call_usage) = call(index).await.inspect_err(|e| {
            warn!(
                candidate = index,
                requested = n,
                error = %e,
                "Candidate call failed, discarding partial results"
            );
        })?;
        usage.accumulate(&call_usage);
        choices.push(choice);
    }

    debug!(candidates = n, total_tokens = usage.total_tokens, "Candidates collected");
    Ok(Candidates { choices, usage })
}

/// Run `n` text completions against one backend connection.
pub async fn complete_n(
    backend: &dyn InferenceBackend,
    request: &completion::CompletionRequest,
    n: u32,
    model: &str,
    stop_token: &str,
) -> Result<Candidates<CompletionChoice>, GatewayError> {
    collect_candidates(n, |index| async move {
        let response = backend
            .complete(request.clone())
            .await
            .map_err(|e| backend_error(model, e))?;
        let choice = response.choices.first().ok_or_else(|| {
            GatewayError::BackendRpc("backend returned no completion choices".into())
        })?;
        Ok((
            decode_completion_choice(choice, index, stop_token),
            decode_completion_usage(response.usage.as_ref()),
        ))
    })
    .await
}

/// Run `n` chat completions against one backend connection.
pub async fn chat_complete_n(
    backend: &dyn InferenceBackend,
    request: &chat::ChatCompletionRequest,
    n: u32,
    model: &str,
    stop_token: &str,
) -> Result<Candidates<ChatChoice>, GatewayError> {
    collect_candidates(n, |index| async move {
        let response = backend
            .chat_complete(request.clone())
            .await
            .map_err(|e| backend_error(model, e))?;
        let choice = response.choices.first().ok_or_else(|| {
            GatewayError::BackendRpc("backend returned no chat choices".into())
        })?;
        Ok((
            decode_chat_choice(choice, index, stop_token)?,
            decode_chat_usage(response.usage.as_ref()),
        ))
    })
    .await
}
