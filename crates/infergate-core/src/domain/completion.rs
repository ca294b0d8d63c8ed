//! Completion domain types: sampling parameters, choices and usage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sampling parameters shared by chat and text completion requests.
///
/// Optional numeric fields are tri-state: `None` means the caller did not
/// set the value and the backend must apply its own default. They are
/// never collapsed to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingParameters {
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub stop: Vec<String>,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub best_of: Option<i32>,
    /// Token-id (opaque string) to integer bias.
    pub logit_bias: BTreeMap<String, i32>,
    /// Requested candidate count; see [`SamplingParameters::candidates`].
    pub n: Option<u32>,
    pub stream: bool,
    pub user: Option<String>,
}

impl SamplingParameters {
    /// Number of candidates to generate. Unset and zero both mean one.
    #[must_use]
    pub fn candidates(&self) -> u32 {
        match self.n {
            None | Some(0) => 1,
            Some(n) => n,
        }
    }
}

/// Why the backend stopped generating a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    Stop,
    Length,
}

impl FinishReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generated text candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChoice {
    pub index: u32,
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

/// Token accounting reported by a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Add another call's usage to this one.
    pub const fn accumulate(&mut self, other: &Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self
            .completion_tokens
            .saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}
