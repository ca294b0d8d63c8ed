//! `completion` package.

use std::collections::HashMap;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CompletionRequest {
    #[prost(string, tag = "1")]
    pub prompt: String,
    #[prost(string, optional, tag = "2")]
    pub suffix: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub max_new_tokens: Option<i32>,
    #[prost(float, optional, tag = "4")]
    pub temperature: Option<f32>,
    #[prost(int32, optional, tag = "5")]
    pub top_k: Option<i32>,
    #[prost(float, optional, tag = "6")]
    pub top_p: Option<f32>,
    #[prost(bool, optional, tag = "7")]
    pub do_sample: Option<bool>,
    #[prost(int32, optional, tag = "8")]
    pub n: Option<i32>,
    #[prost(int32, optional, tag = "9")]
    pub logprobs: Option<i32>,
    #[prost(bool, optional, tag = "10")]
    pub echo: Option<bool>,
    #[prost(string, repeated, tag = "11")]
    pub stop: Vec<String>,
    #[prost(float, optional, tag = "12")]
    pub repetition_penalty: Option<f32>,
    #[prost(float, optional, tag = "13")]
    pub presence_penalty: Option<f32>,
    #[prost(float, optional, tag = "14")]
    pub frequence_penalty: Option<f32>,
    /// String-typed on the wire; carries the decimal candidate count.
    #[prost(string, optional, tag = "15")]
    pub best_of: Option<String>,
    #[prost(map = "string, int32", tag = "16")]
    pub logit_bias: HashMap<String, i32>,
    #[prost(bool, optional, tag = "17")]
    pub return_full_text: Option<bool>,
    #[prost(bool, optional, tag = "18")]
    pub truncate: Option<bool>,
    #[prost(float, optional, tag = "19")]
    pub typical_p: Option<f32>,
    #[prost(bool, optional, tag = "20")]
    pub watermark: Option<bool>,
    #[prost(int32, optional, tag = "21")]
    pub seed: Option<i32>,
    #[prost(string, optional, tag = "22")]
    pub user: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CompletionFinishReason {
    None = 0,
    Stop = 1,
    Length = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CompletionChoice {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(int32, tag = "2")]
    pub index: i32,
    #[prost(enumeration = "CompletionFinishReason", tag = "3")]
    pub finish_reason: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct CompletionUsage {
    #[prost(int32, tag = "1")]
    pub prompt_tokens: i32,
    #[prost(int32, tag = "2")]
    pub completion_tokens: i32,
    #[prost(int32, tag = "3")]
    pub total_tokens: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CompletionResponse {
    #[prost(message, repeated, tag = "1")]
    pub choices: Vec<CompletionChoice>,
    #[prost(message, optional, tag = "2")]
    pub usage: Option<CompletionUsage>,
}
