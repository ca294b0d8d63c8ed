//! `chat` package.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ChatRole {
    User = 0,
    System = 1,
    Function = 2,
    Assistant = 3,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ChatItem {
    #[prost(enumeration = "ChatRole", tag = "1")]
    pub role: i32,
    #[prost(string, tag = "2")]
    pub content: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChatCompletionRequest {
    #[prost(message, repeated, tag = "1")]
    pub chat_items: Vec<ChatItem>,
    #[prost(int32, optional, tag = "2")]
    pub max_new_tokens: Option<i32>,
    #[prost(float, optional, tag = "3")]
    pub temperature: Option<f32>,
    #[prost(int32, optional, tag = "4")]
    pub top_k: Option<i32>,
    #[prost(float, optional, tag = "5")]
    pub top_p: Option<f32>,
    #[prost(bool, optional, tag = "6")]
    pub do_sample: Option<bool>,
    #[prost(int32, optional, tag = "7")]
    pub n: Option<i32>,
    #[prost(string, repeated, tag = "8")]
    pub stop: Vec<String>,
    #[prost(float, optional, tag = "9")]
    pub repetition_penalty: Option<f32>,
    #[prost(float, optional, tag = "10")]
    pub presence_penalty: Option<f32>,
    #[prost(float, optional, tag = "11")]
    pub frequence_penalty: Option<f32>,
    #[prost(string, optional, tag = "12")]
    pub best_of: Option<String>,
    #[prost(map = "string, int32", tag = "13")]
    pub logit_bias: HashMap<String, i32>,
    #[prost(bool, optional, tag = "14")]
    pub return_full_text: Option<bool>,
    #[prost(bool, optional, tag = "15")]
    pub truncate: Option<bool>,
    #[prost(float, optional, tag = "16")]
    pub typical_p: Option<f32>,
    #[prost(bool, optional, tag = "17")]
    pub watermark: Option<bool>,
    #[prost(int32, optional, tag = "18")]
    pub seed: Option<i32>,
    #[prost(string, optional, tag = "19")]
    pub user: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ChatCompletionFinishReason {
    None = 0,
    Stop = 1,
    Length = 2,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ChatCompletionChoice {
    #[prost(int32, tag = "1")]
    pub index: i32,
    #[prost(message, optional, tag = "2")]
    pub chat_item: Option<ChatItem>,
    #[prost(enumeration = "ChatCompletionFinishReason", tag = "3")]
    pub finish_reason: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Usage {
    #[prost(int32, tag = "1")]
    pub prompt_tokens: i32,
    #[prost(int32, tag = "2")]
    pub completion_tokens: i32,
    #[prost(int32, tag = "3")]
    pub total_tokens: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChatCompletionResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub object: String,
    #[prost(int64, tag = "3")]
    pub created: i64,
    #[prost(message, repeated, tag = "4")]
    pub choices: Vec<ChatCompletionChoice>,
    #[prost(message, optional, tag = "5")]
    pub usage: Option<Usage>,
}
