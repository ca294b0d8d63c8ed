//! `embeddings` package.

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct EmbeddingRequest {
    #[prost(string, repeated, tag = "1")]
    pub inputs: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Embedding {
    #[prost(float, repeated, tag = "1")]
    pub embedding: Vec<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmbeddingResponse {
    #[prost(message, repeated, tag = "1")]
    pub embeddings: Vec<Embedding>,
}
