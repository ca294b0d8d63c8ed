use serde::{Deserialize, Serialize};

/// Input accepted by the embeddings endpoint.
///
/// Exactly two shapes are valid: a single string or an array of strings.
/// Any other JSON shape (numbers, nested arrays, token arrays, objects) is
/// rejected while the request body is being deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, expecting = "input must be a string or an array of strings")]
pub enum EmbeddingInput {
    Single(String),
    Multiple(Vec<String>),
}

impl EmbeddingInput {
    /// Flatten into the list of texts to embed, preserving order.
    #[must_use]
    pub fn into_inputs(self) -> Vec<String> {
        match self {
            Self::Single(text) => vec![text],
            Self::Multiple(texts) => texts,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(texts) => texts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_string() {
        let input: EmbeddingInput = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(input, EmbeddingInput::Single("hello".into()));
        assert_eq!(input.into_inputs(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_string_array() {
        let input: EmbeddingInput = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input.into_inputs(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_rejects_other_shapes() {
        for body in ["42", "[1, 2]", r#"["a", 1]"#, r#"{"text": "a"}"#, "null"] {
            let err = serde_json::from_str::<EmbeddingInput>(body).unwrap_err();
            assert!(
                err.to_string().contains("string or an array of strings"),
                "unexpected error for {body}: {err}"
            );
        }
    }
}
