//! Stop-token handling.
//!
//! Backends append an end-of-sequence marker to generated text. It must
//! never reach a client. For unary responses the marker is removed from
//! the decoded text; for streams it may arrive split across chunks, so
//! [`StopTokenFilter`] holds back any tail that could still grow into the
//! marker.

/// The end-of-sequence marker emitted by chat-tuned backends.
pub const STOP_TOKEN: &str = "<|im_end|>";

/// Remove every occurrence of `token` from `text`.
///
/// Removal repeats until no occurrence is left, so text that forms a new
/// marker once an inner one is cut out is also cleaned.
#[must_use]
pub fn strip_stop_token(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    let mut out = text.replace(token, "");
    while out.contains(token) {
        out = out.replace(token, "");
    }
    out
}

/// Whether a chunk consists of nothing but the stop marker.
#[must_use]
pub fn is_stop_marker(text: &str, token: &str) -> bool {
    !token.is_empty() && text.trim() == token
}

/// Incremental stop-token stripper for streamed text.
///
/// Every string returned by [`push`](Self::push) is safe to show to the
/// client. Their concatenation always equals [`assembled`](Self::assembled).
#[derive(Debug, Clone)]
pub struct StopTokenFilter {
    token: String,
    held: String,
    assembled: String,
}

impl StopTokenFilter {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            held: String::new(),
            assembled: String::new(),
        }
    }

    /// Feed a raw delta and get back the part that can be emitted now.
    ///
    /// The returned string may be empty when the whole delta is either the
    /// marker or a possible prefix of it.
    pub fn push(&mut self, delta: &str) -> String {
        self.held.push_str(delta);
        if self.token.is_empty() {
            let ready = std::mem::take(&mut self.held);
            self.assembled.push_str(&ready);
            return ready;
        }

        if self.held.contains(self.token.as_str()) {
            self.held = strip_stop_token(&self.held, &self.token);
        }

        let keep = partial_marker_len(&self.held, &self.token);
        let split = self.held.len() - keep;
        let ready: String = self.held.drain(..split).collect();
        self.assembled.push_str(&ready);
        ready
    }

    /// Finish the stream.
    ///
    /// Whatever is still held is a trailing fragment of the marker and is
    /// discarded. Returns the full assembled text.
    pub fn finish(&mut self) -> &str {
        self.held.clear();
        &self.assembled
    }

    /// Text emitted so far.
    #[must_use]
    pub fn assembled(&self) -> &str {
        &self.assembled
    }
}

/// Length of the longest proper prefix of `token` that `text` ends with.
fn partial_marker_len(text: &str, token: &str) -> usize {
    token
        .char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .filter(|&idx| text.ends_with(&token[..idx]))
        .max()
        .unwrap_or(0)
}
