//! Streaming relay types.

use super::FinishReason;

/// One decoded fragment of a server-streamed backend response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamChunk {
    pub text_delta: String,
    /// Set when the backend signalled the end of generation on this chunk,
    /// either with a finish reason or with a bare stop marker.
    pub is_final: bool,
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    #[must_use]
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            text_delta: text.into(),
            is_final: false,
            finish_reason: None,
        }
    }

    #[must_use]
    pub const fn finished(finish_reason: FinishReason) -> Self {
        Self {
            text_delta: String::new(),
            is_final: true,
            finish_reason: Some(finish_reason),
        }
    }
}

/// Lifecycle of a single streaming relay.
///
/// `Open -> Draining -> Closed`, each transition taken at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayState {
    /// Receiving chunks from the backend and forwarding them.
    #[default]
    Open,
    /// Backend finished, errored, or the client left; only terminal
    /// events remain to be written.
    Draining,
    /// Nothing more will be written.
    Closed,
}

impl RelayState {
    /// Move from `Open` to `Draining`.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub const fn begin_draining(&mut self) -> bool {
        if matches!(self, Self::Open) {
            *self = Self::Draining;
            true
        } else {
            false
        }
    }

    /// Move to `Closed` from any state.
    pub const fn close(&mut self) {
        *self = Self::Closed;
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draining_transition_happens_once() {
        let mut state = RelayState::default();
        assert!(state.begin_draining());
        assert!(!state.begin_draining());
        assert_eq!(state, RelayState::Draining);
    }

    #[test]
    fn test_closed_never_reopens_to_draining() {
        let mut state = RelayState::Open;
        state.close();
        assert!(!state.begin_draining());
        assert!(state.is_closed());
    }
}
