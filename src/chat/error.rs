use thiserror::Error;

/// The only failure text a user ever sees.
pub const CONNECT_ERROR_MESSAGE: &str = "Error: Unable to connect to the server.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("send prompt request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("parse response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Network,
    Timeout,
    Decode,
}

impl ChatError {
    pub fn kind(&self) -> ChatErrorKind {
        match self {
            ChatError::Transport(e) | ChatError::Body(e) if e.is_timeout() => {
                ChatErrorKind::Timeout
            }
            ChatError::Transport(_) | ChatError::Body(_) => ChatErrorKind::Network,
            ChatError::Decode(_) => ChatErrorKind::Decode,
        }
    }

    /// Every failure collapses into the same message in the log view.
    pub fn user_message(&self) -> &'static str {
        CONNECT_ERROR_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_kind_and_message() {
        let err: ChatError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ChatErrorKind::Decode);
        assert_eq!(err.user_message(), CONNECT_ERROR_MESSAGE);
        assert!(err.to_string().starts_with("parse response body"));
    }
}
