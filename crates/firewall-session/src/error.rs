//! Error types for the session layer.

/// Errors that end a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The server rejected the token sent in `link`.
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

/// An agent could not decide on an action.
///
/// Returned from [`Agent::on_tick`](crate::Agent::on_tick); the session
/// logs it and sends nothing for that tick.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AgentError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}
