//! Error types for the Session store.

use crate::framework::FrameworkError;
use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The credentials were rejected before reaching the network.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    /// The backend refused the login, or answered without a usable token.
    #[error("{0}")]
    LoginFailed(String),

    /// A logout (or a newer login) happened while this login was in flight.
    #[error("Login superseded by a newer session change")]
    Superseded,

    /// An error occurred while communicating with the store.
    #[error("Store communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for SessionError {
    fn from(e: FrameworkError) -> Self {
        SessionError::ActorCommunicationError(e.to_string())
    }
}
