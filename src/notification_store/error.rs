//! Error types for the Notification store.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during notification operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    /// An error occurred while communicating with the store.
    #[error("Store communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for NotificationError {
    fn from(e: FrameworkError) -> Self {
        NotificationError::ActorCommunicationError(e.to_string())
    }
}
