//! Error types for the Actions store.

use crate::framework::FrameworkError;
use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors that can occur during actions operations.
///
/// Listing failures are not errors here: they settle into the store state and are reported
/// through [`FetchOutcome::Failed`](super::FetchOutcome::Failed).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionsError {
    /// The form was rejected before reaching the network.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    /// A create is already in flight.
    #[error("An action is already being created")]
    CreateInProgress,

    /// The backend refused the create. Carries the extracted message.
    #[error("{0}")]
    CreateFailed(String),

    /// Page numbers are one-based and page sizes positive.
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// An error occurred while communicating with the store.
    #[error("Store communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ActionsError {
    fn from(e: FrameworkError) -> Self {
        ActionsError::ActorCommunicationError(e.to_string())
    }
}
