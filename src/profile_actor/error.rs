//! Error types for the Profile actor.

use thiserror::Error;

/// Missing profiles are not errors; see
/// [`RecommendationClient`](crate::clients::RecommendationClient).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    /// The actor answered with a result for a different action.
    #[error("Unexpected action result: {0}")]
    UnexpectedResult(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ProfileError {
    fn from(msg: String) -> Self {
        ProfileError::ActorCommunicationError(msg)
    }
}
