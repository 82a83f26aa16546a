//! Error types for the Tracking actor.

use thiserror::Error;

/// Only the channel to the actor can fail; tracking itself never errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingError {
    #[error("Tracking actor closed")]
    ActorClosed,

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for TrackingError {
    fn from(msg: String) -> Self {
        TrackingError::ActorCommunicationError(msg)
    }
}
