//! Error types for the cart actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// No open cart with this id.
    #[error("Cart not found: {0}")]
    NotFound(String),

    /// The actor answered an action with the result of a different one.
    #[error("Unexpected reply to {0}")]
    UnexpectedReply(&'static str),

    /// The cart actor is gone or dropped the request.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
