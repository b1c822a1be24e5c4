//! # Framework Errors
//!
//! Failures of the mailbox plumbing itself, plus a boxed slot for whatever the
//! entity's own error type reported.

/// Errors raised by [`ResourceClient`](crate::ResourceClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The actor task is gone; the request could not be queued.
    #[error("Actor closed")]
    ActorClosed,
    /// The request was queued but the reply channel was dropped.
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// No entity with this id lives in the actor.
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The entity rejected the request.
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// `true` when the failure came from the mailbox rather than from the entity.
    pub fn is_transport(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}
