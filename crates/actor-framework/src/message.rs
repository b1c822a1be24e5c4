//! # Mailbox Messages
//!
//! Requests travelling from [`ResourceClient`](crate::ResourceClient) to
//! [`ResourceActor`](crate::ResourceActor). Each carries a oneshot sender the actor
//! answers on.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Reply slot attached to every request.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// One request to a resource actor.
///
/// The variants are the resource lifecycle (open, read, patch, close) plus
/// `Action` for anything resource-specific. For a cart, `Create` opens a session
/// cart, `Action` carries the cart commands and `Delete` ends the session.
///
/// All payload types come from the [`ActorEntity`] associated types, so a request
/// built for one entity type cannot reach another entity's actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short label used as the `op` field in actor logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "create",
            ResourceRequest::Get { .. } => "get",
            ResourceRequest::Update { .. } => "update",
            ResourceRequest::Delete { .. } => "delete",
            ResourceRequest::Action { .. } => "action",
        }
    }

    /// The targeted instance; `None` for Create.
    pub fn id(&self) -> Option<&T::Id> {
        match self {
            ResourceRequest::Create { .. } => None,
            ResourceRequest::Get { id, .. }
            | ResourceRequest::Update { id, .. }
            | ResourceRequest::Delete { id, .. }
            | ResourceRequest::Action { id, .. } => Some(id),
        }
    }
}
