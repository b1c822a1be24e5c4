//! # Resource Actor
//!
//! The server half of the framework. A `ResourceActor<T>` owns every `T` it has
//! created and drains its mailbox one request at a time. Because each request runs
//! to completion before the next is received, read-modify-write sequences on an
//! entity (find a cart line, bump its quantity, recompute totals) cannot interleave.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, debug_span, info, warn, Instrument};

/// Generic actor owning a keyed store of entities.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new(buffer)` returns the actor and a cloneable client.
/// 2. **Wire**: hand dependencies to `run(context)` (or `spawn(context)`).
/// 3. **Use**: send requests through the client from any task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tab { id: u32, covers: u32 }
/// #[derive(Debug)] struct OpenTab { covers: u32 }
/// #[derive(Debug)] struct NoUpdate;
/// #[derive(Debug)] enum NoAction {}
/// #[derive(Debug, thiserror::Error)] #[error("tab error")] struct TabError;
///
/// #[async_trait]
/// impl ActorEntity for Tab {
///     type Id = u32;
///     type Create = OpenTab;
///     type Update = NoUpdate;
///     type Action = NoAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = TabError;
///
///     fn from_create_params(id: u32, p: OpenTab) -> Result<Self, Self::Error> {
///         Ok(Self { id, covers: p.covers })
///     }
///     async fn on_update(&mut self, _: NoUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: NoAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Tab>::new(8);
///     actor.spawn(());
///     let id = client.create(OpenTab { covers: 2 }).await.unwrap();
///     assert_eq!(client.get(id).await.unwrap().unwrap().covers, 2);
/// }
/// ```
///
/// Ids are minted from an internal `u32` counter starting at 1 and converted with
/// `T::Id::from`. They are never reused within one actor.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the mailbox; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs [`ResourceActor::run`] on a new Tokio task.
    pub fn spawn(self, context: T::Context) -> JoinHandle<()> {
        tokio::spawn(self.run(context))
    }

    /// Drains the mailbox until every client has been dropped.
    ///
    /// `context` is handed to every hook; it is supplied here rather than in `new`
    /// so actors can be wired to clients created after them.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            let span = debug_span!("request", entity_type, op = msg.kind());
            self.handle(msg, &context, entity_type).instrument(span).await;
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn handle(&mut self, msg: ResourceRequest<T>, context: &T::Context, entity_type: &str) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                self.create(params, respond_to, context, entity_type).await
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                debug!(entity_type, %id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => self.update(id, update, respond_to, context, entity_type).await,
            ResourceRequest::Delete { id, respond_to } => {
                self.delete(id, respond_to, context, entity_type).await
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => self.action(id, action, respond_to, context, entity_type).await,
        }
    }

    async fn create(
        &mut self,
        params: T::Create,
        respond_to: Response<T::Id>,
        context: &T::Context,
        entity_type: &str,
    ) {
        debug!(entity_type, ?params, "Create");
        let id = T::Id::from(self.next_id);
        self.next_id += 1;

        let mut item = match T::from_create_params(id.clone(), params) {
            Ok(item) => item,
            Err(e) => {
                warn!(entity_type, error = %e, "Create failed");
                let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                return;
            }
        };

        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, error = %e, "on_create failed");
            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
            return;
        }

        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        let _ = respond_to.send(Ok(id));
    }

    async fn update(
        &mut self,
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
        context: &T::Context,
        entity_type: &str,
    ) {
        debug!(entity_type, %id, ?update, "Update");
        let Some(item) = self.store.get_mut(&id) else {
            warn!(entity_type, %id, "Not found");
            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
            return;
        };

        match item.on_update(update, context).await {
            Ok(()) => {
                info!(entity_type, %id, "Updated");
                let _ = respond_to.send(Ok(item.clone()));
            }
            Err(e) => {
                warn!(entity_type, %id, error = %e, "Update failed");
                let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
            }
        }
    }

    async fn delete(
        &mut self,
        id: T::Id,
        respond_to: Response<()>,
        context: &T::Context,
        entity_type: &str,
    ) {
        debug!(entity_type, %id, "Delete");
        let Some(item) = self.store.get(&id) else {
            warn!(entity_type, %id, "Not found");
            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
            return;
        };

        if let Err(e) = item.on_delete(context).await {
            warn!(entity_type, %id, error = %e, "on_delete failed");
            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
            return;
        }

        self.store.remove(&id);
        info!(entity_type, %id, size = self.store.len(), "Deleted");
        let _ = respond_to.send(Ok(()));
    }

    async fn action(
        &mut self,
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
        context: &T::Context,
        entity_type: &str,
    ) {
        debug!(entity_type, %id, ?action, "Action");
        let Some(item) = self.store.get_mut(&id) else {
            warn!(entity_type, %id, "Not found");
            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
            return;
        };

        let result = item
            .handle_action(action, context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
        match &result {
            Ok(_) => info!(entity_type, %id, "Action ok"),
            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
        }
        let _ = respond_to.send(result);
    }
}

/// Last path segment of the entity's type name ("Cart" rather than the full path).
fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Unknown")
}
