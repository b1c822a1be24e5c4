//! # ActorClient Trait
//!
//! Domain clients (e.g. a cart client) wrap a [`ResourceClient`] and translate
//! [`FrameworkError`] into their own error type. Implementing this trait gives them
//! `get`, `exists` and `delete` for free.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Shared read/close operations for resource-specific clients.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Tab { id: u32 }
/// #[derive(Debug)] struct OpenTab;
/// #[derive(Debug)] struct NoUpdate;
/// #[derive(Debug)] enum NoAction {}
/// #[derive(Debug, thiserror::Error)]
/// #[error("tab error: {0}")]
/// struct TabError(String);
///
/// #[async_trait]
/// impl ActorEntity for Tab {
///     type Id = u32; type Create = OpenTab; type Update = NoUpdate; type Action = NoAction;
///     type ActionResult = (); type Context = (); type Error = TabError;
///     fn from_create_params(id: u32, _: OpenTab) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: NoUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: NoAction, _: &()) -> Result<(), Self::Error> { match a {} }
/// }
///
/// struct TabClient { inner: ResourceClient<Tab> }
///
/// #[async_trait]
/// impl ActorClient<Tab> for TabClient {
///     type Error = TabError;
///     fn inner(&self) -> &ResourceClient<Tab> { &self.inner }
///     fn map_error(e: FrameworkError) -> TabError { TabError(e.to_string()) }
/// }
///
/// async fn close_if_open(client: TabClient) {
///     if client.exists(1).await.unwrap_or(false) {
///         let _ = client.delete(1).await;
///     }
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// The wrapped generic client.
    fn inner(&self) -> &ResourceClient<T>;

    /// Translates a mailbox failure into the resource error.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetches a snapshot of the entity.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// `true` when the actor still holds an entity with this id.
    async fn exists(&self, id: T::Id) -> Result<bool, Self::Error> {
        Ok(self.get(id).await?.is_some())
    }

    /// Removes the entity, running its `on_delete` hook.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
