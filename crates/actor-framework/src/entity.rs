//! # ActorEntity Trait
//!
//! The contract a stateful resource (a shopping cart, a session, a tab) must satisfy
//! to be owned by a [`ResourceActor`](crate::ResourceActor).
//!
//! The associated types pin down every payload the actor accepts, so a cart
//! mailbox can only ever receive cart commands. Lifecycle hooks (`on_create`,
//! `on_update`, `on_delete`) and the action handler receive a shared `Context`
//! that is injected when the actor loop starts, not when the actor is built.
//!
//! `on_create` and `on_delete` are provided methods that do nothing by default.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A resource managed by [`ResourceActor`](crate::ResourceActor).
///
/// # Ownership
/// The actor holds every entity exclusively. Hooks get `&mut self` and run one at a
/// time, so an entity never observes a concurrent mutation of itself.
///
/// # Async & Context
/// Hooks are `async` so an entity may call other actors through clients carried in
/// its `Context`. Entities without dependencies use `()`.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier minted by the actor from a `u32` sequence (e.g. `CartId(u32)`).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to open a new instance.
    type Create: Send + Sync + Debug;

    /// Payload used to patch an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD (e.g. a cart command).
    type Action: Send + Sync + Debug;

    /// Value returned by [`ActorEntity::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into every hook.
    type Context: Send + Sync;

    /// One error type per entity, shared by every hook and action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the entity from its freshly minted id and the create payload.
    /// Runs synchronously, before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs after construction and before the entity becomes visible.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update payload in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Runs before the entity is dropped from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handles a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
