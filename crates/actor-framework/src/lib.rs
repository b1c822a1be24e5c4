//! # Actor Framework
//!
//! Generic building blocks for owning mutable state inside a single Tokio task and
//! talking to it through typed messages.
//!
//! A stateful resource implements [`ActorEntity`]. A [`ResourceActor`] owns every
//! instance of that resource and applies requests one after another, and a
//! [`ResourceClient`] is the cheap, cloneable handle callers use to reach it. Since
//! the actor never interleaves two requests, read-modify-write sequences on an
//! entity need no locks.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the data and its transitions.
//! 2. **Runtime** ([`ResourceActor`]): mailbox, id minting and the keyed store.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed requests and domain wrappers.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter { id: u32, value: i64 }
//!
//! #[derive(Debug)] struct Start { value: i64 }
//! #[derive(Debug)] struct Reset;
//! #[derive(Debug)] enum CounterAction { Add(i64) }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("counter overflow")]
//! struct Overflow;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32;
//!     type Create = Start;
//!     type Update = Reset;
//!     type Action = CounterAction;
//!     type ActionResult = i64;
//!     type Context = ();
//!     type Error = Overflow;
//!
//!     fn from_create_params(id: u32, p: Start) -> Result<Self, Self::Error> {
//!         Ok(Self { id, value: p.value })
//!     }
//!
//!     async fn on_update(&mut self, _: Reset, _: &()) -> Result<(), Self::Error> {
//!         self.value = 0;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, a: CounterAction, _: &()) -> Result<i64, Self::Error> {
//!         let CounterAction::Add(n) = a;
//!         self.value = self.value.checked_add(n).ok_or(Overflow)?;
//!         Ok(self.value)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(16);
//!     actor.spawn(());
//!
//!     let id = client.create(Start { value: 1 }).await.unwrap();
//!     assert_eq!(client.perform_action(id, CounterAction::Add(2)).await.unwrap(), 3);
//!     assert_eq!(client.update(id, Reset).await.unwrap().value, 0);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies reach entities through `T::Context`, passed to
//! [`ResourceActor::run`] rather than to the constructor. All actors of a system can
//! therefore be created first and wired to each other's clients afterwards.
//!
//! ## Testing
//!
//! [`mock`] answers client requests from a script or hands the raw mailbox to the
//! test, so domain clients can be exercised without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
