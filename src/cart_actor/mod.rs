//! # Cart Actor
//!
//! Every open shopping session owns one [`Cart`]. All carts live in a single
//! [`ResourceActor`], which applies cart commands one at a time, so two requests
//! racing on the same cart (a double-tapped "add" button, say) are applied in
//! turn and neither increment is lost.
//!
//! ## Structure
//!
//! - [`entity`]: the [`Cart`] entity and its [`ActorEntity`](actor_framework::ActorEntity) impl
//! - [`actions`]: [`CartAction`] and [`CartActionResult`]
//! - [`error`]: [`CartError`]
//! - [`new()`]: builds the actor and its [`CartClient`]
//!
//! ## Usage
//!
//! ```rust
//! use crisper_storefront::cart_actor;
//! use crisper_storefront::model::MenuItem;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = cart_actor::new(8);
//!     actor.spawn(());
//!
//!     let cart = client.open_cart(None).await?;
//!     let state = client
//!         .add_item(cart, MenuItem::new(1, "Burger", 10.0), 2, None)
//!         .await?;
//!     assert_eq!(state.total_price(), 20.0);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::*;
pub use error::*;

use crate::clients::CartClient;
use actor_framework::ResourceActor;

/// Creates the cart actor and its client. `buffer` bounds the mailbox and is
/// raised to 1 when zero.
pub fn new(buffer: usize) -> (ResourceActor<Cart>, CartClient) {
    let (actor, generic_client) = ResourceActor::new(buffer.max(1));
    (actor, CartClient::new(generic_client))
}
