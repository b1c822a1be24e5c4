//! [`ActorEntity`] implementation for [`Cart`].
//!
//! Commands are handed straight to the pure reducer in
//! [`model::cart`](crate::model::cart); the entity adds identity, an optional owner
//! name and logging.

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::model::CartState;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info};

/// Type-safe identifier for session carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(pub u32);

impl From<u32> for CartId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cart_{}", self.0)
    }
}

/// The cart of one shopping session.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: CartId,
    /// Customer display name, once known.
    pub owner: Option<String>,
    pub state: CartState,
}

#[derive(Debug, Clone, Default)]
pub struct CartCreate {
    pub owner: Option<String>,
}

/// Replaces the owner name (`None` forgets it, e.g. on logout).
#[derive(Debug, Clone)]
pub struct CartUpdate {
    pub owner: Option<String>,
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Update = CartUpdate;
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = ();
    type Error = CartError;

    fn from_create_params(id: CartId, params: CartCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            owner: params.owner,
            state: CartState::new(),
        })
    }

    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        info!(cart_id = %self.id, owner = ?self.owner, "Cart opened");
        Ok(())
    }

    async fn on_update(&mut self, update: CartUpdate, _ctx: &Self::Context) -> Result<(), Self::Error> {
        self.owner = update.owner;
        Ok(())
    }

    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        info!(
            cart_id = %self.id,
            lines = self.state.lines().len(),
            total_items = self.state.total_items(),
            "Cart closed"
        );
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        _ctx: &Self::Context,
    ) -> Result<CartActionResult, Self::Error> {
        match action {
            CartAction::Dispatch(command) => {
                self.state.apply(command);
                debug!(
                    cart_id = %self.id,
                    total_items = self.state.total_items(),
                    total_price = self.state.total_price(),
                    "Cart updated"
                );
                Ok(CartActionResult::State(self.state.clone()))
            }
            CartAction::ItemQuantity(item_id) => Ok(CartActionResult::ItemQuantity(
                self.state.item_quantity(item_id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartCommand, MenuItem, MenuItemId};

    fn cart() -> Cart {
        Cart::from_create_params(CartId(1), CartCreate::default()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_returns_new_state() {
        let mut cart = cart();
        let result = cart
            .handle_action(
                CartAction::Dispatch(CartCommand::AddItem {
                    item: MenuItem::new(3, "Soup", 6.0),
                    quantity: 2,
                    special_request: None,
                }),
                &(),
            )
            .await
            .unwrap();

        let CartActionResult::State(state) = result else {
            panic!("expected state");
        };
        assert_eq!(state.total_price(), 12.0);
        assert_eq!(state, cart.state);
    }

    #[tokio::test]
    async fn test_item_quantity_reads_without_change() {
        let mut cart = cart();
        cart.state.add_item(MenuItem::new(3, "Soup", 6.0), 4, None);
        let before = cart.clone();

        let result = cart
            .handle_action(CartAction::ItemQuantity(MenuItemId(3)), &())
            .await
            .unwrap();
        assert_eq!(result, CartActionResult::ItemQuantity(4));
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn test_update_replaces_owner() {
        let mut cart = cart();
        cart.on_update(
            CartUpdate {
                owner: Some("Mona".into()),
            },
            &(),
        )
        .await
        .unwrap();
        assert_eq!(cart.owner.as_deref(), Some("Mona"));
        assert_eq!(CartId(4).to_string(), "cart_4");
    }
}
