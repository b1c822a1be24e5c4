//! # Cart Client
//!
//! High-level API over the cart actor's mailbox. Each method sends one request and
//! returns the cart state the actor produced, so callers never read a stale copy
//! between their own write and the next.

use crate::cart_actor::{
    Cart, CartAction, CartActionResult, CartCreate, CartError, CartId, CartUpdate,
};
use crate::model::{CartCommand, CartState, MenuItem, MenuItemId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the cart actor. Cheap to clone.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            FrameworkError::EntityError(inner) => match inner.downcast_ref::<CartError>() {
                Some(cart_error) => cart_error.clone(),
                None => CartError::ActorCommunicationError(inner.to_string()),
            },
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CartClient {
    /// Opens an empty cart for a new session.
    #[instrument(skip(self))]
    pub async fn open_cart(&self, owner: Option<String>) -> Result<CartId, CartError> {
        debug!("Sending request");
        self.inner
            .create(CartCreate { owner })
            .await
            .map_err(Self::map_error)
    }

    /// Current state of the cart.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, id: CartId) -> Result<CartState, CartError> {
        match self.get(id).await? {
            Some(cart) => Ok(cart.state),
            None => Err(CartError::NotFound(id.to_string())),
        }
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add_item(
        &self,
        id: CartId,
        item: MenuItem,
        quantity: u32,
        special_request: Option<String>,
    ) -> Result<CartState, CartError> {
        self.dispatch(
            id,
            CartCommand::AddItem {
                item,
                quantity,
                special_request,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: CartId, item_id: MenuItemId) -> Result<CartState, CartError> {
        self.dispatch(id, CartCommand::RemoveItem(item_id)).await
    }

    /// Sets the quantity; zero or less removes the line.
    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        id: CartId,
        item_id: MenuItemId,
        quantity: i64,
    ) -> Result<CartState, CartError> {
        self.dispatch(id, CartCommand::UpdateQuantity { item_id, quantity })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_item_special_request(
        &self,
        id: CartId,
        item_id: MenuItemId,
        special_request: String,
    ) -> Result<CartState, CartError> {
        self.dispatch(
            id,
            CartCommand::UpdateSpecialRequest {
                item_id,
                special_request,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, id: CartId) -> Result<CartState, CartError> {
        self.dispatch(id, CartCommand::Clear).await
    }

    /// Units of `item_id` in the cart, 0 when absent.
    #[instrument(skip(self))]
    pub async fn item_quantity(&self, id: CartId, item_id: MenuItemId) -> Result<u32, CartError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, CartAction::ItemQuantity(item_id))
            .await
            .map_err(Self::map_error)?
        {
            CartActionResult::ItemQuantity(quantity) => Ok(quantity),
            CartActionResult::State(_) => Err(CartError::UnexpectedReply("ItemQuantity")),
        }
    }

    #[instrument(skip(self))]
    pub async fn rename_owner(&self, id: CartId, owner: Option<String>) -> Result<Cart, CartError> {
        debug!("Sending request");
        self.inner
            .update(id, CartUpdate { owner })
            .await
            .map_err(Self::map_error)
    }

    async fn dispatch(&self, id: CartId, command: CartCommand) -> Result<CartState, CartError> {
        debug!(?command, "Sending request");
        match self
            .inner
            .perform_action(id, CartAction::Dispatch(command))
            .await
            .map_err(Self::map_error)?
        {
            CartActionResult::State(state) => Ok(state),
            CartActionResult::ItemQuantity(_) => Err(CartError::UnexpectedReply("Dispatch")),
        }
    }
}
