//! One customer's shopping session.

use crate::backend::{Backend, BackendError};
use crate::cart_actor::{CartError, CartId};
use crate::checkout::{self, CheckoutError, CheckoutForm, PriceSummary, TaxPolicy};
use crate::clients::CartClient;
use crate::model::{
    CartState, Credentials, Feedback, FeedbackAck, Locale, MenuItemId, MenuSnapshot,
    OrderReceipt, OrderSubmission, Registration, StockError, UserProfile,
};
use actor_framework::ActorClient;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A cart bound to one visitor, plus what the session knows about them.
///
/// Replaces a process-wide cart: every session has its own [`CartId`], and all
/// cart changes go through the cart actor.
pub struct ShoppingSession {
    cart_id: CartId,
    carts: CartClient,
    backend: Arc<dyn Backend>,
    tax: TaxPolicy,
    menu: Option<MenuSnapshot>,
    user: Option<UserProfile>,
    locale: Locale,
}

impl ShoppingSession {
    pub fn new(
        cart_id: CartId,
        carts: CartClient,
        backend: Arc<dyn Backend>,
        tax: TaxPolicy,
    ) -> Self {
        Self {
            cart_id,
            carts,
            backend,
            tax,
            menu: None,
            user: None,
            locale: Locale::default(),
        }
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// The menu from the last fetch, if any.
    pub fn menu(&self) -> Option<&MenuSnapshot> {
        self.menu.as_ref()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub async fn cart(&self) -> Result<CartState, CartError> {
        self.carts.snapshot(self.cart_id).await
    }

    pub async fn summary(&self) -> Result<PriceSummary, CartError> {
        Ok(self.tax.summarize(&self.cart().await?))
    }

    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn refresh_menu(&mut self) -> Result<&MenuSnapshot, BackendError> {
        let menu = self.backend.fetch_menu().await?;
        info!(
            categories = menu.categories().len(),
            items = menu.items().count(),
            "Menu refreshed"
        );
        Ok(self.menu.insert(menu))
    }

    /// Adds one unit of `item_id`, as the menu card's "add" button does.
    ///
    /// Refuses items the last menu fetch shows as out of stock, or whose stock the
    /// cart already holds. A non-empty `special_request` replaces the line's note.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn add_to_cart(
        &mut self,
        item_id: MenuItemId,
        special_request: Option<String>,
    ) -> Result<CartState, SessionError> {
        let in_cart = self.carts.item_quantity(self.cart_id, item_id).await?;
        let item = self.loaded_menu().await?.check_add(item_id, in_cart, 1)?.clone();
        let special_request = special_request.filter(|text| !text.trim().is_empty());

        Ok(self
            .carts
            .add_item(self.cart_id, item, 1, special_request)
            .await?)
    }

    pub async fn increase(&mut self, item_id: MenuItemId) -> Result<CartState, SessionError> {
        self.add_to_cart(item_id, None).await
    }

    /// Removes one unit; the line goes away at zero.
    pub async fn decrease(&mut self, item_id: MenuItemId) -> Result<CartState, CartError> {
        let in_cart = self.carts.item_quantity(self.cart_id, item_id).await?;
        if in_cart == 0 {
            return self.cart().await;
        }
        self.carts
            .update_item_quantity(self.cart_id, item_id, i64::from(in_cart) - 1)
            .await
    }

    /// Sets the quantity outright. Raising it is checked against the menu's stock.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn set_quantity(
        &mut self,
        item_id: MenuItemId,
        quantity: i64,
    ) -> Result<CartState, SessionError> {
        let in_cart = self.carts.item_quantity(self.cart_id, item_id).await?;
        if quantity > i64::from(in_cart) {
            let wanted = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.loaded_menu().await?.check_add(item_id, 0, wanted)?;
        }
        Ok(self
            .carts
            .update_item_quantity(self.cart_id, item_id, quantity)
            .await?)
    }

    pub async fn set_special_request(
        &self,
        item_id: MenuItemId,
        special_request: impl Into<String>,
    ) -> Result<CartState, CartError> {
        self.carts
            .update_item_special_request(self.cart_id, item_id, special_request.into())
            .await
    }

    pub async fn remove(&self, item_id: MenuItemId) -> Result<CartState, CartError> {
        self.carts.remove_item(self.cart_id, item_id).await
    }

    pub async fn clear(&self) -> Result<CartState, CartError> {
        self.carts.clear_cart(self.cart_id).await
    }

    pub async fn item_quantity(&self, item_id: MenuItemId) -> Result<u32, CartError> {
        self.carts.item_quantity(self.cart_id, item_id).await
    }

    // =========================================================================
    // Account
    // =========================================================================

    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&UserProfile, SessionError> {
        let profile = self.backend.login(credentials).await?;
        self.sign_in(profile).await
    }

    /// Creates an account and signs in with it.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn register(
        &mut self,
        registration: &Registration,
    ) -> Result<&UserProfile, SessionError> {
        let profile = self.backend.register(registration).await?;
        self.sign_in(profile).await
    }

    pub async fn logout(&mut self) -> Result<(), CartError> {
        if let Some(user) = self.user.take() {
            info!(username = %user.username, "Logged out");
        }
        self.carts.rename_owner(self.cart_id, None).await?;
        Ok(())
    }

    pub async fn send_feedback(&self, feedback: &Feedback) -> Result<FeedbackAck, BackendError> {
        self.backend.send_feedback(feedback).await
    }

    async fn sign_in(&mut self, profile: UserProfile) -> Result<&UserProfile, SessionError> {
        self.carts
            .rename_owner(self.cart_id, Some(profile.name.clone()))
            .await?;
        info!(username = %profile.username, "Logged in");
        Ok(self.user.insert(profile))
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Places the order for the current cart.
    ///
    /// The form is validated, the menu is fetched again and every line is checked
    /// against the fresh stock, then the order is submitted. The cart is emptied
    /// only after the backend accepts it; any failure before that leaves the cart
    /// as it was. Once accepted, the receipt is returned even if emptying fails.
    #[instrument(skip(self, form), fields(cart_id = %self.cart_id))]
    pub async fn checkout(&mut self, form: CheckoutForm) -> Result<OrderReceipt, CheckoutError> {
        let cart = self.cart().await?;
        let order = checkout::validate(&form, &cart, self.user.as_ref())?;

        let menu = self.refresh_menu().await?;
        for line in cart.lines() {
            menu.check_add(line.id(), 0, line.quantity)?;
        }

        let submission = OrderSubmission::from_cart(&order, &cart, Utc::now());
        let receipt = match self.backend.submit_order(&submission).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                return Err(e.into());
            }
        };

        if let Err(e) = self.clear().await {
            warn!(order_id = %receipt.order_id, error = %e, "Order placed but the cart was not cleared");
        }
        info!(
            order_id = %receipt.order_id,
            total_items = cart.total_items(),
            "Order placed"
        );
        Ok(receipt)
    }

    /// Ends the session and discards its cart.
    pub async fn close(self) -> Result<(), CartError> {
        self.carts.delete(self.cart_id).await
    }

    /// The cached menu, fetched first if this session has none yet.
    async fn loaded_menu(&mut self) -> Result<&MenuSnapshot, BackendError> {
        let menu = match self.menu.take() {
            Some(menu) => menu,
            None => self.backend.fetch_menu().await?,
        };
        Ok(self.menu.insert(menu))
    }
}
