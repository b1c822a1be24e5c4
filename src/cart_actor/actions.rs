//! Cart operations beyond open / read / close.

use crate::model::{CartCommand, CartState, MenuItemId};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Apply a command to the cart and return the resulting state.
    Dispatch(CartCommand),
    /// Read how many units of an item the cart holds.
    ItemQuantity(MenuItemId),
}

/// Results of [`CartAction`]; variants match 1:1.
#[derive(Debug, Clone, PartialEq)]
pub enum CartActionResult {
    State(CartState),
    ItemQuantity(u32),
}
