//! # Cart State
//!
//! The cart is a list of lines plus two totals derived from it. Every change goes
//! through [`reduce`] (or the equivalent `CartState` methods), which applies one
//! [`CartCommand`] and then recomputes the totals, so the totals can never drift
//! from the lines.
//!
//! Rules enforced here:
//!
//! - at most one line per menu item; adding an item already in the cart bumps that line
//! - a quantity update that ends at zero or below removes the line
//! - a special request survives quantity changes until it is overwritten
//!
//! Nothing in this module fails or performs I/O. Stock checks belong to the
//! caller (see [`MenuSnapshot::check_add`](crate::model::MenuSnapshot::check_add)).

use crate::model::menu::{MenuItem, MenuItemId};
use serde::Serialize;

/// One cart entry: the menu item as it was when added, and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: MenuItem,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

impl CartLine {
    pub fn id(&self) -> MenuItemId {
        self.item.id
    }

    pub fn line_total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

/// A transition of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Merge `quantity` units into the item's line, or append a new line.
    /// `special_request` replaces the existing one only when `Some`.
    AddItem {
        item: MenuItem,
        quantity: u32,
        special_request: Option<String>,
    },
    RemoveItem(MenuItemId),
    /// Negative quantities count as zero.
    UpdateQuantity { item_id: MenuItemId, quantity: i64 },
    UpdateSpecialRequest {
        item_id: MenuItemId,
        special_request: String,
    },
    Clear,
}

/// Lines in insertion order and their totals.
///
/// The fields are private: outside this module the state can only be read, or
/// changed through a [`CartCommand`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    lines: Vec<CartLine>,
    total_items: u64,
    total_price: f64,
}

/// Applies `command` to `state` and returns the next state.
pub fn reduce(mut state: CartState, command: CartCommand) -> CartState {
    state.apply(command);
    state
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == item_id)
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of `item_id` in the cart, 0 when absent.
    pub fn item_quantity(&self, item_id: MenuItemId) -> u32 {
        self.line(item_id).map_or(0, |line| line.quantity)
    }

    pub fn apply(&mut self, command: CartCommand) {
        match command {
            CartCommand::AddItem {
                item,
                quantity,
                special_request,
            } => self.merge(item, quantity, special_request),
            CartCommand::RemoveItem(item_id) => self.lines.retain(|line| line.id() != item_id),
            CartCommand::UpdateQuantity { item_id, quantity } => {
                let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
                if let Some(line) = self.line_mut(item_id) {
                    line.quantity = quantity;
                }
                self.lines.retain(|line| line.quantity > 0);
            }
            CartCommand::UpdateSpecialRequest {
                item_id,
                special_request,
            } => {
                if let Some(line) = self.line_mut(item_id) {
                    line.special_request = Some(special_request);
                }
            }
            CartCommand::Clear => self.lines.clear(),
        }
        self.recompute();
    }

    pub fn add_item(&mut self, item: MenuItem, quantity: u32, special_request: Option<String>) {
        self.apply(CartCommand::AddItem {
            item,
            quantity,
            special_request,
        });
    }

    pub fn remove_item(&mut self, item_id: MenuItemId) {
        self.apply(CartCommand::RemoveItem(item_id));
    }

    pub fn update_item_quantity(&mut self, item_id: MenuItemId, quantity: i64) {
        self.apply(CartCommand::UpdateQuantity { item_id, quantity });
    }

    pub fn update_item_special_request(
        &mut self,
        item_id: MenuItemId,
        special_request: impl Into<String>,
    ) {
        self.apply(CartCommand::UpdateSpecialRequest {
            item_id,
            special_request: special_request.into(),
        });
    }

    pub fn clear(&mut self) {
        self.apply(CartCommand::Clear);
    }

    fn merge(&mut self, item: MenuItem, quantity: u32, special_request: Option<String>) {
        match self.line_mut(item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                if special_request.is_some() {
                    line.special_request = special_request;
                }
            }
            None => self.lines.push(CartLine {
                item,
                quantity,
                special_request,
            }),
        }
    }

    fn line_mut(&mut self, item_id: MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == item_id)
    }

    fn recompute(&mut self) {
        self.total_items = self.lines.iter().map(|l| u64::from(l.quantity)).sum();
        self.total_price = self.lines.iter().map(CartLine::line_total).sum();
    }
}
