//! # Domain Model
//!
//! Plain data shared by the actors, the backend client and checkout.
//!
//! - [`menu`]: menu items, categories and the fetched [`MenuSnapshot`]
//! - [`cart`]: cart lines, [`CartState`] and the reducer that mutates it
//! - [`order`], [`user`], [`feedback`]: request and response bodies of the backend

pub mod cart;
pub mod feedback;
pub mod menu;
pub mod order;
pub mod user;

pub use cart::{reduce, CartCommand, CartLine, CartState};
pub use feedback::{Feedback, FeedbackAck};
pub use menu::{Category, Locale, MenuError, MenuItem, MenuItemId, MenuSnapshot, StockError};
pub use order::{OrderLine, OrderReceipt, OrderSubmission, OrderType, PaymentMethod};
pub use user::{AuthReply, BackendUser, Credentials, Registration, UserProfile};
