//! # Lifecycle
//!
//! Starting, using and stopping the storefront.
//!
//! - [`Storefront`] spawns the cart actor, holds the backend and hands out sessions.
//! - [`ShoppingSession`] is one customer's view: their cart, the menu they browsed,
//!   their login, and checkout.
//! - [`setup_tracing`] installs the log subscriber; call it once at startup.
//!
//! ```rust
//! use crisper_storefront::backend::InMemoryBackend;
//! use crisper_storefront::config::StorefrontConfig;
//! use crisper_storefront::lifecycle::Storefront;
//! use crisper_storefront::model::{Category, MenuItem, MenuItemId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryBackend::new(vec![Category {
//!         id: "1".into(),
//!         name: "Sandwiches".into(),
//!         name_en: None,
//!         items: vec![MenuItem::new(1, "Falafel", 500.0).with_stock(10)],
//!     }]);
//!     let storefront = Storefront::new(StorefrontConfig::default(), Arc::new(backend));
//!
//!     let mut session = storefront.open_session().await?;
//!     session.add_to_cart(MenuItemId(1), None).await?;
//!     assert_eq!(session.summary().await?.total, 500.0);
//!
//!     session.close().await?;
//!     storefront.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod session;
pub mod storefront;

pub use actor_framework::tracing::setup_tracing;
pub use session::{SessionError, ShoppingSession};
pub use storefront::Storefront;
