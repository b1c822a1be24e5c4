//! # Crisper Storefront
//!
//! Cart and checkout core of a restaurant's online ordering storefront. Customers
//! browse a menu, build a cart and pay by bank transfer, attaching a photo of the
//! receipt. Menu, stock, accounts and orders live in an external backend; this
//! crate keeps each visitor's cart consistent and talks to that backend.
//!
//! ## Module Tour
//!
//! ### 1. The Cart ([`model::cart`])
//! A pure reducer over [`CartState`](model::CartState): merge-on-add, quantity
//! updates that drop lines at zero, notes that survive quantity changes, and totals
//! recomputed after every change.
//!
//! ### 2. The Cart Actor ([`cart_actor`], [`clients`])
//! Each session's cart lives in a [`ResourceActor`](actor_framework::ResourceActor),
//! so concurrent changes to one cart are applied one after another.
//! [`CartClient`](clients::CartClient) is the typed handle to it.
//!
//! ### 3. The Backend ([`backend`])
//! The [`Backend`](backend::Backend) trait with an HTTP implementation and an
//! in-memory one for tests.
//!
//! ### 4. Checkout ([`checkout`])
//! Form validation, payment-proof encoding and price summaries.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`Storefront`](lifecycle::Storefront) starts everything and opens
//! [`ShoppingSession`](lifecycle::ShoppingSession)s.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod backend;
pub mod cart_actor;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
