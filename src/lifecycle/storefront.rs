use crate::backend::{Backend, BackendError, HttpBackend};
use crate::cart_actor::{self, CartError};
use crate::checkout::TaxPolicy;
use crate::clients::CartClient;
use crate::config::StorefrontConfig;
use crate::lifecycle::ShoppingSession;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Owns the running cart actor and the backend connection.
///
/// # Example
///
/// ```ignore
/// let storefront = Storefront::from_config(StorefrontConfig::from_env()?)?;
///
/// let mut session = storefront.open_session().await?;
/// session.refresh_menu().await?;
/// session.add_to_cart(MenuItemId(7), Some("no onions".into())).await?;
/// let receipt = session.checkout(form).await?;
/// session.close().await?;
///
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    config: StorefrontConfig,
    backend: Arc<dyn Backend>,
    tax: TaxPolicy,
    cart_client: CartClient,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Spawns the cart actor. Must be called inside a Tokio runtime.
    pub fn new(config: StorefrontConfig, backend: Arc<dyn Backend>) -> Self {
        let (cart_actor, cart_client) = cart_actor::new(config.cart_buffer);
        let cart_handle = cart_actor.spawn(());
        info!(
            backend_url = %config.backend_url,
            tax_rate = config.tax_rate,
            "Storefront started"
        );

        Self {
            tax: TaxPolicy::from_config(&config),
            config,
            backend,
            cart_client,
            handles: vec![cart_handle],
        }
    }

    /// Same as [`Storefront::new`], talking HTTP to `config.backend_url`.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, BackendError> {
        let backend = HttpBackend::new(&config)?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn cart_client(&self) -> &CartClient {
        &self.cart_client
    }

    /// Opens a session with a fresh, empty cart.
    pub async fn open_session(&self) -> Result<ShoppingSession, CartError> {
        let cart_id = self.cart_client.open_cart(None).await?;
        Ok(ShoppingSession::new(
            cart_id,
            self.cart_client.clone(),
            self.backend.clone(),
            self.tax,
        ))
    }

    /// Stops the cart actor and waits for it.
    ///
    /// The actor exits once every client is gone, so sessions still alive keep
    /// this waiting; close or drop them first.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down storefront...");
        drop(self.cart_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
