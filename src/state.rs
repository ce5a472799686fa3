use std::sync::Arc;

use crate::auth::{AuthChain, AuthError};
use crate::config::AppConfig;
use crate::service::ProductService;
use crate::store::ProductStore;

/// Everything a request handler needs, built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub products: ProductService,
    pub auth: Arc<AuthChain>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AuthError> {
        let store = if config.catalog.seed_products {
            ProductStore::seeded()
        } else {
            ProductStore::new()
        };
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: AppConfig, store: Arc<ProductStore>) -> Result<Self, AuthError> {
        let auth = AuthChain::from_config(&config.security)?;
        let products = ProductService::new(store, config.catalog.id_strategy);

        Ok(Self {
            config: Arc::new(config),
            products,
            auth: Arc::new(auth),
        })
    }
}
