use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::Product;
use crate::store::ProductStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Product with ID {0} already exists")]
    DuplicateProduct(String),

    #[error("Product not found with ID: {0}")]
    ProductNotFound(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),
}

/// How ids are assigned to products created without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdStrategy {
    /// `"P" + (size + 1)`. Can collide with a surviving id after deletions.
    #[default]
    Sequential,
    /// `"P-" + uuid v4`, never collides.
    Uuid,
}

impl IdStrategy {
    pub fn generate(self, size: usize) -> String {
        match self {
            IdStrategy::Sequential => format!("P{}", size + 1),
            IdStrategy::Uuid => format!("P-{}", Uuid::new_v4().simple()),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(IdStrategy::Sequential),
            "uuid" => Ok(IdStrategy::Uuid),
            other => Err(format!("unknown id strategy '{}'", other)),
        }
    }
}

/// Catalog operations over a shared [`ProductStore`].
#[derive(Debug, Clone)]
pub struct ProductService {
    store: Arc<ProductStore>,
    id_strategy: IdStrategy,
}

impl ProductService {
    pub fn new(store: Arc<ProductStore>, id_strategy: IdStrategy) -> Self {
        Self { store, id_strategy }
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn list(&self) -> Vec<Product> {
        tracing::info!("Retrieving all products");
        self.store.list_all()
    }

    /// Missing ids yield an empty list rather than an error.
    pub fn get(&self, id: &str) -> Vec<Product> {
        tracing::info!(product_id = %id, "Retrieving product");
        match self.store.get(id) {
            Some(product) => vec![product],
            None => {
                tracing::warn!(product_id = %id, "Product not found");
                Vec::new()
            }
        }
    }

    pub fn create(&self, product: Product) -> Result<Product, ServiceError> {
        tracing::info!(product_id = %product.id, name = %product.name, "Creating new product");
        validate(&product)?;

        if product.has_blank_id() {
            let strategy = self.id_strategy;
            return self
                .store
                .insert_generated(|size| strategy.generate(size), product)
                .map_err(|id| {
                    tracing::warn!(product_id = %id, "Generated product id already exists");
                    ServiceError::DuplicateProduct(id)
                });
        }

        if self.store.insert_if_absent(product.clone()) {
            Ok(product)
        } else {
            tracing::warn!(product_id = %product.id, "Product already exists");
            Err(ServiceError::DuplicateProduct(product.id))
        }
    }

    /// The path id always wins over whatever id the body carries.
    pub fn update(&self, id: &str, product: Product) -> Result<Product, ServiceError> {
        tracing::info!(product_id = %id, "Updating product");
        validate(&product)?;

        let product = product.with_id(id);
        match self.store.replace_if_present(id, product.clone()) {
            Some(_) => Ok(product),
            None => {
                tracing::warn!(product_id = %id, "Product not found for update");
                Err(ServiceError::ProductNotFound(id.to_string()))
            }
        }
    }

    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        tracing::info!(product_id = %id, "Deleting product");
        match self.store.remove_if_present(id) {
            Some(_) => Ok(()),
            None => {
                tracing::warn!(product_id = %id, "Product not found for deletion");
                Err(ServiceError::ProductNotFound(id.to_string()))
            }
        }
    }
}

fn validate(product: &Product) -> Result<(), ServiceError> {
    if product.price < Decimal::ZERO {
        return Err(ServiceError::InvalidProduct(format!(
            "price must not be negative (got {})",
            product.price
        )));
    }
    Ok(())
}
