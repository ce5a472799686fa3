use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Product;

pub const SERVICE_SOURCE: &str = "product-service";

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Envelope returned by every successful read or write of products.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCollectionResponse {
    pub products: Vec<Product>,
    #[schema(example = "2024-03-19T10:30:22.123Z")]
    pub timestamp: String,
    #[schema(example = "product-service")]
    pub service_source: String,
    /// Reserved for the inventory service; always null here.
    pub inventory_status: Option<String>,
}

impl ProductCollectionResponse {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            timestamp: timestamp_now(),
            service_source: SERVICE_SOURCE.to_string(),
            inventory_status: None,
        }
    }

    pub fn single(product: Product) -> Self {
        Self::new(vec![product])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Product not found with ID: P999")]
    pub message: String,
    #[schema(example = "PRODUCT_NOT_FOUND")]
    pub code: String,
    pub timestamp: String,
    #[schema(example = "/api/product/products/P999")]
    pub path: String,
}

impl ErrorResponse {
    pub fn of(message: impl Into<String>, code: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            timestamp: timestamp_now(),
            path: path.into(),
        }
    }
}
