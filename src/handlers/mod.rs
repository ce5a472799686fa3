// handlers/mod.rs - HTTP handlers
//
// products: the catalog operations under /api/product (authenticated)
// system:   service root, health probe, OpenAPI document, fallbacks (public)
pub mod products;
pub mod system;

pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use system::{api_docs, health, method_not_allowed, not_found, root};
