pub mod product;
pub mod response;

pub use product::{seed_products, Product};
pub use response::{timestamp_now, ErrorResponse, ProductCollectionResponse, SERVICE_SOURCE};
